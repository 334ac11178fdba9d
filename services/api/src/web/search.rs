//! services/api/src/web/search.rs
//!
//! The global search endpoint: one query string, three result buckets, all
//! scoped to the calling user.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::port_error;
use crate::web::rest::{EntryResponse, ProjectResponse};
use crate::web::state::AppState;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct SearchResponse {
    pub projects: Vec<ProjectResponse>,
    pub bugs: Vec<EntryResponse>,
    pub decisions: Vec<EntryResponse>,
}

/// Case-insensitive substring search across projects, bugs, and decisions.
///
/// An empty (or missing) query lists every project the caller owns and leaves
/// the entry buckets empty.
#[utoipa::path(
    get,
    path = "/search",
    params(("q" = Option<String>, Query, description = "Substring to search for")),
    responses(
        (status = 200, description = "Matches grouped by collection", body = SearchResponse),
        (status = 401, description = "No session")
    )
)]
pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let query = params.q.unwrap_or_default();
    let results = state
        .service
        .search(user_id, &query)
        .await
        .map_err(port_error)?;

    Ok(Json(SearchResponse {
        projects: results
            .projects
            .into_iter()
            .map(ProjectResponse::from)
            .collect(),
        bugs: results.bugs.into_iter().map(EntryResponse::from).collect(),
        decisions: results
            .decisions
            .into_iter()
            .map(EntryResponse::from)
            .collect(),
    }))
}
