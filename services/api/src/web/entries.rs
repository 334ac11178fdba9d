//! services/api/src/web/entries.rs
//!
//! Axum handlers for the entry lifecycle: create (with deferred enrichment),
//! read, update, delete. Bugs and decisions share one set of endpoints; the
//! `entryType` field picks the variant.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use bugvault_core::domain::{EntryPatch, EntryType, NewEntry};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::enrich_task;
use crate::web::port_error;
use crate::web::rest::{DeletedResponse, EntryResponse};
use crate::web::state::AppState;

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    pub title: String,
    pub error_message: Option<String>,
    #[serde(default)]
    pub context: String,
    pub root_cause: Option<String>,
    #[serde(default)]
    pub solution: String,
    pub screenshot_url: Option<String>,
    /// "BUG" or "DECISION"; omitted means BUG.
    pub entry_type: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntryRequest {
    pub title: String,
    pub error_message: Option<String>,
    #[serde(default)]
    pub context: String,
    pub root_cause: Option<String>,
    #[serde(default)]
    pub solution: String,
}

#[derive(Deserialize)]
pub struct ListEntriesParams {
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
}

fn parse_entry_type(value: Option<&str>) -> Result<EntryType, (StatusCode, String)> {
    match value {
        None => Ok(EntryType::Bug),
        Some(raw) => EntryType::parse(raw).ok_or((
            StatusCode::BAD_REQUEST,
            format!("'{}' is not a valid entry type", raw),
        )),
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// Create an entry under a project.
///
/// The response always carries empty enrichment fields; for bugs a background
/// task fills them in, and a later read observes the populated values.
#[utoipa::path(
    post,
    path = "/projects/{id}/entries",
    params(("id" = Uuid, Path, description = "Project id")),
    request_body = CreateEntryRequest,
    responses(
        (status = 201, description = "Entry created", body = EntryResponse),
        (status = 400, description = "Missing required field or bad entry type"),
        (status = 401, description = "No session"),
        (status = 404, description = "Project absent or not owned by the caller")
    )
)]
pub async fn create_entry_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(project_id): Path<Uuid>,
    Json(req): Json<CreateEntryRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let entry_type = parse_entry_type(req.entry_type.as_deref())?;

    let entry = state
        .service
        .create_entry(
            user_id,
            NewEntry {
                project_id,
                entry_type,
                title: req.title,
                error_message: req.error_message,
                context: req.context,
                root_cause: req.root_cause,
                solution: req.solution,
                screenshot_url: req.screenshot_url,
            },
        )
        .await
        .map_err(port_error)?;

    // Fire-and-forget: the request never waits on the LLM.
    if entry_type == EntryType::Bug {
        tokio::spawn(enrich_task::enrich_and_store(state.clone(), entry.clone()));
    }

    Ok((StatusCode::CREATED, Json(EntryResponse::from(entry))))
}

/// List one variant's entries under a project, newest first.
#[utoipa::path(
    get,
    path = "/projects/{id}/entries",
    params(
        ("id" = Uuid, Path, description = "Project id"),
        ("type" = Option<String>, Query, description = "BUG (default) or DECISION")
    ),
    responses(
        (status = 200, description = "Entries of the requested type", body = [EntryResponse]),
        (status = 401, description = "No session"),
        (status = 404, description = "Project absent or not owned by the caller")
    )
)]
pub async fn list_entries_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(project_id): Path<Uuid>,
    Query(params): Query<ListEntriesParams>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let entry_type = parse_entry_type(params.entry_type.as_deref())?;
    let entries = state
        .service
        .list_entries(user_id, project_id, entry_type)
        .await
        .map_err(port_error)?;

    let body: Vec<EntryResponse> = entries.into_iter().map(EntryResponse::from).collect();
    Ok(Json(body))
}

/// Fetch a single entry.
#[utoipa::path(
    get,
    path = "/entries/{id}",
    params(("id" = Uuid, Path, description = "Entry id")),
    responses(
        (status = 200, description = "The entry", body = EntryResponse),
        (status = 401, description = "No session"),
        (status = 404, description = "Absent or not owned by the caller")
    )
)]
pub async fn get_entry_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let entry = state
        .service
        .get_entry(user_id, id)
        .await
        .map_err(port_error)?;

    Ok(Json(EntryResponse::from(entry)))
}

/// Overwrite an entry's mutable fields. Enrichment is never re-run.
#[utoipa::path(
    put,
    path = "/entries/{id}",
    params(("id" = Uuid, Path, description = "Entry id")),
    request_body = UpdateEntryRequest,
    responses(
        (status = 200, description = "The updated entry", body = EntryResponse),
        (status = 400, description = "Missing required field"),
        (status = 401, description = "No session"),
        (status = 404, description = "Absent or not owned by the caller")
    )
)]
pub async fn update_entry_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateEntryRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let entry = state
        .service
        .update_entry(
            user_id,
            id,
            EntryPatch {
                title: req.title,
                error_message: req.error_message,
                context: req.context,
                root_cause: req.root_cause,
                solution: req.solution,
            },
        )
        .await
        .map_err(port_error)?;

    Ok(Json(EntryResponse::from(entry)))
}

/// Hard-delete an entry. A repeat delete of the same id is a 404.
#[utoipa::path(
    delete,
    path = "/entries/{id}",
    params(("id" = Uuid, Path, description = "Entry id")),
    responses(
        (status = 200, description = "Entry deleted", body = DeletedResponse),
        (status = 401, description = "No session"),
        (status = 404, description = "Absent or not owned by the caller")
    )
)]
pub async fn delete_entry_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .service
        .delete_entry(user_id, id)
        .await
        .map_err(port_error)?;

    Ok(Json(DeletedResponse::ok()))
}
