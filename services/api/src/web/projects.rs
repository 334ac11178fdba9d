//! services/api/src/web/projects.rs
//!
//! Axum handlers for the project endpoints. Every handler reads the caller's
//! user id from the request extensions placed there by `require_auth` and
//! goes through the core service, which owns the ownership checks.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use bugvault_core::domain::NewProject;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::port_error;
use crate::web::rest::{DeletedResponse, ProjectOverviewResponse, ProjectResponse};
use crate::web::state::AppState;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tech_stack: String,
}

/// Create a new project owned by the caller.
#[utoipa::path(
    post,
    path = "/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 400, description = "Missing required field"),
        (status = 401, description = "No session")
    )
)]
pub async fn create_project_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let project = state
        .service
        .create_project(NewProject {
            user_id,
            name: req.name,
            description: req.description,
            tech_stack: req.tech_stack,
        })
        .await
        .map_err(port_error)?;

    Ok((StatusCode::CREATED, Json(ProjectResponse::from(project))))
}

/// List the caller's projects, newest first.
#[utoipa::path(
    get,
    path = "/projects",
    responses(
        (status = 200, description = "The caller's projects", body = [ProjectResponse]),
        (status = 401, description = "No session")
    )
)]
pub async fn list_projects_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let projects = state
        .service
        .list_projects(user_id)
        .await
        .map_err(port_error)?;

    let body: Vec<ProjectResponse> = projects.into_iter().map(ProjectResponse::from).collect();
    Ok(Json(body))
}

/// Fetch one project with its entry counts.
#[utoipa::path(
    get,
    path = "/projects/{id}",
    params(("id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 200, description = "The project", body = ProjectOverviewResponse),
        (status = 401, description = "No session"),
        (status = 404, description = "Absent or not owned by the caller")
    )
)]
pub async fn get_project_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let (project, counts) = state
        .service
        .get_project(user_id, id)
        .await
        .map_err(port_error)?;

    Ok(Json(ProjectOverviewResponse::new(project, counts)))
}

/// Delete a project and everything under it.
#[utoipa::path(
    delete,
    path = "/projects/{id}",
    params(("id" = Uuid, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project and its entries deleted", body = DeletedResponse),
        (status = 401, description = "No session"),
        (status = 404, description = "Absent or not owned by the caller")
    )
)]
pub async fn delete_project_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .service
        .delete_project(user_id, id)
        .await
        .map_err(port_error)?;

    Ok(Json(DeletedResponse::ok()))
}
