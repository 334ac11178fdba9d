//! services/api/src/web/rest.rs
//!
//! Contains the wire-format response types shared by the REST handlers and
//! the master definition for the OpenAPI specification.

use bugvault_core::domain::{Entry, EntryCounts, Project};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::auth::signup_handler,
        crate::web::auth::login_handler,
        crate::web::auth::logout_handler,
        crate::web::projects::create_project_handler,
        crate::web::projects::list_projects_handler,
        crate::web::projects::get_project_handler,
        crate::web::projects::delete_project_handler,
        crate::web::entries::create_entry_handler,
        crate::web::entries::list_entries_handler,
        crate::web::entries::get_entry_handler,
        crate::web::entries::update_entry_handler,
        crate::web::entries::delete_entry_handler,
        crate::web::search::search_handler,
        crate::web::upload::upload_handler,
    ),
    components(
        schemas(
            ProjectResponse,
            ProjectOverviewResponse,
            EntryResponse,
            DeletedResponse,
            crate::web::auth::SignupRequest,
            crate::web::auth::LoginRequest,
            crate::web::auth::AuthResponse,
            crate::web::projects::CreateProjectRequest,
            crate::web::entries::CreateEntryRequest,
            crate::web::entries::UpdateEntryRequest,
            crate::web::search::SearchResponse,
            crate::web::upload::UploadResponse,
        )
    ),
    tags(
        (name = "BugVault API", description = "API endpoints for the bug and decision vault.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Shared API Response Structs
//=========================================================================================

/// A project as seen over the wire.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub tech_stack: String,
    pub created_at: DateTime<Utc>,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            name: project.name,
            description: project.description,
            tech_stack: project.tech_stack,
            created_at: project.created_at,
        }
    }
}

/// A project plus its per-variant entry counts.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOverviewResponse {
    #[serde(flatten)]
    pub project: ProjectResponse,
    pub bug_count: i64,
    pub decision_count: i64,
}

impl ProjectOverviewResponse {
    pub fn new(project: Project, counts: EntryCounts) -> Self {
        Self {
            project: project.into(),
            bug_count: counts.bugs,
            decision_count: counts.decisions,
        }
    }
}

/// An entry (bug or decision) as seen over the wire. The enrichment fields
/// are empty strings until the background task has run.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntryResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    pub entry_type: String,
    pub title: String,
    pub error_message: Option<String>,
    pub context: String,
    pub root_cause: Option<String>,
    pub solution: String,
    pub screenshot_url: Option<String>,
    pub ai_explanation: String,
    pub ai_interview_question: String,
    pub created_at: DateTime<Utc>,
}

impl From<Entry> for EntryResponse {
    fn from(entry: Entry) -> Self {
        Self {
            id: entry.id,
            project_id: entry.project_id,
            entry_type: entry.entry_type.as_str().to_string(),
            title: entry.title,
            error_message: entry.error_message,
            context: entry.context,
            root_cause: entry.root_cause,
            solution: entry.solution,
            screenshot_url: entry.screenshot_url,
            ai_explanation: entry.ai_explanation,
            ai_interview_question: entry.ai_interview_question,
            created_at: entry.created_at,
        }
    }
}

/// Acknowledges a hard delete.
#[derive(Serialize, ToSchema)]
pub struct DeletedResponse {
    pub success: bool,
}

impl DeletedResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
