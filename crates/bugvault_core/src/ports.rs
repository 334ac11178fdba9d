//! crates/bugvault_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    Entry, EntryCounts, EntryPatch, EntryType, NewEntry, NewProject, Project, User,
    UserCredentials,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The record is absent, or it belongs to another user. The two causes
    /// are deliberately indistinguishable so that existence never leaks
    /// across account boundaries.
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    Invalid(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The persistence gateway. Every point lookup that hands back an owned
/// record takes the caller's `user_id` and applies the ownership predicate
/// server-side; entry ownership is resolved through the parent project.
#[async_trait]
pub trait VaultStore: Send + Sync {
    // --- Auth Methods ---
    async fn create_user_with_email(
        &self,
        email: &str,
        name: &str,
        hashed_password: &str,
    ) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Project Management ---
    async fn insert_project(&self, draft: NewProject) -> PortResult<Project>;

    async fn list_projects(&self, user_id: Uuid) -> PortResult<Vec<Project>>;

    /// Point lookup scoped to the owner. Absent and foreign both come back
    /// as `NotFound`.
    async fn find_project(&self, project_id: Uuid, user_id: Uuid) -> PortResult<Project>;

    /// Deletes the project's entries and then the project itself inside one
    /// transaction.
    async fn delete_project_with_entries(&self, project_id: Uuid) -> PortResult<()>;

    async fn search_projects(&self, user_id: Uuid, query: &str) -> PortResult<Vec<Project>>;

    // --- Entry Management ---
    async fn insert_entry(&self, draft: NewEntry) -> PortResult<Entry>;

    /// Point lookup scoped via the parent project's owner.
    async fn find_entry(&self, entry_id: Uuid, user_id: Uuid) -> PortResult<Entry>;

    async fn list_entries(
        &self,
        project_id: Uuid,
        entry_type: EntryType,
    ) -> PortResult<Vec<Entry>>;

    async fn count_entries(&self, project_id: Uuid) -> PortResult<EntryCounts>;

    async fn update_entry(&self, entry_id: Uuid, patch: EntryPatch) -> PortResult<Entry>;

    /// The enrichment second write, performed by the background task.
    async fn set_enrichment(
        &self,
        entry_id: Uuid,
        explanation: &str,
        interview_question: &str,
    ) -> PortResult<()>;

    async fn delete_entry(&self, entry_id: Uuid) -> PortResult<()>;

    /// Case-insensitive substring search over one entry variant. Bugs match
    /// on title, error message, and context; decisions on title and context.
    async fn search_entries(
        &self,
        user_id: Uuid,
        query: &str,
        entry_type: EntryType,
    ) -> PortResult<Vec<Entry>>;
}

#[async_trait]
pub trait EnrichmentService: Send + Sync {
    /// Sends a prompt to the text-generation backend and returns its raw
    /// free-text reply.
    async fn generate(&self, prompt: &str) -> PortResult<String>;
}

#[async_trait]
pub trait ImageHostService: Send + Sync {
    /// Uploads an image to the external host and returns its public URL.
    async fn upload_image(&self, file_name: &str, data: Vec<u8>) -> PortResult<String>;
}
