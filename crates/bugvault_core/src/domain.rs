//! crates/bugvault_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Discriminates the two variants stored in the single entries table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    Bug,
    Decision,
}

impl EntryType {
    /// The tag value stored in the database and sent over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Bug => "BUG",
            EntryType::Decision => "DECISION",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "BUG" => Some(EntryType::Bug),
            "DECISION" => Some(EntryType::Decision),
            _ => None,
        }
    }
}

// Represents a user - used throughout the app
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub hashed_password: String,
}

// Represents a browser login session (auth cookie)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// A project owned by exactly one user. Entries hang off projects; the
/// project's `user_id` is the sole authorization root for everything below it.
#[derive(Debug, Clone)]
pub struct Project {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub tech_stack: String,
    pub created_at: DateTime<Utc>,
}

/// The fields needed to create a new project.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub tech_stack: String,
}

/// A bug or decision record. Both variants share this shape; `entry_type`
/// discriminates them, and `error_message`/`root_cause` are only ever set on
/// bugs. The enrichment fields start empty and are filled by a second write
/// once the background enrichment task finishes (bugs only).
#[derive(Debug, Clone)]
pub struct Entry {
    pub id: Uuid,
    pub project_id: Uuid,
    pub entry_type: EntryType,
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

impl Entry {
    /// An entry is still "draft-enriching" until the explanation lands.
    pub fn is_enriched(&self) -> bool {
        !self.ai_explanation.is_empty()
    }
}

/// The fields needed to create a new entry. Enrichment fields are always
/// created empty, so they do not appear here.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub project_id: Uuid,
    pub entry_type: EntryType,
    pub title: String,
    pub error_message: Option<String>,
    pub context: String,
    pub root_cause: Option<String>,
    pub solution: String,
    pub screenshot_url: Option<String>,
}

/// The mutable subset of an entry, written wholesale on update.
#[derive(Debug, Clone)]
pub struct EntryPatch {
    pub title: String,
    pub error_message: Option<String>,
    pub context: String,
    pub root_cause: Option<String>,
    pub solution: String,
}

/// Per-type entry counts for a project overview.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntryCounts {
    pub bugs: i64,
    pub decisions: i64,
}

/// What the global search returns: one bucket per collection, all scoped to
/// the calling user.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub projects: Vec<Project>,
    pub bugs: Vec<Entry>,
    pub decisions: Vec<Entry>,
}
