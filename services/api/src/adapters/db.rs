//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `VaultStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use bugvault_core::domain::{
    Entry, EntryCounts, EntryPatch, EntryType, NewEntry, NewProject, Project, User,
    UserCredentials,
};
use bugvault_core::ports::{PortError, PortResult, VaultStore};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `VaultStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    email: String,
    name: String,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            user_id: self.id,
            email: self.email,
            name: self.name,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    id: Uuid,
    email: String,
    name: String,
    hashed_password: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            user_id: self.id,
            email: self.email,
            name: self.name,
            hashed_password: self.hashed_password,
        }
    }
}

#[derive(FromRow)]
struct ProjectRecord {
    id: Uuid,
    user_id: Uuid,
    name: String,
    description: String,
    tech_stack: String,
    created_at: DateTime<Utc>,
}
impl ProjectRecord {
    fn to_domain(self) -> Project {
        Project {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            description: self.description,
            tech_stack: self.tech_stack,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct EntryRecord {
    id: Uuid,
    project_id: Uuid,
    entry_type: String,
    title: String,
    error_message: Option<String>,
    context: String,
    root_cause: Option<String>,
    solution: String,
    screenshot_url: Option<String>,
    ai_explanation: String,
    ai_interview_question: String,
    created_at: DateTime<Utc>,
}
impl EntryRecord {
    fn to_domain(self) -> PortResult<Entry> {
        let entry_type = EntryType::parse(&self.entry_type).ok_or_else(|| {
            PortError::Unexpected(format!("Unknown entry type '{}' in storage", self.entry_type))
        })?;
        Ok(Entry {
            id: self.id,
            project_id: self.project_id,
            entry_type,
            title: self.title,
            error_message: self.error_message,
            context: self.context,
            root_cause: self.root_cause,
            solution: self.solution,
            screenshot_url: self.screenshot_url,
            ai_explanation: self.ai_explanation,
            ai_interview_question: self.ai_interview_question,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct CountsRecord {
    bugs: i64,
    decisions: i64,
}

const ENTRY_COLUMNS: &str = "id, project_id, entry_type, title, error_message, context, \
                             root_cause, solution, screenshot_url, ai_explanation, \
                             ai_interview_question, created_at";

//=========================================================================================
// `VaultStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl VaultStore for DbAdapter {
    async fn create_user_with_email(
        &self,
        email: &str,
        name: &str,
        hashed_password: &str,
    ) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (id, email, name, hashed_password) VALUES ($1, $2, $3, $4) \
             RETURNING id, email, name",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(name)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                PortError::Invalid(format!("Email {} is already registered", email))
            }
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT id, email, name, hashed_password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("User {} not found", email)))?;
        Ok(record.to_domain())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        // Expired rows are simply never matched; a periodic cleanup is not
        // needed for correctness.
        let user_id: Option<(Uuid,)> = sqlx::query_as(
            "SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > NOW()",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        user_id.map(|(id,)| id).ok_or(PortError::Unauthorized)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn insert_project(&self, draft: NewProject) -> PortResult<Project> {
        let record = sqlx::query_as::<_, ProjectRecord>(
            "INSERT INTO projects (id, user_id, name, description, tech_stack) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, user_id, name, description, tech_stack, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(draft.user_id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.tech_stack)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn list_projects(&self, user_id: Uuid) -> PortResult<Vec<Project>> {
        let records = sqlx::query_as::<_, ProjectRecord>(
            "SELECT id, user_id, name, description, tech_stack, created_at \
             FROM projects WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn find_project(&self, project_id: Uuid, user_id: Uuid) -> PortResult<Project> {
        let record = sqlx::query_as::<_, ProjectRecord>(
            "SELECT id, user_id, name, description, tech_stack, created_at \
             FROM projects WHERE id = $1 AND user_id = $2",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("Project {} not found", project_id)))?;
        Ok(record.to_domain())
    }

    async fn delete_project_with_entries(&self, project_id: Uuid) -> PortResult<()> {
        // Children first, then the parent, in one transaction so a failure
        // never leaves a half-deleted project behind.
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        sqlx::query("DELETE FROM entries WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!(
                "Project {} not found",
                project_id
            )));
        }
        tx.commit().await.map_err(unexpected)?;
        Ok(())
    }

    async fn search_projects(&self, user_id: Uuid, query: &str) -> PortResult<Vec<Project>> {
        let records = sqlx::query_as::<_, ProjectRecord>(
            "SELECT id, user_id, name, description, tech_stack, created_at \
             FROM projects WHERE user_id = $1 AND name ILIKE '%' || $2 || '%' \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .bind(query)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn insert_entry(&self, draft: NewEntry) -> PortResult<Entry> {
        let record = sqlx::query_as::<_, EntryRecord>(&format!(
            "INSERT INTO entries (id, project_id, entry_type, title, error_message, context, \
             root_cause, solution, screenshot_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {}",
            ENTRY_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(draft.project_id)
        .bind(draft.entry_type.as_str())
        .bind(&draft.title)
        .bind(&draft.error_message)
        .bind(&draft.context)
        .bind(&draft.root_cause)
        .bind(&draft.solution)
        .bind(&draft.screenshot_url)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        record.to_domain()
    }

    async fn find_entry(&self, entry_id: Uuid, user_id: Uuid) -> PortResult<Entry> {
        // Ownership rides on the parent project, never on the entry row.
        let record = sqlx::query_as::<_, EntryRecord>(
            "SELECT e.id, e.project_id, e.entry_type, e.title, e.error_message, e.context, \
             e.root_cause, e.solution, e.screenshot_url, e.ai_explanation, \
             e.ai_interview_question, e.created_at \
             FROM entries e JOIN projects p ON p.id = e.project_id \
             WHERE e.id = $1 AND p.user_id = $2",
        )
        .bind(entry_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("Entry {} not found", entry_id)))?;
        record.to_domain()
    }

    async fn list_entries(
        &self,
        project_id: Uuid,
        entry_type: EntryType,
    ) -> PortResult<Vec<Entry>> {
        let records = sqlx::query_as::<_, EntryRecord>(&format!(
            "SELECT {} FROM entries WHERE project_id = $1 AND entry_type = $2 \
             ORDER BY created_at DESC",
            ENTRY_COLUMNS
        ))
        .bind(project_id)
        .bind(entry_type.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn count_entries(&self, project_id: Uuid) -> PortResult<EntryCounts> {
        let record = sqlx::query_as::<_, CountsRecord>(
            "SELECT COUNT(*) FILTER (WHERE entry_type = 'BUG') AS bugs, \
             COUNT(*) FILTER (WHERE entry_type = 'DECISION') AS decisions \
             FROM entries WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(EntryCounts {
            bugs: record.bugs,
            decisions: record.decisions,
        })
    }

    async fn update_entry(&self, entry_id: Uuid, patch: EntryPatch) -> PortResult<Entry> {
        let record = sqlx::query_as::<_, EntryRecord>(&format!(
            "UPDATE entries SET title = $2, error_message = $3, context = $4, \
             root_cause = $5, solution = $6 WHERE id = $1 RETURNING {}",
            ENTRY_COLUMNS
        ))
        .bind(entry_id)
        .bind(&patch.title)
        .bind(&patch.error_message)
        .bind(&patch.context)
        .bind(&patch.root_cause)
        .bind(&patch.solution)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("Entry {} not found", entry_id)))?;
        record.to_domain()
    }

    async fn set_enrichment(
        &self,
        entry_id: Uuid,
        explanation: &str,
        interview_question: &str,
    ) -> PortResult<()> {
        sqlx::query(
            "UPDATE entries SET ai_explanation = $2, ai_interview_question = $3 WHERE id = $1",
        )
        .bind(entry_id)
        .bind(explanation)
        .bind(interview_question)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    async fn delete_entry(&self, entry_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM entries WHERE id = $1")
            .bind(entry_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Entry {} not found", entry_id)));
        }
        Ok(())
    }

    async fn search_entries(
        &self,
        user_id: Uuid,
        query: &str,
        entry_type: EntryType,
    ) -> PortResult<Vec<Entry>> {
        // Bugs additionally match on the error message; decisions never
        // carry one.
        let sql = match entry_type {
            EntryType::Bug => {
                "SELECT e.id, e.project_id, e.entry_type, e.title, e.error_message, e.context, \
                 e.root_cause, e.solution, e.screenshot_url, e.ai_explanation, \
                 e.ai_interview_question, e.created_at \
                 FROM entries e JOIN projects p ON p.id = e.project_id \
                 WHERE p.user_id = $1 AND e.entry_type = $2 \
                 AND (e.title ILIKE '%' || $3 || '%' \
                      OR e.error_message ILIKE '%' || $3 || '%' \
                      OR e.context ILIKE '%' || $3 || '%') \
                 ORDER BY e.created_at DESC"
            }
            EntryType::Decision => {
                "SELECT e.id, e.project_id, e.entry_type, e.title, e.error_message, e.context, \
                 e.root_cause, e.solution, e.screenshot_url, e.ai_explanation, \
                 e.ai_interview_question, e.created_at \
                 FROM entries e JOIN projects p ON p.id = e.project_id \
                 WHERE p.user_id = $1 AND e.entry_type = $2 \
                 AND (e.title ILIKE '%' || $3 || '%' OR e.context ILIKE '%' || $3 || '%') \
                 ORDER BY e.created_at DESC"
            }
        };
        let records = sqlx::query_as::<_, EntryRecord>(sql)
            .bind(user_id)
            .bind(entry_type.as_str())
            .bind(query)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        records.into_iter().map(|r| r.to_domain()).collect()
    }
}
