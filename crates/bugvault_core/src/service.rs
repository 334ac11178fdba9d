//! crates/bugvault_core/src/service.rs
//!
//! The application core: one service struct that owns the authorization
//! guard, the project and entry lifecycles, and the global search. Handlers
//! never talk to the store for owned records except through here, which keeps
//! the ownership check on a single code path.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{
    Entry, EntryCounts, EntryPatch, EntryType, NewEntry, NewProject, Project, SearchResults,
};
use crate::enrichment;
use crate::ports::{EnrichmentService, PortError, PortResult, VaultStore};

/// Rejects blank required fields before anything touches the store.
fn require(field: &str, value: &str) -> PortResult<()> {
    if value.trim().is_empty() {
        return Err(PortError::Invalid(format!("{} is required", field)));
    }
    Ok(())
}

/// The entry lifecycle, project, and search services behind one handle.
#[derive(Clone)]
pub struct VaultService {
    store: Arc<dyn VaultStore>,
    enrichment: Arc<dyn EnrichmentService>,
}

impl VaultService {
    pub fn new(store: Arc<dyn VaultStore>, enrichment: Arc<dyn EnrichmentService>) -> Self {
        Self { store, enrichment }
    }

    //=====================================================================================
    // Authorization Guard
    //=====================================================================================

    /// Confirms the project exists and belongs to `user_id`. Absent and
    /// foreign records are both `NotFound`; callers cannot tell them apart.
    pub async fn authorize_project(&self, user_id: Uuid, project_id: Uuid) -> PortResult<Project> {
        self.store.find_project(project_id, user_id).await
    }

    /// Confirms the entry exists and its parent project belongs to
    /// `user_id`. Ownership is always transitive through the project; the
    /// entry row itself carries no owner.
    pub async fn authorize_entry(&self, user_id: Uuid, entry_id: Uuid) -> PortResult<Entry> {
        self.store.find_entry(entry_id, user_id).await
    }

    //=====================================================================================
    // Projects
    //=====================================================================================

    pub async fn create_project(&self, draft: NewProject) -> PortResult<Project> {
        require("name", &draft.name)?;
        self.store.insert_project(draft).await
    }

    pub async fn list_projects(&self, user_id: Uuid) -> PortResult<Vec<Project>> {
        self.store.list_projects(user_id).await
    }

    pub async fn get_project(
        &self,
        user_id: Uuid,
        project_id: Uuid,
    ) -> PortResult<(Project, EntryCounts)> {
        let project = self.authorize_project(user_id, project_id).await?;
        let counts = self.store.count_entries(project_id).await?;
        Ok((project, counts))
    }

    /// Deletes the project and every entry under it. The store runs the
    /// child-then-parent deletes in one transaction.
    pub async fn delete_project(&self, user_id: Uuid, project_id: Uuid) -> PortResult<()> {
        self.authorize_project(user_id, project_id).await?;
        self.store.delete_project_with_entries(project_id).await
    }

    //=====================================================================================
    // Entry Lifecycle
    //=====================================================================================

    /// Creates an entry under a project the caller owns. The enrichment
    /// fields always start empty; for bugs the caller is expected to follow
    /// up with `enrich_entry`, usually from a spawned task.
    pub async fn create_entry(&self, user_id: Uuid, draft: NewEntry) -> PortResult<Entry> {
        self.authorize_project(user_id, draft.project_id).await?;
        match draft.entry_type {
            EntryType::Bug => require("title", &draft.title)?,
            EntryType::Decision => {
                require("title", &draft.title)?;
                require("context", &draft.context)?;
                require("solution", &draft.solution)?;
            }
        }
        self.store.insert_entry(draft).await
    }

    /// The deferred enrichment step. Only bugs are enriched; for anything
    /// else this returns without calling the adapter. Adapter and parse
    /// results land via the store's second write; the caller decides what to
    /// do with a failure (the background task logs and drops it, leaving the
    /// entry with empty enrichment fields).
    pub async fn enrich_entry(&self, entry: &Entry) -> PortResult<()> {
        if entry.entry_type != EntryType::Bug {
            return Ok(());
        }
        let prompt = enrichment::build_prompt(entry);
        let reply = self.enrichment.generate(&prompt).await?;
        let parsed = enrichment::parse_reply(&reply);
        self.store
            .set_enrichment(entry.id, &parsed.explanation, &parsed.interview_question)
            .await
    }

    pub async fn get_entry(&self, user_id: Uuid, entry_id: Uuid) -> PortResult<Entry> {
        self.authorize_entry(user_id, entry_id).await
    }

    pub async fn list_entries(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        entry_type: EntryType,
    ) -> PortResult<Vec<Entry>> {
        self.authorize_project(user_id, project_id).await?;
        self.store.list_entries(project_id, entry_type).await
    }

    /// Overwrites the mutable fields. Decisions never carry the bug-only
    /// fields, so for them the existing (empty) values are kept regardless
    /// of what the client sent. Enrichment is never re-run.
    pub async fn update_entry(
        &self,
        user_id: Uuid,
        entry_id: Uuid,
        mut patch: EntryPatch,
    ) -> PortResult<Entry> {
        let existing = self.authorize_entry(user_id, entry_id).await?;
        require("title", &patch.title)?;
        if existing.entry_type == EntryType::Decision {
            patch.error_message = existing.error_message.clone();
            patch.root_cause = existing.root_cause.clone();
        }
        self.store.update_entry(entry_id, patch).await
    }

    /// Hard delete. Deleting an id that no longer exists (or never belonged
    /// to the caller) reports `NotFound`, never a silent success.
    pub async fn delete_entry(&self, user_id: Uuid, entry_id: Uuid) -> PortResult<()> {
        self.authorize_entry(user_id, entry_id).await?;
        self.store.delete_entry(entry_id).await
    }

    //=====================================================================================
    // Search
    //=====================================================================================

    /// Case-insensitive substring search across the caller's three
    /// collections. An empty query still lists every project (the empty
    /// substring matches all names) but skips the entry queries entirely.
    pub async fn search(&self, user_id: Uuid, query: &str) -> PortResult<SearchResults> {
        let projects = self.store.search_projects(user_id, query).await?;
        if query.is_empty() {
            return Ok(SearchResults {
                projects,
                ..SearchResults::default()
            });
        }
        let bugs = self
            .store
            .search_entries(user_id, query, EntryType::Bug)
            .await?;
        let decisions = self
            .store
            .search_entries(user_id, query, EntryType::Decision)
            .await?;
        Ok(SearchResults {
            projects,
            bugs,
            decisions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{User, UserCredentials};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    //=====================================================================================
    // In-memory store + scripted enrichment stub
    //=====================================================================================

    #[derive(Default)]
    struct MemoryInner {
        projects: HashMap<Uuid, Project>,
        entries: HashMap<Uuid, Entry>,
    }

    #[derive(Default)]
    struct MemoryStore {
        inner: Mutex<MemoryInner>,
    }

    impl MemoryStore {
        fn owner_of(inner: &MemoryInner, entry: &Entry) -> Option<Uuid> {
            inner.projects.get(&entry.project_id).map(|p| p.user_id)
        }
    }

    #[async_trait]
    impl VaultStore for MemoryStore {
        async fn create_user_with_email(
            &self,
            _email: &str,
            _name: &str,
            _hashed_password: &str,
        ) -> PortResult<User> {
            unimplemented!("not exercised by service tests")
        }

        async fn get_user_by_email(&self, _email: &str) -> PortResult<UserCredentials> {
            unimplemented!("not exercised by service tests")
        }

        async fn create_auth_session(
            &self,
            _session_id: &str,
            _user_id: Uuid,
            _expires_at: DateTime<Utc>,
        ) -> PortResult<()> {
            unimplemented!("not exercised by service tests")
        }

        async fn validate_auth_session(&self, _session_id: &str) -> PortResult<Uuid> {
            unimplemented!("not exercised by service tests")
        }

        async fn delete_auth_session(&self, _session_id: &str) -> PortResult<()> {
            unimplemented!("not exercised by service tests")
        }

        async fn insert_project(&self, draft: NewProject) -> PortResult<Project> {
            let project = Project {
                id: Uuid::new_v4(),
                user_id: draft.user_id,
                name: draft.name,
                description: draft.description,
                tech_stack: draft.tech_stack,
                created_at: Utc::now(),
            };
            let mut inner = self.inner.lock().unwrap();
            inner.projects.insert(project.id, project.clone());
            Ok(project)
        }

        async fn list_projects(&self, user_id: Uuid) -> PortResult<Vec<Project>> {
            let inner = self.inner.lock().unwrap();
            let mut projects: Vec<Project> = inner
                .projects
                .values()
                .filter(|p| p.user_id == user_id)
                .cloned()
                .collect();
            projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(projects)
        }

        async fn find_project(&self, project_id: Uuid, user_id: Uuid) -> PortResult<Project> {
            let inner = self.inner.lock().unwrap();
            inner
                .projects
                .get(&project_id)
                .filter(|p| p.user_id == user_id)
                .cloned()
                .ok_or_else(|| PortError::NotFound(format!("Project {} not found", project_id)))
        }

        async fn delete_project_with_entries(&self, project_id: Uuid) -> PortResult<()> {
            let mut inner = self.inner.lock().unwrap();
            inner.entries.retain(|_, e| e.project_id != project_id);
            inner.projects.remove(&project_id);
            Ok(())
        }

        async fn search_projects(&self, user_id: Uuid, query: &str) -> PortResult<Vec<Project>> {
            let needle = query.to_lowercase();
            let inner = self.inner.lock().unwrap();
            Ok(inner
                .projects
                .values()
                .filter(|p| p.user_id == user_id && p.name.to_lowercase().contains(&needle))
                .cloned()
                .collect())
        }

        async fn insert_entry(&self, draft: NewEntry) -> PortResult<Entry> {
            let entry = Entry {
                id: Uuid::new_v4(),
                project_id: draft.project_id,
                entry_type: draft.entry_type,
                title: draft.title,
                error_message: draft.error_message,
                context: draft.context,
                root_cause: draft.root_cause,
                solution: draft.solution,
                screenshot_url: draft.screenshot_url,
                ai_explanation: String::new(),
                ai_interview_question: String::new(),
                created_at: Utc::now(),
            };
            let mut inner = self.inner.lock().unwrap();
            inner.entries.insert(entry.id, entry.clone());
            Ok(entry)
        }

        async fn find_entry(&self, entry_id: Uuid, user_id: Uuid) -> PortResult<Entry> {
            let inner = self.inner.lock().unwrap();
            inner
                .entries
                .get(&entry_id)
                .filter(|e| Self::owner_of(&inner, e) == Some(user_id))
                .cloned()
                .ok_or_else(|| PortError::NotFound(format!("Entry {} not found", entry_id)))
        }

        async fn list_entries(
            &self,
            project_id: Uuid,
            entry_type: EntryType,
        ) -> PortResult<Vec<Entry>> {
            let inner = self.inner.lock().unwrap();
            let mut entries: Vec<Entry> = inner
                .entries
                .values()
                .filter(|e| e.project_id == project_id && e.entry_type == entry_type)
                .cloned()
                .collect();
            entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(entries)
        }

        async fn count_entries(&self, project_id: Uuid) -> PortResult<EntryCounts> {
            let inner = self.inner.lock().unwrap();
            let mut counts = EntryCounts::default();
            for entry in inner.entries.values() {
                if entry.project_id != project_id {
                    continue;
                }
                match entry.entry_type {
                    EntryType::Bug => counts.bugs += 1,
                    EntryType::Decision => counts.decisions += 1,
                }
            }
            Ok(counts)
        }

        async fn update_entry(&self, entry_id: Uuid, patch: EntryPatch) -> PortResult<Entry> {
            let mut inner = self.inner.lock().unwrap();
            let entry = inner
                .entries
                .get_mut(&entry_id)
                .ok_or_else(|| PortError::NotFound(format!("Entry {} not found", entry_id)))?;
            entry.title = patch.title;
            entry.error_message = patch.error_message;
            entry.context = patch.context;
            entry.root_cause = patch.root_cause;
            entry.solution = patch.solution;
            Ok(entry.clone())
        }

        async fn set_enrichment(
            &self,
            entry_id: Uuid,
            explanation: &str,
            interview_question: &str,
        ) -> PortResult<()> {
            let mut inner = self.inner.lock().unwrap();
            let entry = inner
                .entries
                .get_mut(&entry_id)
                .ok_or_else(|| PortError::NotFound(format!("Entry {} not found", entry_id)))?;
            entry.ai_explanation = explanation.to_string();
            entry.ai_interview_question = interview_question.to_string();
            Ok(())
        }

        async fn delete_entry(&self, entry_id: Uuid) -> PortResult<()> {
            let mut inner = self.inner.lock().unwrap();
            inner
                .entries
                .remove(&entry_id)
                .map(|_| ())
                .ok_or_else(|| PortError::NotFound(format!("Entry {} not found", entry_id)))
        }

        async fn search_entries(
            &self,
            user_id: Uuid,
            query: &str,
            entry_type: EntryType,
        ) -> PortResult<Vec<Entry>> {
            let needle = query.to_lowercase();
            let inner = self.inner.lock().unwrap();
            Ok(inner
                .entries
                .values()
                .filter(|e| {
                    e.entry_type == entry_type
                        && MemoryStore::owner_of(&inner, e) == Some(user_id)
                })
                .filter(|e| {
                    let in_error = entry_type == EntryType::Bug
                        && e.error_message
                            .as_deref()
                            .is_some_and(|m| m.to_lowercase().contains(&needle));
                    e.title.to_lowercase().contains(&needle)
                        || e.context.to_lowercase().contains(&needle)
                        || in_error
                })
                .cloned()
                .collect())
        }
    }

    /// Enrichment stub: replays a canned reply, or fails when given none.
    struct StubEnricher {
        reply: Option<String>,
        calls: AtomicUsize,
    }

    impl StubEnricher {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EnrichmentService for StubEnricher {
        async fn generate(&self, _prompt: &str) -> PortResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Some(reply) => Ok(reply.clone()),
                None => Err(PortError::Unexpected("enrichment backend down".to_string())),
            }
        }
    }

    //=====================================================================================
    // Fixtures
    //=====================================================================================

    fn service_with(enricher: Arc<StubEnricher>) -> (VaultService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        let service = VaultService::new(store.clone(), enricher);
        (service, store)
    }

    fn project_draft(user_id: Uuid) -> NewProject {
        NewProject {
            user_id,
            name: "checkout service".to_string(),
            description: "payments".to_string(),
            tech_stack: "rust".to_string(),
        }
    }

    fn bug_draft(project_id: Uuid, title: &str) -> NewEntry {
        NewEntry {
            project_id,
            entry_type: EntryType::Bug,
            title: title.to_string(),
            error_message: Some("connection reset".to_string()),
            context: "under load".to_string(),
            root_cause: None,
            solution: "retry with backoff".to_string(),
            screenshot_url: None,
        }
    }

    fn decision_draft(project_id: Uuid, title: &str) -> NewEntry {
        NewEntry {
            project_id,
            entry_type: EntryType::Decision,
            title: title.to_string(),
            error_message: None,
            context: "needed a queue".to_string(),
            root_cause: None,
            solution: "picked postgres-backed jobs".to_string(),
            screenshot_url: None,
        }
    }

    //=====================================================================================
    // Authorization
    //=====================================================================================

    #[tokio::test]
    async fn foreign_project_reads_as_not_found() {
        let (service, _) = service_with(Arc::new(StubEnricher::failing()));
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let project = service.create_project(project_draft(owner)).await.unwrap();

        let err = service.get_project(intruder, project.id).await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
        let err = service
            .delete_project(intruder, project.id)
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
    }

    #[tokio::test]
    async fn foreign_entry_access_is_not_found_through_the_project() {
        let (service, _) = service_with(Arc::new(StubEnricher::failing()));
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let project = service.create_project(project_draft(owner)).await.unwrap();
        let entry = service
            .create_entry(owner, bug_draft(project.id, "flaky test"))
            .await
            .unwrap();

        assert!(matches!(
            service.get_entry(intruder, entry.id).await.unwrap_err(),
            PortError::NotFound(_)
        ));
        assert!(matches!(
            service.delete_entry(intruder, entry.id).await.unwrap_err(),
            PortError::NotFound(_)
        ));
        // The owner still sees it.
        assert_eq!(service.get_entry(owner, entry.id).await.unwrap().id, entry.id);
    }

    //=====================================================================================
    // Project lifecycle
    //=====================================================================================

    #[tokio::test]
    async fn blank_project_name_is_invalid() {
        let (service, _) = service_with(Arc::new(StubEnricher::failing()));
        let mut draft = project_draft(Uuid::new_v4());
        draft.name = "   ".to_string();
        assert!(matches!(
            service.create_project(draft).await.unwrap_err(),
            PortError::Invalid(_)
        ));
    }

    #[tokio::test]
    async fn deleting_a_project_removes_every_entry() {
        let (service, store) = service_with(Arc::new(StubEnricher::failing()));
        let user = Uuid::new_v4();
        let project = service.create_project(project_draft(user)).await.unwrap();
        service
            .create_entry(user, bug_draft(project.id, "one"))
            .await
            .unwrap();
        service
            .create_entry(user, decision_draft(project.id, "two"))
            .await
            .unwrap();

        service.delete_project(user, project.id).await.unwrap();

        let counts = store.count_entries(project.id).await.unwrap();
        assert_eq!(counts.bugs, 0);
        assert_eq!(counts.decisions, 0);
        assert!(matches!(
            service.get_project(user, project.id).await.unwrap_err(),
            PortError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn project_overview_counts_each_variant() {
        let (service, _) = service_with(Arc::new(StubEnricher::failing()));
        let user = Uuid::new_v4();
        let project = service.create_project(project_draft(user)).await.unwrap();
        service
            .create_entry(user, bug_draft(project.id, "a"))
            .await
            .unwrap();
        service
            .create_entry(user, bug_draft(project.id, "b"))
            .await
            .unwrap();
        service
            .create_entry(user, decision_draft(project.id, "c"))
            .await
            .unwrap();

        let (_, counts) = service.get_project(user, project.id).await.unwrap();
        assert_eq!(counts.bugs, 2);
        assert_eq!(counts.decisions, 1);
    }

    //=====================================================================================
    // Entry lifecycle and enrichment
    //=====================================================================================

    #[tokio::test]
    async fn bug_enrichment_stores_the_parsed_sections() {
        let enricher = Arc::new(StubEnricher::replying(
            "Explanation:\nfoo\n\nInterview Question:\nbar",
        ));
        let (service, _) = service_with(enricher.clone());
        let user = Uuid::new_v4();
        let project = service.create_project(project_draft(user)).await.unwrap();
        let entry = service
            .create_entry(user, bug_draft(project.id, "T"))
            .await
            .unwrap();
        assert!(!entry.is_enriched());

        service.enrich_entry(&entry).await.unwrap();

        let enriched = service.get_entry(user, entry.id).await.unwrap();
        assert_eq!(enriched.ai_explanation, "foo");
        assert_eq!(enriched.ai_interview_question, "bar");
        assert!(enriched.is_enriched());
        assert_eq!(enricher.call_count(), 1);
    }

    #[tokio::test]
    async fn enrichment_failure_leaves_the_entry_intact() {
        let (service, _) = service_with(Arc::new(StubEnricher::failing()));
        let user = Uuid::new_v4();
        let project = service.create_project(project_draft(user)).await.unwrap();
        let entry = service
            .create_entry(user, bug_draft(project.id, "T"))
            .await
            .unwrap();

        assert!(service.enrich_entry(&entry).await.is_err());

        // The creation stands; the enrichment fields just stay empty.
        let stored = service.get_entry(user, entry.id).await.unwrap();
        assert_eq!(stored.ai_explanation, "");
        assert_eq!(stored.ai_interview_question, "");
    }

    #[tokio::test]
    async fn decisions_never_call_the_enrichment_adapter() {
        let enricher = Arc::new(StubEnricher::replying("Explanation:\nx\nInterview Question:\ny"));
        let (service, _) = service_with(enricher.clone());
        let user = Uuid::new_v4();
        let project = service.create_project(project_draft(user)).await.unwrap();
        let entry = service
            .create_entry(user, decision_draft(project.id, "D"))
            .await
            .unwrap();

        service.enrich_entry(&entry).await.unwrap();

        assert_eq!(enricher.call_count(), 0);
        let stored = service.get_entry(user, entry.id).await.unwrap();
        assert_eq!(stored.ai_explanation, "");
    }

    #[tokio::test]
    async fn decision_creation_requires_context_and_solution() {
        let (service, _) = service_with(Arc::new(StubEnricher::failing()));
        let user = Uuid::new_v4();
        let project = service.create_project(project_draft(user)).await.unwrap();
        let mut draft = decision_draft(project.id, "D");
        draft.context = String::new();
        assert!(matches!(
            service.create_entry(user, draft).await.unwrap_err(),
            PortError::Invalid(_)
        ));
        // A bug with the same blank context is fine; only the title is
        // required for bugs.
        let mut bug = bug_draft(project.id, "B");
        bug.context = String::new();
        assert!(service.create_entry(user, bug).await.is_ok());
    }

    #[tokio::test]
    async fn update_round_trip_changes_only_the_patched_fields() {
        let (service, _) = service_with(Arc::new(StubEnricher::failing()));
        let user = Uuid::new_v4();
        let project = service.create_project(project_draft(user)).await.unwrap();
        let created = service
            .create_entry(user, bug_draft(project.id, "A"))
            .await
            .unwrap();

        let patch = EntryPatch {
            title: "B".to_string(),
            error_message: created.error_message.clone(),
            context: created.context.clone(),
            root_cause: created.root_cause.clone(),
            solution: created.solution.clone(),
        };
        service.update_entry(user, created.id, patch).await.unwrap();

        let fetched = service.get_entry(user, created.id).await.unwrap();
        assert_eq!(fetched.title, "B");
        assert_eq!(fetched.context, created.context);
        assert_eq!(fetched.solution, created.solution);
        assert_eq!(fetched.error_message, created.error_message);
        assert_eq!(fetched.project_id, created.project_id);
    }

    #[tokio::test]
    async fn decision_updates_cannot_smuggle_in_bug_fields() {
        let (service, _) = service_with(Arc::new(StubEnricher::failing()));
        let user = Uuid::new_v4();
        let project = service.create_project(project_draft(user)).await.unwrap();
        let created = service
            .create_entry(user, decision_draft(project.id, "D"))
            .await
            .unwrap();

        let patch = EntryPatch {
            title: "D2".to_string(),
            error_message: Some("injected".to_string()),
            context: "updated context".to_string(),
            root_cause: Some("injected".to_string()),
            solution: "updated solution".to_string(),
        };
        let updated = service.update_entry(user, created.id, patch).await.unwrap();
        assert_eq!(updated.title, "D2");
        assert_eq!(updated.error_message, None);
        assert_eq!(updated.root_cause, None);
    }

    #[tokio::test]
    async fn second_delete_reports_not_found() {
        let (service, _) = service_with(Arc::new(StubEnricher::failing()));
        let user = Uuid::new_v4();
        let project = service.create_project(project_draft(user)).await.unwrap();
        let entry = service
            .create_entry(user, bug_draft(project.id, "gone"))
            .await
            .unwrap();

        service.delete_entry(user, entry.id).await.unwrap();
        assert!(matches!(
            service.delete_entry(user, entry.id).await.unwrap_err(),
            PortError::NotFound(_)
        ));
    }

    //=====================================================================================
    // Search
    //=====================================================================================

    #[tokio::test]
    async fn empty_query_lists_projects_but_skips_entries() {
        let (service, _) = service_with(Arc::new(StubEnricher::failing()));
        let user = Uuid::new_v4();
        let project = service.create_project(project_draft(user)).await.unwrap();
        service
            .create_entry(user, bug_draft(project.id, "timeout"))
            .await
            .unwrap();

        let results = service.search(user, "").await.unwrap();
        assert_eq!(results.projects.len(), 1);
        assert!(results.bugs.is_empty());
        assert!(results.decisions.is_empty());
    }

    #[tokio::test]
    async fn search_is_case_insensitive_and_type_filtered() {
        let (service, _) = service_with(Arc::new(StubEnricher::failing()));
        let user = Uuid::new_v4();
        let project = service.create_project(project_draft(user)).await.unwrap();
        service
            .create_entry(user, bug_draft(project.id, "Timeout on checkout"))
            .await
            .unwrap();
        service
            .create_entry(user, decision_draft(project.id, "timeout policy for checkout"))
            .await
            .unwrap();

        let results = service.search(user, "TIMEOUT").await.unwrap();
        assert_eq!(results.bugs.len(), 1);
        assert_eq!(results.decisions.len(), 1);
        assert_eq!(results.bugs[0].entry_type, EntryType::Bug);
        assert_eq!(results.decisions[0].entry_type, EntryType::Decision);
    }

    #[tokio::test]
    async fn bug_search_matches_the_error_message_field() {
        let (service, _) = service_with(Arc::new(StubEnricher::failing()));
        let user = Uuid::new_v4();
        let project = service.create_project(project_draft(user)).await.unwrap();
        service
            .create_entry(user, bug_draft(project.id, "unrelated title"))
            .await
            .unwrap();

        // bug_draft sets error_message to "connection reset".
        let results = service.search(user, "connection RESET").await.unwrap();
        assert_eq!(results.bugs.len(), 1);
        assert!(results.decisions.is_empty());
    }

    #[tokio::test]
    async fn search_never_crosses_user_boundaries() {
        let (service, _) = service_with(Arc::new(StubEnricher::failing()));
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let project = service.create_project(project_draft(alice)).await.unwrap();
        service
            .create_entry(alice, bug_draft(project.id, "secret bug"))
            .await
            .unwrap();

        let results = service.search(bob, "secret").await.unwrap();
        assert!(results.projects.is_empty());
        assert!(results.bugs.is_empty());
        assert!(results.decisions.is_empty());
    }
}
