//! services/api/src/web/enrich_task.rs
//!
//! The fire-and-forget background task that enriches a freshly created bug
//! entry. Failure here never reaches the user; the entry simply keeps its
//! empty enrichment fields.

use bugvault_core::domain::Entry;
use std::sync::Arc;
use tracing::{error, info};

use crate::web::state::AppState;

/// Runs the enrichment step for one entry and stores the result.
///
/// Spawned from the create-entry handler after the response has been decided,
/// so the external LLM's latency and availability never affect the request.
pub async fn enrich_and_store(state: Arc<AppState>, entry: Entry) {
    info!("Enriching bug entry {}", entry.id);

    match state.service.enrich_entry(&entry).await {
        Ok(()) => info!("Stored enrichment for entry {}", entry.id),
        Err(e) => {
            // Degrade gracefully: the created entry stands, unenriched.
            error!("Enrichment failed for entry {}: {}", entry.id, e);
        }
    }
}
