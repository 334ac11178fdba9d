//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use bugvault_core::ports::{ImageHostService, VaultStore};
use bugvault_core::service::VaultService;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
///
/// The persistence handle lives here with an explicit lifecycle: the pool is
/// opened in `main` before the router is built and dropped at shutdown.
#[derive(Clone)]
pub struct AppState {
    /// Raw store access, used by the auth endpoints only. Everything that
    /// touches owned records goes through `service`.
    pub db: Arc<dyn VaultStore>,
    pub service: VaultService,
    pub uploader: Arc<dyn ImageHostService>,
    pub config: Arc<Config>,
}
