pub mod domain;
pub mod enrichment;
pub mod ports;
pub mod service;

pub use domain::{
    AuthSession, Entry, EntryCounts, EntryPatch, EntryType, NewEntry, NewProject, Project,
    SearchResults, User, UserCredentials,
};
pub use ports::{EnrichmentService, ImageHostService, PortError, PortResult, VaultStore};
pub use service::VaultService;
