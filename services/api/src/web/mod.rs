pub mod auth;
pub mod enrich_task;
pub mod entries;
pub mod middleware;
pub mod projects;
pub mod rest;
pub mod search;
pub mod state;
pub mod upload;

use axum::http::StatusCode;
use bugvault_core::ports::PortError;
use tracing::error;

pub use middleware::require_auth;
pub use rest::ApiDoc;

/// Maps a core error onto its HTTP status and client-facing message.
///
/// `NotFound` covers both absent and foreign records, so the message never
/// confirms existence to a non-owner. `Unexpected` details are logged and
/// replaced with a generic 500 body.
pub(crate) fn port_error(err: PortError) -> (StatusCode, String) {
    match err {
        PortError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
        PortError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found".to_string()),
        PortError::Invalid(msg) => (StatusCode::BAD_REQUEST, msg),
        PortError::Unexpected(detail) => {
            error!("Internal error: {}", detail);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
            )
        }
    }
}
