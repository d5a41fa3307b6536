pub mod candidate;
pub mod candidates;
pub mod health;

pub use candidate::{candidate_fallback, handle_candidate};
pub use candidates::list_candidates;
pub use health::{check_health, metrics_endpoint, readiness_check};

use axum::response::{IntoResponse, Response};
use service_core::error::AppError;

/// Turn a handler outcome into a response, logging server-side failures with
/// the handler name before they are flattened into the error envelope.
pub(crate) fn respond(handler: &'static str, result: Result<Response, AppError>) -> Response {
    match result {
        Ok(response) => response,
        Err(err) => {
            if err.status_code().is_server_error() {
                tracing::error!(
                    handler,
                    error = ?err,
                    "An error occurred in the {} handler",
                    handler
                );
            } else {
                tracing::debug!(handler, error = %err, "Request rejected");
            }
            err.into_response()
        }
    }
}
