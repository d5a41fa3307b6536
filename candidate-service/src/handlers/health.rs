use crate::handlers::respond;
use crate::services::get_metrics;
use crate::startup::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use service_core::response::{empty_response, json_response};

#[derive(Debug, Default)]
pub struct HealthParams {
    pub details: Option<String>,
}

impl HealthParams {
    /// Repeated keys are allowed; the first `details` value wins.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let details = pairs
            .into_iter()
            .find(|(key, _)| key == "details")
            .map(|(_, value)| value);
        Self { details }
    }

    fn wants_details(&self) -> bool {
        self.details.as_deref().is_some_and(|v| !v.is_empty())
    }
}

/// Liveness report, computed per request.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub connected: String,
    pub hostname: String,
}

/// `GET /gtg`: empty 200, or connectivity plus host identity with `?details=`.
pub async fn check_health(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let params = HealthParams::from_pairs(pairs);
    respond("gtg", health(&state, &params).await)
}

async fn health(state: &AppState, params: &HealthParams) -> Result<Response, AppError> {
    if !params.wants_details() {
        return Ok(empty_response(StatusCode::OK));
    }

    let hostname = state.host.identity().await?;

    Ok(json_response(
        StatusCode::OK,
        &HealthStatus {
            connected: "true".to_string(),
            hostname,
        },
    ))
}

/// Readiness check for orchestrator probes: 200 only when the store answers.
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    match state.store.health_check().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}
