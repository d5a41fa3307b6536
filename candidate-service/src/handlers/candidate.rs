use crate::handlers::respond;
use crate::models::{Candidate, CandidateName, InvalidName};
use crate::startup::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::{Method, StatusCode, Uri},
    response::Response,
};
use service_core::error::AppError;
use service_core::response::{error_response, json_response};

/// `GET|POST /candidates/<name>`.
///
/// The wildcard capture is percent-decoded, so `a%2Fb` is validated as `a/b`.
pub async fn handle_candidate(
    State(state): State<AppState>,
    method: Method,
    tail: Result<Path<String>, PathRejection>,
) -> Response {
    let name = match tail {
        Ok(Path(tail)) => CandidateName::from_path(&format!("/{}", tail)),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Undecodable candidate path");
            Err(InvalidName)
        }
    };
    respond("candidate", candidate(&state, &method, name).await)
}

/// Router fallback. `/candidates/` (empty name) is not matched by the
/// wildcard route, so it is routed here to go through name validation.
pub async fn candidate_fallback(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> Response {
    match uri.path().strip_prefix("/candidates") {
        Some(path) if path.starts_with('/') => {
            let name = CandidateName::from_path(path);
            respond("candidate", candidate(&state, &method, name).await)
        }
        _ => error_response(StatusCode::NOT_FOUND, "not found"),
    }
}

/// Validate the name, then read or upsert the candidate it identifies.
///
/// Validation runs before method dispatch, so a bad name is a 400 for every
/// verb and the store is never touched.
pub async fn candidate(
    state: &AppState,
    method: &Method,
    name: Result<CandidateName, InvalidName>,
) -> Result<Response, AppError> {
    let name = name?;

    match *method {
        Method::GET => {
            let document = state
                .store
                .get(&state.collection, name.as_str())
                .await?
                .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("name not found")))?;

            Ok(json_response(StatusCode::OK, &document))
        }
        Method::POST => {
            let candidate = Candidate::new(&name);
            state
                .store
                .set(&state.collection, name.as_str(), candidate.to_document()?)
                .await?;

            tracing::info!(name = %name, "Candidate stored");
            Ok(json_response(StatusCode::OK, &candidate))
        }
        _ => Err(AppError::MethodNotAllowed),
    }
}
