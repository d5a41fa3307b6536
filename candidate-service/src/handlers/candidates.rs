use crate::handlers::respond;
use crate::startup::AppState;
use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::Response,
};
use service_core::error::AppError;
use service_core::response::json_response;

/// `GET /candidates`: every stored candidate as a JSON array.
pub async fn list_candidates(State(state): State<AppState>, method: Method) -> Response {
    respond("candidates", list(&state, &method).await)
}

async fn list(state: &AppState, method: &Method) -> Result<Response, AppError> {
    if *method != Method::GET {
        return Err(AppError::MethodNotAllowed);
    }

    let candidates = state.store.list(&state.collection).await?;
    tracing::debug!(count = candidates.len(), "Listed candidates");

    Ok(json_response(StatusCode::OK, &candidates))
}
