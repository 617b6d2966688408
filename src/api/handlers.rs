use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header::ACCEPT_LANGUAGE};
use serde::Serialize;
use tracing::info;

use super::AppState;
use super::errors::{ApiError, ErrorBody};
use crate::search::{SearchResponse, parse_request, run_search};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn search_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SearchResponse>, ApiError> {
    let accept_language = headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok());

    let request =
        parse_request(&body, accept_language, state.max_results()).map_err(ApiError::input)?;
    let lang = request.lang;

    info!(
        query = %request.query,
        lang = lang.code(),
        limit = request.limit,
        images = request.images.len(),
        "api:search"
    );

    let openai = state.openai().map_err(|e| ApiError::new(e, lang))?;
    let response = run_search(openai, request)
        .await
        .map_err(|e| ApiError::new(e, lang))?;

    Ok(Json(response))
}

pub async fn api_not_found() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            detail: "Not found".to_string(),
        }),
    )
}
