use std::time::Instant;

use tracing::info;

use super::answer::{fallback_answer, normalize_answer};
use super::error::SearchError;
use super::prompt::build_input;
use super::sanitize::sanitize_results;
use super::types::{SearchRequest, SearchResponse};
use crate::openai::{ModelProvider, extract_payload};

/// Run one search against the model: build the prompt, make a single provider
/// call, then extract and sanitize what came back.
pub async fn run_search(
    provider: &impl ModelProvider,
    request: SearchRequest,
) -> Result<SearchResponse, SearchError> {
    let input = build_input(&request);

    let started = Instant::now();
    let body = provider.create_response(input).await?;
    let took_ms = started.elapsed().as_millis() as u64;

    let payload = extract_payload(&body)?;
    let results = sanitize_results(&payload.results, request.limit);
    let answer = normalize_answer(payload.answer.as_deref())
        .or_else(|| fallback_answer(&results, request.lang));

    info!(
        lang = request.lang.code(),
        candidates = payload.results.len(),
        results = results.len(),
        took_ms,
        "search complete"
    );

    Ok(SearchResponse {
        query: request.query,
        lang: request.lang,
        answer,
        results,
        took_ms,
    })
}
