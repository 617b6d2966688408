use serde_json::Value;

use super::error::InputError;
use super::lang::pick_lang;
use super::types::SearchRequest;

pub const MAX_IMAGES: usize = 6;
pub const DEFAULT_LIMIT: usize = 8;
pub const MAX_LIMIT: usize = 10;

const DATA_IMAGE_PREFIX: &str = "data:image/";

/// Validate a raw `/api/search` body.
///
/// `max_results` is the configured ceiling; the effective limit never exceeds
/// `min(MAX_LIMIT, max_results)` and is at least 1.
pub fn parse_request(
    body: &[u8],
    accept_language: Option<&str>,
    max_results: usize,
) -> Result<SearchRequest, InputError> {
    let Ok(Value::Object(body)) = serde_json::from_slice::<Value>(body) else {
        return Err(InputError::MalformedBody);
    };

    let query = body
        .get("query")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    let images = parse_images(body.get("images"))?;

    if query.is_empty() && images.is_empty() {
        return Err(InputError::EmptyRequest);
    }

    let lang = pick_lang(body.get("lang").and_then(Value::as_str), accept_language);
    let limit = clamp_limit(parse_limit(body.get("limit")), max_results);

    Ok(SearchRequest {
        query,
        lang,
        limit,
        images,
    })
}

fn parse_images(value: Option<&Value>) -> Result<Vec<String>, InputError> {
    let items = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(InputError::ImagesNotArray),
    };

    let images: Vec<String> = items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(MAX_IMAGES)
        .map(str::to_string)
        .collect();

    if images.iter().any(|img| !img.starts_with(DATA_IMAGE_PREFIX)) {
        return Err(InputError::ImageNotDataUrl);
    }
    Ok(images)
}

/// Integers and whole-number strings only; `"5.0"`, `"7abc"` or `2.5` mean the default.
fn parse_limit(value: Option<&Value>) -> i64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.unwrap_or(DEFAULT_LIMIT as i64)
}

fn clamp_limit(limit: i64, max_results: usize) -> usize {
    let ceiling = MAX_LIMIT.min(max_results).max(1);
    limit.clamp(1, ceiling as i64) as usize
}
