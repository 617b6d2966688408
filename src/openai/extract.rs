use serde_json::Value;
use tracing::{debug, warn};

use super::types::{ContentPart, ResponsesEnvelope};
use crate::search::types::ParsedPayload;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("provider body is not a valid response envelope: {0}")]
    InvalidEnvelope(#[from] serde_json::Error),

    #[error("provider returned no output text")]
    EmptyOutput,

    #[error("model output does not contain a JSON object")]
    NoJsonObject,
}

/// Turn a raw Responses API body into the model's parsed JSON payload.
pub fn extract_payload(body: &str) -> Result<ParsedPayload, ExtractError> {
    let envelope: ResponsesEnvelope = serde_json::from_str(body)?;
    let text = extract_output_text(&envelope).ok_or_else(|| {
        warn!("provider returned empty output text");
        ExtractError::EmptyOutput
    })?;

    let object = parse_json_object(&text).ok_or(ExtractError::NoJsonObject)?;
    let payload = ParsedPayload::from_object(&object);
    debug!(items = payload.results.len(), has_answer = payload.answer.is_some(), "payload parsed");
    Ok(payload)
}

/// Prefer the flattened `output_text`; otherwise join every `output_text` part.
pub fn extract_output_text(envelope: &ResponsesEnvelope) -> Option<String> {
    if let Some(text) = envelope.output_text.as_deref()
        && !text.trim().is_empty()
    {
        return Some(text.to_string());
    }

    let joined = envelope
        .output
        .iter()
        .flat_map(|item| &item.content)
        .filter_map(|part| match part {
            ContentPart::OutputText { text } if !text.is_empty() => Some(text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n");

    (!joined.trim().is_empty()).then_some(joined)
}

/// Parse `text` as a JSON object, falling back to the span between the first `{`
/// and the last `}` when the model wrapped its JSON in prose or code fences.
pub fn parse_json_object(text: &str) -> Option<serde_json::Map<String, Value>> {
    let raw = text.trim();
    if let Ok(Value::Object(object)) = serde_json::from_str(raw) {
        return Some(object);
    }

    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str(&raw[start..=end]) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}
