use serde::Serialize;
use serde_json::{Map, Value};

use super::Lang;

/// Validated input for one search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub lang: Lang,
    pub limit: usize,
    pub images: Vec<String>,
}

/// JSON object the model returned, before sanitization.
#[derive(Debug, Default, PartialEq)]
pub struct ParsedPayload {
    pub results: Vec<RawResultItem>,
    pub answer: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RawResultItem {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub source: Option<String>,
}

impl ParsedPayload {
    /// Build from the model's top-level object. A missing or non-array `results`
    /// yields no items; a non-string `answer` is ignored.
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let results = match object.get("results") {
            Some(Value::Array(items)) => items.iter().filter_map(RawResultItem::from_value).collect(),
            _ => Vec::new(),
        };
        let answer = object
            .get("answer")
            .and_then(Value::as_str)
            .map(str::to_string);
        Self { results, answer }
    }
}

impl RawResultItem {
    /// Coerce one result entry. Non-object entries are dropped.
    pub fn from_value(value: &Value) -> Option<Self> {
        let item = value.as_object()?;
        Some(Self {
            title: coerce_string(item.get("title")),
            url: coerce_string(item.get("url")),
            snippet: coerce_string(item.get("snippet")),
            source: item.get("source").and_then(Value::as_str).map(str::to_string),
        })
    }
}

fn coerce_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub source: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub lang: Lang,
    pub answer: Option<String>,
    pub results: Vec<SearchResult>,
    pub took_ms: u64,
}
