use std::collections::HashSet;

use tracing::debug;

use super::types::{RawResultItem, SearchResult};
use crate::text::truncate_chars;

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_URL_CHARS: usize = 2048;
pub const MAX_SNIPPET_CHARS: usize = 600;
pub const MAX_SOURCE_CHARS: usize = 120;

/// Keep at most `limit` well-formed, unique results in provider order.
///
/// Items with a blank title, URL or snippet, a non-HTTP(S) URL, or a URL already
/// accepted are skipped. Deduplication compares the full URL before truncation.
pub fn sanitize_results(items: &[RawResultItem], limit: usize) -> Vec<SearchResult> {
    let mut seen = HashSet::new();
    let mut results = Vec::new();

    for item in items {
        if results.len() >= limit {
            break;
        }

        let title = item.title.trim();
        let url = item.url.trim();
        let snippet = item.snippet.trim();

        if title.is_empty() || url.is_empty() || snippet.is_empty() {
            debug!(url, "skipping incomplete result");
            continue;
        }
        if !url.starts_with("https://") && !url.starts_with("http://") {
            debug!(url, "skipping non-HTTP result");
            continue;
        }
        if !seen.insert(url) {
            continue;
        }

        let source = item
            .source
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| domain_from_url(url));

        results.push(SearchResult {
            title: truncate_chars(title, MAX_TITLE_CHARS).to_string(),
            url: truncate_chars(url, MAX_URL_CHARS).to_string(),
            snippet: truncate_chars(snippet, MAX_SNIPPET_CHARS).to_string(),
            source: source.map(|s| truncate_chars(&s, MAX_SOURCE_CHARS).to_string()),
        });
    }

    results
}

fn domain_from_url(raw: &str) -> Option<String> {
    let parsed = url::Url::parse(raw).ok()?;
    parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .map(str::to_string)
}
