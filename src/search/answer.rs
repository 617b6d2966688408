use super::Lang;
use super::types::SearchResult;
use crate::text::{collapse_whitespace, truncate_chars};

pub const MAX_ANSWER_CHARS: usize = 280;
pub const MAX_ANSWER_SENTENCES: usize = 2;
const FALLBACK_SOURCES: usize = 2;
const ELLIPSIS: char = '…';

/// Shorten an answer to at most `max_sentences` sentences and `max_chars` characters.
///
/// Sentences end at `.`, `!` or `?` followed by whitespace. Over-long text is cut at the
/// last space before the limit and gets an ellipsis.
pub fn trim_answer(text: &str, max_chars: usize, max_sentences: usize) -> String {
    let text = collapse_whitespace(text);
    let shortened = split_sentences(&text)
        .into_iter()
        .take(max_sentences)
        .collect::<Vec<_>>()
        .join(" ");

    if shortened.chars().count() <= max_chars {
        return shortened;
    }

    let prefix = truncate_chars(&shortened, max_chars.saturating_sub(1));
    match prefix.rfind(' ') {
        Some(idx) if idx > 0 => format!("{}{ELLIPSIS}", &prefix[..idx]),
        _ => format!("{prefix}{ELLIPSIS}"),
    }
}

/// Split whitespace-collapsed text after sentence-ending punctuation.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev = None;
    for (idx, c) in text.char_indices() {
        if c.is_whitespace() && matches!(prev, Some('.' | '!' | '?')) {
            sentences.push(&text[start..idx]);
            start = idx + c.len_utf8();
        }
        prev = Some(c);
    }
    sentences.push(&text[start..]);
    sentences.retain(|s| !s.trim().is_empty());
    sentences
}

/// Normalize the model's own answer; blank answers count as absent.
pub fn normalize_answer(raw: Option<&str>) -> Option<String> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    let trimmed = trim_answer(raw, MAX_ANSWER_CHARS, MAX_ANSWER_SENTENCES);
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Synthesize an answer from the first accepted results when the model gave none.
pub fn fallback_answer(results: &[SearchResult], lang: Lang) -> Option<String> {
    if results.is_empty() {
        return None;
    }

    let parts: Vec<String> = results
        .iter()
        .take(FALLBACK_SOURCES)
        .map(|r| format!("{}. {}", r.title, r.snippet))
        .collect();

    let answer = format!("{}{}", lang.fallback_lead_in(), parts.join(" "));
    let trimmed = trim_answer(&answer, MAX_ANSWER_CHARS, MAX_ANSWER_SENTENCES);
    (!trimmed.is_empty()).then_some(trimmed)
}
