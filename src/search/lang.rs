use serde::Serialize;

/// Output language of a search. Every request resolves to exactly one of these.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    En,
    #[default]
    Uk,
}

impl Lang {
    pub fn code(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Uk => "uk",
        }
    }

    pub fn search_failed(self) -> &'static str {
        match self {
            Lang::En => "Search failed. Please try again.",
            Lang::Uk => "Пошук не вдався. Спробуйте ще раз.",
        }
    }

    pub fn api_key_missing(self) -> &'static str {
        match self {
            Lang::En => "OPENAI_API_KEY is not set",
            Lang::Uk => "Не задано OPENAI_API_KEY",
        }
    }

    pub fn fallback_lead_in(self) -> &'static str {
        match self {
            Lang::En => "Based on found pages: ",
            Lang::Uk => "На основі знайдених сторінок: ",
        }
    }
}

/// Map a language tag onto a supported language, case-insensitively.
pub fn normalize_lang(value: &str) -> Option<Lang> {
    let v = value.trim().to_lowercase();
    match v.as_str() {
        "" => None,
        "uk" | "uk-ua" | "ua" | "ua-ua" => Some(Lang::Uk),
        "en" | "en-us" | "en-gb" => Some(Lang::En),
        _ => match v.split('-').next() {
            Some("ua" | "uk") => Some(Lang::Uk),
            Some("en") => Some(Lang::En),
            _ => None,
        },
    }
}

/// Parse an `Accept-Language` header into `(tag, weight)` pairs, highest weight first.
///
/// Missing, unparseable, or non-positive weights count as `1.0`. Entries with equal
/// weight keep their header order (`sort_by` is stable).
pub fn parse_accept_language(header: &str) -> Vec<(String, f32)> {
    let mut tags: Vec<(String, f32)> = header
        .split(',')
        .filter_map(|raw| {
            let mut bits = raw.split(';').map(str::trim).filter(|b| !b.is_empty());
            let tag = bits.next()?.to_lowercase();
            let weight = bits
                .filter_map(|b| {
                    let (key, value) = b.split_once('=')?;
                    key.trim().eq_ignore_ascii_case("q").then_some(value.trim())
                })
                .filter_map(|q| q.parse::<f32>().ok())
                .filter(|q| *q > 0.0)
                .last()
                .unwrap_or(1.0);
            Some((tag, weight))
        })
        .collect();

    tags.sort_by(|a, b| b.1.total_cmp(&a.1));
    tags
}

/// Resolve the request language: explicit field, then `Accept-Language`, then Ukrainian.
pub fn pick_lang(explicit: Option<&str>, accept_language: Option<&str>) -> Lang {
    if let Some(lang) = explicit.and_then(normalize_lang) {
        return lang;
    }

    accept_language
        .into_iter()
        .flat_map(parse_accept_language)
        .find_map(|(tag, _)| normalize_lang(&tag))
        .unwrap_or_default()
}
