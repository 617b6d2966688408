use super::Lang;
use super::types::SearchRequest;
use crate::openai::types::{InputContent, InputMessage, MessageContent, Role};

pub const SYSTEM_PROMPT: &str = r#"You are Shukach, a web search assistant.

Goal: given a user's text query and optionally attached images, use the web_search tool to find relevant pages and return a compact list of results, like a search engine.

If images are provided:
- Use them to understand what the user wants (objects, text in screenshots, error messages, UI names, logos).
- If the text query is empty, infer a good search query from the images before searching.

Rules:
- Use web_search to gather sources. Never invent URLs or titles.
- Source priority policy:
  - Prioritize Ukrainian sources first, then reputable European and international sources.
  - Pages in English are acceptable; prefer the requested output language when possible.
  - Russian-language pages have the lowest priority. Use them only when there is no comparable Ukrainian or English alternative and the source itself is not Russian.
  - Exclude Russian sources entirely. If a source appears Russian or affiliated with Russia, do not return it.
- Prefer authoritative, directly relevant sources. Avoid duplicates and low-quality SEO pages.
- Return at most the requested number of results.
- The output language MUST match the requested language:
  - language="uk": Ukrainian
  - language="en": English
- For each result, write a short snippet (1-2 sentences) summarizing what the user will find on that page.
  If the page is in a different language, summarize it in the requested language.
- Output MUST be valid JSON only (no Markdown, no commentary).

Output JSON schema:
{
  "results": [
    {
      "title": "string",
      "url": "https://...",
      "snippet": "string",
      "source": "domain name (optional)"
    }
  ]
}
"#;

pub fn build_user_prompt(query: &str, lang: Lang, limit: usize, image_count: usize) -> String {
    let quoted = serde_json::Value::from(query).to_string();
    format!(
        "Search the web and return results.\n\
         query: {quoted}\n\
         language: {}\n\
         max_results: {limit}\n\
         attached_images: {image_count}\n\
         Return JSON only per the schema.",
        lang.code()
    )
}

/// Conversation sent to the model: fixed policy, then the user text followed by one block per image.
pub fn build_input(request: &SearchRequest) -> Vec<InputMessage> {
    let text = build_user_prompt(
        &request.query,
        request.lang,
        request.limit,
        request.images.len(),
    );

    let mut blocks = vec![InputContent::InputText { text }];
    blocks.extend(request.images.iter().map(|image_url| InputContent::InputImage {
        image_url: image_url.clone(),
    }));

    vec![
        InputMessage {
            role: Role::System,
            content: MessageContent::Text(SYSTEM_PROMPT.to_string()),
        },
        InputMessage {
            role: Role::User,
            content: MessageContent::Blocks(blocks),
        },
    ]
}
