//! OpenAI Responses API: request/response wire types, the HTTP client, and model output extraction.

pub mod client;
pub mod extract;
pub mod types;

pub use client::{ModelProvider, OpenAiClient, ProviderError};
pub use extract::{ExtractError, extract_payload};
