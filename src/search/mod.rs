//! Search pipeline: input validation, language negotiation, prompt building, and result sanitization.

pub(crate) mod answer;
pub(crate) mod engine;
pub(crate) mod error;
mod lang;
pub(crate) mod prompt;
pub(crate) mod request;
pub(crate) mod sanitize;
pub(crate) mod types;

pub use engine::run_search;
pub use error::{ErrorKind, InputError, SearchError};
pub use lang::Lang;
pub use request::parse_request;
pub use types::SearchResponse;
