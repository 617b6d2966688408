use crate::openai::{ExtractError, ProviderError};

/// Reasons a request body is rejected before anything is sent upstream.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Invalid JSON body")]
    MalformedBody,

    #[error("images must be an array")]
    ImagesNotArray,

    #[error("images must be data:image/* URLs")]
    ImageNotDataUrl,

    #[error("query or images is required")]
    EmptyRequest,
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ClientInput,
    ServerConfig,
    Upstream,
}

impl SearchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SearchError::Input(_) => ErrorKind::ClientInput,
            SearchError::Provider(ProviderError::ApiKeyNotSet) => ErrorKind::ServerConfig,
            SearchError::Provider(_) | SearchError::Extract(_) => ErrorKind::Upstream,
        }
    }
}
