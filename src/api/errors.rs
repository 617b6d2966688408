use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{error, warn};

use crate::search::{ErrorKind, InputError, Lang, SearchError};

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// A failed request, carrying the language its message should be shown in.
#[derive(Debug)]
pub struct ApiError {
    error: SearchError,
    lang: Lang,
}

impl ApiError {
    pub fn new(error: impl Into<SearchError>, lang: Lang) -> Self {
        Self {
            error: error.into(),
            lang,
        }
    }

    /// Input errors are reported before a language is resolved and are not localized.
    pub fn input(error: InputError) -> Self {
        Self::new(error, Lang::default())
    }

    pub fn status(&self) -> StatusCode {
        match (&self.error, self.error.kind()) {
            (SearchError::Input(InputError::MalformedBody), _) => StatusCode::BAD_REQUEST,
            (_, ErrorKind::ClientInput) => StatusCode::UNPROCESSABLE_ENTITY,
            (_, ErrorKind::ServerConfig) => StatusCode::INTERNAL_SERVER_ERROR,
            (_, ErrorKind::Upstream) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Message shown to the client. Upstream diagnostics stay in the server log.
    pub fn detail(&self) -> String {
        match self.error.kind() {
            ErrorKind::ClientInput => self.error.to_string(),
            ErrorKind::ServerConfig => self.lang.api_key_missing().to_string(),
            ErrorKind::Upstream => self.lang.search_failed().to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.error.kind() {
            ErrorKind::ClientInput => warn!(error = %self.error, "rejected search request"),
            ErrorKind::ServerConfig => error!(error = %self.error, "search unavailable"),
            ErrorKind::Upstream => warn!(error = %self.error, "upstream search failed"),
        }
        let body = ErrorBody {
            detail: self.detail(),
        };
        (self.status(), Json(body)).into_response()
    }
}
