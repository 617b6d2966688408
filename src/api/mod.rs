mod errors;
mod handlers;

use std::path::Path;
use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{any, get, post};
use reqwest::Client;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::openai::{OpenAiClient, ProviderError};

/// TCP connection establishment timeout for provider calls.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Request body ceiling; room for six full-size photos as base64 data URLs.
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Shared, read-only state handed to every request.
#[derive(Clone, Debug)]
pub struct AppState {
    openai: Option<OpenAiClient>,
    max_results: usize,
}

impl AppState {
    pub fn new(openai: Option<OpenAiClient>, max_results: usize) -> Self {
        Self {
            openai,
            max_results,
        }
    }

    /// Build state once at startup. A missing API key leaves the server running;
    /// searches then fail with a configuration error.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let http = Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?;
        let openai = config
            .openai_api_key
            .as_deref()
            .ok_or(ProviderError::ApiKeyNotSet)
            .and_then(|key| OpenAiClient::new(http, key, &config.openai_model))
            .inspect(|client| info!(model = client.model(), "search enabled"))
            .inspect_err(|e| warn!("search disabled: {e}"))
            .ok();
        Ok(Self::new(openai, usize::from(config.max_results)))
    }

    fn openai(&self) -> Result<&OpenAiClient, ProviderError> {
        self.openai.as_ref().ok_or(ProviderError::ApiKeyNotSet)
    }

    fn max_results(&self) -> usize {
        self.max_results
    }
}

pub fn create_router(state: AppState, static_dir: &Path, cors_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = cors_origins
        .iter()
        .filter_map(|o| {
            HeaderValue::from_str(o)
                .inspect_err(|_| warn!(origin = %o, "ignoring invalid CORS origin"))
                .ok()
        })
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any);

    // Unknown paths outside /api resolve to the SPA entry document.
    let spa = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/api/health", get(handlers::health_handler))
        .route("/api/search", post(handlers::search_handler))
        .route("/api/", any(handlers::api_not_found))
        .route("/api/*rest", any(handlers::api_not_found))
        .fallback_service(spa)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use std::path::PathBuf;
    use tower::ServiceExt; // for `oneshot`
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app(openai: Option<OpenAiClient>) -> Router {
        create_router(
            AppState::new(openai, 8),
            Path::new("does-not-exist"),
            &["http://localhost:5173".to_string()],
        )
    }

    async fn provider_replying(status: u16, body: Value) -> (MockServer, OpenAiClient) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/responses"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&server)
            .await;
        let client = OpenAiClient::with_base_url(Client::new(), &server.uri());
        (server, client)
    }

    fn search_request(body: &str, accept_language: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/search")
            .header("content-type", "application/json");
        if let Some(lang) = accept_language {
            builder = builder.header("accept-language", lang);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(None), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn unknown_api_path_is_404() {
        let request = Request::builder()
            .uri("/api/nope")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(None), request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Not found");
    }

    #[tokio::test]
    async fn api_paths_never_reach_spa_fallback() {
        let dir = temp_static_dir();
        let router = create_router(AppState::new(None, 8), &dir, &[]);

        for uri in ["/api/", "/api/nope", "/api/search/extra"] {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let (status, body) = send(router.clone(), request).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body["detail"], "Not found", "{uri}");
        }

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn wrong_method_is_405() {
        let request = Request::builder()
            .uri("/api/search")
            .body(Body::empty())
            .unwrap();
        let response = app(None).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let (status, body) = send(app(None), search_request("{oops", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Invalid JSON body");
    }

    #[tokio::test]
    async fn empty_body_is_422() {
        let (status, _) = send(app(None), search_request("{}", None)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn non_data_url_image_is_422() {
        let (status, body) = send(app(None), search_request(r#"{"images": ["notadata:url"]}"#, None)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].as_str().unwrap().contains("images"));
    }

    #[tokio::test]
    async fn missing_api_key_is_localized_500() {
        let (status, body) = send(app(None), search_request(r#"{"query": "q"}"#, Some("en-US"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "OPENAI_API_KEY is not set");

        let (status, body) = send(app(None), search_request(r#"{"query": "q"}"#, None)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "Не задано OPENAI_API_KEY");
    }

    #[tokio::test]
    async fn successful_search_returns_public_shape() {
        let model_output = json!({
            "results": [
                {"title": "Rust", "url": "https://rust-lang.org", "snippet": "A language."},
                {"title": "Rust again", "url": "https://rust-lang.org", "snippet": "Duplicate."}
            ]
        });
        let (_server, client) =
            provider_replying(200, json!({"output_text": model_output.to_string()})).await;

        let (status, body) = send(
            app(Some(client)),
            search_request(r#"{"query": " rust ", "lang": "en", "limit": "5"}"#, None),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["query"], "rust");
        assert_eq!(body["lang"], "en");
        assert_eq!(body["results"].as_array().unwrap().len(), 1);
        assert_eq!(body["results"][0]["source"], "rust-lang.org");
        assert!(body["answer"].as_str().unwrap().starts_with("Based on found pages: "));
        assert!(body["took_ms"].is_u64());
    }

    #[tokio::test]
    async fn provider_500_is_generic_502() {
        let (_server, client) = provider_replying(
            500,
            json!({"error": {"message": "secret upstream diagnostics"}}),
        )
        .await;

        let (status, body) = send(
            app(Some(client)),
            search_request(r#"{"query": "q"}"#, Some("uk-UA,en;q=0.5")),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["detail"], "Пошук не вдався. Спробуйте ще раз.");
        assert!(!body.to_string().contains("secret"));
    }

    #[tokio::test]
    async fn unparseable_model_output_is_502() {
        let (_server, client) =
            provider_replying(200, json!({"output_text": "no json here"})).await;

        let (status, body) = send(
            app(Some(client)),
            search_request(r#"{"query": "q", "lang": "en"}"#, None),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["detail"], "Search failed. Please try again.");
    }

    #[tokio::test]
    async fn search_accepts_bodies_past_two_megabytes() {
        let model_output = json!({
            "results": [{"title": "Cat", "url": "https://example.com/cat", "snippet": "A cat."}]
        });
        let (_server, client) =
            provider_replying(200, json!({"output_text": model_output.to_string()})).await;

        let image = format!("data:image/jpeg;base64,{}", "A".repeat(2_500_000));
        let body = json!({"query": "what is this", "images": [image]}).to_string();
        assert!(body.len() > 2 * 1024 * 1024);

        let (status, body) = send(app(Some(client)), search_request(&body, Some("en"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"][0]["source"], "example.com");
    }

    #[tokio::test]
    async fn body_past_limit_is_rejected() {
        let body = " ".repeat(MAX_BODY_BYTES + 1);
        let response = app(None)
            .oneshot(search_request(&body, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    fn temp_static_dir() -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("shukach_static_{nanos}"));
        std::fs::create_dir_all(dir.join("assets")).unwrap();
        std::fs::write(dir.join("index.html"), "<!doctype html><title>spa</title>").unwrap();
        std::fs::write(dir.join("assets/app.js"), "console.log('app')").unwrap();
        dir
    }

    #[tokio::test]
    async fn static_assets_and_spa_fallback() {
        let dir = temp_static_dir();
        let router = create_router(AppState::new(None, 8), &dir, &[]);

        let request = Request::builder()
            .uri("/assets/app.js")
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let request = Request::builder()
            .uri("/some/client/route")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("<title>spa</title>"));

        std::fs::remove_dir_all(dir).ok();
    }
}
