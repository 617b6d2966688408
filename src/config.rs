use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::openai::client::DEFAULT_MODEL;

const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://localhost:8080",
    "http://127.0.0.1:5173",
    "http://127.0.0.1:8080",
];

/// Web search UI backend.
///
/// Every option can also be set through the environment or a `.env` file.
#[derive(Parser, Debug, Clone)]
#[command(name = "shukach", version, about)]
pub struct Config {
    /// API key for the model provider. Searches fail with 500 while unset.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Model used for search requests.
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    pub openai_model: String,

    /// Upper bound on results per search (requests are also capped at 10).
    #[arg(long, env = "MAX_RESULTS", default_value_t = 8, value_parser = clap::value_parser!(u16).range(1..))]
    pub max_results: u16,

    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Directory holding the built single-page app.
    #[arg(long, env = "STATIC_DIR", default_value = "frontend/dist")]
    pub static_dir: PathBuf,

    /// Comma-separated list of allowed CORS origins.
    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn cors_origins(&self) -> Vec<String> {
        let origins: Vec<String> = self
            .cors_origins
            .iter()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();
        if origins.is_empty() {
            DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect()
        } else {
            origins
        }
    }
}
