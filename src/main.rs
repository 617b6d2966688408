mod api;
mod config;
mod openai;
mod search;
mod text;

pub const USER_AGENT: &str = concat!("shukach/", env!("CARGO_PKG_VERSION"));

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use api::{AppState, create_router};
use config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env values never override variables already set in the environment
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("shukach=info".parse()?),
        )
        .init();

    let config = Config::parse();
    let state = AppState::from_config(&config)?;
    let app = create_router(state, &config.static_dir, &config.cors_origins());

    let listener = TcpListener::bind(config.bind).await?;
    info!(
        addr = %config.bind,
        static_dir = %config.static_dir.display(),
        model = %config.openai_model,
        max_results = config.max_results,
        "starting shukach server"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| tracing::error!("server error: {e}"))?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }
}
