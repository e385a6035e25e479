// octopulse server entry point.
// Reads configuration, sets up logging, and serves the dashboard until ctrl-c.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use octopulse::config::Config;
use octopulse::web::{AppState, router, shutdown_on};
use octopulse::{CacheStore, EventFetcher, GitHubClient, PulseError, Result};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("octopulse=info,tower_http=info")),
        )
        .init();

    let config = Config::parse();

    let client = GitHubClient::new(config.token.as_deref(), config.timeout())?
        .with_base_url(&config.api_base)?;
    if config.token.is_none() {
        tracing::warn!("GITHUB_TOKEN not set, using unauthenticated GitHub requests");
    }

    let fetcher = EventFetcher::new(Arc::new(client), Arc::new(CacheStore::new()));
    let state = AppState::new(fetcher).with_paging(config.page_size(), config.max_pages());
    let app = router(state);

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "octopulse listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_on(tokio::signal::ctrl_c()))
        .await
        .map_err(PulseError::Io)
}
