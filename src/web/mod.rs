// HTTP surface: HTML dashboard, JSON API, SVG chart, and health check.
// Every page reads through the event cache; filtering and grouping happen after it.

mod chart;
mod html;
mod routes;

use std::future::Future;
use std::time::Instant;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::cache::{DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE, EventFetcher};
use crate::error::PulseError;
use crate::github::EventSource;

/// Shared state handed to every handler.
pub struct AppState<S: EventSource> {
    pub fetcher: EventFetcher<S>,
    pub page_size: u32,
    pub max_pages: u32,
    pub started_at: Instant,
}

impl<S: EventSource> AppState<S> {
    pub fn new(fetcher: EventFetcher<S>) -> Self {
        Self {
            fetcher,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            started_at: Instant::now(),
        }
    }

    /// Set how many pages of what size each refresh reads.
    pub fn with_paging(mut self, page_size: u32, max_pages: u32) -> Self {
        self.page_size = page_size;
        self.max_pages = max_pages;
        self
    }
}

impl<S: EventSource> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            fetcher: self.fetcher.clone(),
            page_size: self.page_size,
            max_pages: self.max_pages,
            started_at: self.started_at,
        }
    }
}

/// Build the application router.
pub fn router<S: EventSource + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health::<S>))
        .route("/api/u/:user/events", get(routes::events_json::<S>))
        .route("/u/:user", get(routes::events_html::<S>))
        .route("/u/:user/chart.svg", get(routes::events_chart::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Resolve when `signal` fires. If the signal handler could not be installed,
/// log it and never resolve, so the server keeps running.
pub async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(error) => {
            tracing::error!(%error, "failed to listen for shutdown signal, graceful shutdown disabled");
            std::future::pending::<()>().await;
        }
    }
}

/// HTTP status for a failed fetch.
pub fn status_for(error: &PulseError) -> StatusCode {
    match error {
        PulseError::NotFound(_) => StatusCode::NOT_FOUND,
        PulseError::InvalidSubject(_) => StatusCode::BAD_REQUEST,
        PulseError::UpstreamRejected { .. } => StatusCode::TOO_MANY_REQUESTS,
        PulseError::Transport(_) | PulseError::UnexpectedStatus { .. } => StatusCode::BAD_GATEWAY,
        PulseError::Io(_) | PulseError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn log_failure(error: &PulseError) {
    if error.is_upstream() {
        tracing::warn!(%error, "event fetch failed");
    } else {
        tracing::error!(%error, "event fetch failed");
    }
}

/// Fetch failure rendered as `{ "error": ... }`.
#[derive(Debug)]
pub struct JsonError(pub PulseError);

impl From<PulseError> for JsonError {
    fn from(err: PulseError) -> Self {
        Self(err)
    }
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        log_failure(&self.0);
        let status = status_for(&self.0);
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Fetch failure rendered as an HTML page.
#[derive(Debug)]
pub struct HtmlError(pub PulseError);

impl From<PulseError> for HtmlError {
    fn from(err: PulseError) -> Self {
        Self(err)
    }
}

impl IntoResponse for HtmlError {
    fn into_response(self) -> Response {
        log_failure(&self.0);
        let status = status_for(&self.0);
        (status, Html(html::render_error(status, &self.0))).into_response()
    }
}
