// GitHub API module.
// Provides the client, event types, and the upstream seam used by the cache.

pub mod client;
pub mod endpoints;
pub mod types;

use async_trait::async_trait;

use crate::error::Result;

pub use client::{DEFAULT_TIMEOUT, GITHUB_API_BASE, GitHubClient};
pub use endpoints::EventPage;
pub use types::*;

/// Anything that can serve pages of a subject's public event feed.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Fetch page `page` (1-based) of `subject`'s events, `per_page` at a time.
    /// `validator` is sent as `If-None-Match` when present.
    async fn list_public_events(
        &self,
        subject: &str,
        page: u32,
        per_page: u32,
        validator: Option<&str>,
    ) -> Result<EventPage>;
}
