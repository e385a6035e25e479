// GitHub API endpoint functions.
// Fetches pages of a user's public event feed with conditional-request support.

use async_trait::async_trait;
use reqwest::{StatusCode, header::ETAG};

use crate::error::{PulseError, Result};

use super::EventSource;
use super::client::GitHubClient;
use super::types::EventRecord;

/// One page of the public event feed.
#[derive(Debug, Clone, PartialEq)]
pub enum EventPage {
    /// GitHub sent a body. `validator` is the page's ETag, if any.
    Modified {
        events: Vec<EventRecord>,
        validator: Option<String>,
    },
    /// 304: the validator sent with the request still matches.
    NotModified,
}

impl GitHubClient {
    /// Get one page of a user's public events.
    pub async fn get_public_events(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
        validator: Option<&str>,
    ) -> Result<EventPage> {
        let params = [
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        let response = self
            .get_with_params(&["users", username, "events", "public"], &params, validator)
            .await
            .map_err(|e| match e {
                PulseError::NotFound(_) => PulseError::NotFound(username.to_string()),
                other => other,
            })?;

        if response.status() == StatusCode::NOT_MODIFIED {
            return Ok(EventPage::NotModified);
        }

        let validator = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let events: Vec<EventRecord> = response.json().await?;

        Ok(EventPage::Modified { events, validator })
    }
}

#[async_trait]
impl EventSource for GitHubClient {
    async fn list_public_events(
        &self,
        subject: &str,
        page: u32,
        per_page: u32,
        validator: Option<&str>,
    ) -> Result<EventPage> {
        self.get_public_events(subject, page, per_page, validator)
            .await
    }
}
