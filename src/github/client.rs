// GitHub API HTTP client.
// Handles optional authentication, per-call timeouts, rate limit tracking, and status mapping.

use std::sync::Mutex;
use std::time::Duration;

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, IF_NONE_MATCH, USER_AGENT},
};
use url::Url;

use crate::error::{PulseError, Result};

use super::types::RateLimit;

pub const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Default per-call timeout for upstream requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// GitHub API client with optional authentication and rate limit tracking.
///
/// Shared between request handlers, so all methods take `&self`.
pub struct GitHubClient {
    client: Client,
    base_url: Url,
    rate_limit: Mutex<RateLimit>,
}

impl GitHubClient {
    /// Create a new GitHub client. Without a token, calls are unauthenticated
    /// and GitHub applies its stricter anonymous rate limit.
    pub fn new(token: Option<&str>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();

        if let Some(token) = token.filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| PulseError::Config(format!("invalid GitHub token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("octopulse"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: parse_base_url(GITHUB_API_BASE)?,
            rate_limit: Mutex::new(RateLimit::default()),
        })
    }

    /// Point the client at a different API root (GitHub Enterprise, local fakes).
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    /// Append path segments to the API root, percent-encoding each one.
    fn endpoint_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| PulseError::Config(format!("invalid GitHub API base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Get the most recent rate limit snapshot.
    pub fn rate_limit(&self) -> RateLimit {
        self.rate_limit
            .lock()
            .map(|guard| *guard)
            .unwrap_or_default()
    }

    /// Make a GET request with query parameters and an optional `If-None-Match` validator.
    /// `segments` are the raw path components below the API root.
    ///
    /// Returns the response for 200 and 304; every other status becomes an error.
    pub async fn get_with_params<T: serde::Serialize + ?Sized>(
        &self,
        segments: &[&str],
        params: &T,
        validator: Option<&str>,
    ) -> Result<Response> {
        let url = self.endpoint_url(segments)?;
        let mut request = self.client.get(url).query(params);
        if let Some(validator) = validator {
            request = request.header(IF_NONE_MATCH, validator);
        }

        let response = request.send().await?;

        self.update_rate_limit(&response);
        self.check_response(response).await
    }

    /// Update rate limit from response headers.
    fn update_rate_limit(&self, response: &Response) {
        let header = |name: &str| -> Option<u64> {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
        };

        let Ok(mut rate_limit) = self.rate_limit.lock() else {
            return;
        };
        if let Some(limit) = header("x-ratelimit-limit") {
            rate_limit.limit = limit;
        }
        if let Some(remaining) = header("x-ratelimit-remaining") {
            rate_limit.remaining = remaining;
        }
        if let Some(reset) = header("x-ratelimit-reset") {
            rate_limit.reset = reset;
        }
    }

    /// Check response status and convert errors.
    async fn check_response(&self, response: Response) -> Result<Response> {
        match response.status() {
            StatusCode::OK | StatusCode::NOT_MODIFIED => Ok(response),
            StatusCode::NOT_FOUND => {
                let url = response.url().path().to_string();
                Err(PulseError::NotFound(url))
            }
            status @ (StatusCode::UNAUTHORIZED
            | StatusCode::FORBIDDEN
            | StatusCode::TOO_MANY_REQUESTS) => {
                let reset_at = self.rate_limit().reset_display();
                tracing::warn!(%status, %reset_at, "GitHub rejected request");
                Err(PulseError::UpstreamRejected { status, reset_at })
            }
            status => Err(PulseError::UnexpectedStatus {
                status,
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    Url::parse(base_url)
        .map_err(|e| PulseError::Config(format!("invalid GitHub API base {}: {}", base_url, e)))
}
