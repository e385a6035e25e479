// Cache-first fetching of public event feeds.
// Fresh entries skip GitHub; stale ones revalidate page 1 with their ETag.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::{PulseError, Result};
use crate::github::{EventPage, EventRecord, EventSource};

use super::store::{CacheEntry, CacheKey, CacheStore, DEFAULT_TTL};

/// GitHub's `per_page` default for the events endpoint is 30; we ask for the maximum.
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_MAX_PAGES: u32 = 2;

/// Source of the current time, swappable in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fetches event feeds through a shared [`CacheStore`].
pub struct EventFetcher<S: EventSource> {
    source: Arc<S>,
    store: Arc<CacheStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl<S: EventSource> EventFetcher<S> {
    /// Create a fetcher with the default 180 second TTL and the wall clock.
    pub fn new(source: Arc<S>, store: Arc<CacheStore>) -> Self {
        Self {
            source,
            store,
            clock: Arc::new(SystemClock),
            ttl: DEFAULT_TTL,
        }
    }

    /// Override the TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Override the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get `subject`'s public events, newest first as GitHub orders them.
    ///
    /// Reads up to `max_pages` pages of `page_size` events, stopping at the
    /// first short or empty page. Any upstream failure aborts the call and
    /// leaves the cache exactly as it was.
    pub async fn fetch_events(
        &self,
        subject: &str,
        page_size: u32,
        max_pages: u32,
    ) -> Result<Arc<Vec<EventRecord>>> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(PulseError::InvalidSubject(subject.to_string()));
        }
        let page_size = page_size.max(1);
        let max_pages = max_pages.max(1);
        let key = CacheKey::new(subject);

        let cached = self.store.get(&key);
        if let Some(entry) = &cached {
            if entry.is_fresh(self.ttl, self.clock.now()) {
                tracing::debug!(%key, events = entry.payload.len(), "cache hit");
                return Ok(Arc::clone(&entry.payload));
            }
        }

        let prior_validator = cached.as_ref().and_then(|e| e.validator.as_deref());
        tracing::debug!(
            %key,
            stale = cached.is_some(),
            conditional = prior_validator.is_some(),
            "cache miss, fetching from GitHub"
        );

        let mut events = Vec::new();
        let mut validator = None;
        let mut unchanged = None;

        for page in 1..=max_pages {
            let sent_validator = if page == 1 { prior_validator } else { None };
            let response = self
                .source
                .list_public_events(subject, page, page_size, sent_validator)
                .await?;

            match response {
                EventPage::NotModified => {
                    // A 304 is only meaningful as an answer to our own validator.
                    let Some(entry) = cached.as_ref().filter(|_| sent_validator.is_some()) else {
                        return Err(PulseError::UnexpectedStatus {
                            status: reqwest::StatusCode::NOT_MODIFIED,
                            body: format!("page {} answered 304 without a validator", page),
                        });
                    };
                    tracing::debug!(%key, "feed not modified");
                    unchanged = Some(entry.clone());
                    break;
                }
                EventPage::Modified {
                    events: page_events,
                    validator: page_validator,
                } => {
                    if page == 1 {
                        validator = page_validator;
                    }
                    let count = page_events.len();
                    events.extend(page_events);
                    if count < page_size as usize {
                        break;
                    }
                }
            }
        }

        let entry = match unchanged {
            Some(prior) => CacheEntry::new(self.clock.now(), prior.payload, prior.validator),
            None => CacheEntry::new(self.clock.now(), Arc::new(events), validator),
        };
        let payload = Arc::clone(&entry.payload);
        tracing::debug!(%key, events = payload.len(), "cache updated");
        self.store.put(key, entry);

        Ok(payload)
    }
}

impl<S: EventSource> Clone for EventFetcher<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            ttl: self.ttl,
        }
    }
}
