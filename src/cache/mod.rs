// Cache module for GitHub event feeds.
// Keeps recently fetched feeds in memory and refreshes them with conditional requests.

pub mod fetcher;
pub mod store;

pub use fetcher::{Clock, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE, EventFetcher, SystemClock};
pub use store::{CacheEntry, CacheKey, CacheStore, DEFAULT_TTL};
