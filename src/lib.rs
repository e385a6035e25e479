// octopulse: GitHub public activity served from a short-lived in-memory cache.

pub mod activity;
pub mod cache;
pub mod config;
pub mod error;
pub mod github;
pub mod web;

pub use cache::{CacheStore, EventFetcher};
pub use error::{PulseError, Result};
pub use github::{EventRecord, EventSource, GitHubClient};
