// Runtime configuration.
// Parsed from command line flags with environment variable fallbacks.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

use crate::cache::{DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE};
use crate::error::{PulseError, Result};
use crate::github::{DEFAULT_TIMEOUT, GITHUB_API_BASE};

/// GitHub caps `per_page` on the events endpoint at 100.
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Parser, Debug, Clone)]
#[command(name = "octopulse")]
#[command(about = "GitHub public activity dashboard with a short-lived event cache")]
#[command(version)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "OCTOPULSE_BIND", default_value = "0.0.0.0")]
    pub bind: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 5001)]
    pub port: u16,

    /// GitHub token; without one, requests are unauthenticated
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub REST API root
    #[arg(long, env = "GITHUB_API_BASE", default_value = GITHUB_API_BASE)]
    pub api_base: String,

    /// Events requested per page (1-100)
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Maximum pages fetched per refresh
    #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
    pub max_pages: u32,

    /// Timeout for each GitHub request, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,
}

impl Config {
    /// Page size clamped to what GitHub accepts.
    pub fn page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages.max(1)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Socket address to bind the HTTP server to.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.bind, self.port);
        addr.parse()
            .map_err(|e| PulseError::Config(format!("invalid bind address {}: {}", addr, e)))
    }
}
