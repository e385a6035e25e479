// Error types for octopulse.
// Covers upstream GitHub failures, configuration problems, and general I/O.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PulseError {
    #[error("GitHub user not found: {0}")]
    NotFound(String),

    #[error("Missing GitHub username: {0:?}")]
    InvalidSubject(String),

    #[error("GitHub rejected the request ({status}), resets at {reset_at}")]
    UpstreamRejected { status: StatusCode, reset_at: String },

    #[error("GitHub transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected GitHub response {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl PulseError {
    /// Whether this failure came from talking to GitHub rather than from local setup.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            PulseError::NotFound(_)
                | PulseError::UpstreamRejected { .. }
                | PulseError::Transport(_)
                | PulseError::UnexpectedStatus { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PulseError>;
