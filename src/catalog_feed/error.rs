use reqwest::StatusCode;
use thiserror::Error;

/// Statuses worth another attempt: the upstream is overloaded or restarting.
pub const RETRYABLE_STATUSES: [u16; 4] = [500, 502, 503, 504];

/// Errors returned by the catalog feed client.
///
/// None of these are fatal to a sync run: callers degrade to "no data" for the
/// page or item that produced them.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Catalog feed responded with status {0}")]
    Status(StatusCode),

    #[error("Catalog feed request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Catalog feed payload could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FeedError {
    /// Returns true if the failed call should be attempted again.
    ///
    /// Local failures (connect errors, timeouts, truncated bodies) are always
    /// retryable; HTTP failures only when the status is a transient 5xx.
    pub fn is_retryable(&self) -> bool {
        match self {
            FeedError::Status(status) => RETRYABLE_STATUSES.contains(&status.as_u16()),
            FeedError::Transport(_) => true,
            FeedError::Decode(_) => false,
        }
    }

    /// The HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FeedError::Status(status) => Some(*status),
            FeedError::Transport(e) => e.status(),
            FeedError::Decode(_) => None,
        }
    }
}
