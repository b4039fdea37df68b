//! Catalog feed access.
//!
//! Rate-limited, retrying HTTP access to the external movie catalog and the
//! typed payloads it returns.

mod client;
mod error;
mod models;
mod retry_policy;
mod throttle;

pub use client::FeedClient;
pub use error::{FeedError, RETRYABLE_STATUSES};
pub use models::*;
pub use retry_policy::RetryPolicy;
pub use throttle::{IntervalThrottler, NoOpThrottler, RequestThrottler};
