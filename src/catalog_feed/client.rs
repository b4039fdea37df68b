//! HTTP client for the external catalog feed.
//!
//! Every request goes through the shared throttler and the retry policy.

use super::models::{Category, ListPage, MovieDetails};
use super::retry_policy::RetryPolicy;
use super::throttle::{IntervalThrottler, NoOpThrottler, RequestThrottler};
use super::FeedError;
use crate::config::FeedSettings;
use anyhow::Result;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Client for the catalog feed API.
#[derive(Clone)]
pub struct FeedClient {
    client: Client,
    base_url: String,
    api_key: String,
    language: String,
    region: String,
    retry_policy: RetryPolicy,
    throttler: Arc<dyn RequestThrottler>,
}

impl FeedClient {
    /// Create a new FeedClient with its own throttler.
    pub fn new(settings: &FeedSettings) -> Result<Self> {
        let throttler: Arc<dyn RequestThrottler> = if settings.request_interval_ms == 0 {
            Arc::new(NoOpThrottler)
        } else {
            Arc::new(IntervalThrottler::new(Duration::from_millis(
                settings.request_interval_ms,
            )))
        };
        Self::with_throttler(settings, throttler)
    }

    /// Create a new FeedClient sharing an existing throttler.
    pub fn with_throttler(
        settings: &FeedSettings,
        throttler: Arc<dyn RequestThrottler>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            language: settings.language.clone(),
            region: settings.region.clone(),
            retry_policy: RetryPolicy::new(settings),
            throttler,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Fetch the body of `url`, retrying transient failures.
    ///
    /// Waits for a throttle slot before every attempt, retries included.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FeedError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            self.throttler.acquire().await;

            match self.fetch_once(url).await {
                Ok(body) => return Ok(body),
                Err(e) if self.retry_policy.should_retry(&e, attempt) => {
                    let wait = self.retry_policy.backoff(attempt);
                    debug!(
                        "Attempt {}/{} for {} failed ({}), retrying in {:?}",
                        attempt,
                        self.retry_policy.max_attempts,
                        self.redact(url),
                        e,
                        wait
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<Vec<u8>, FeedError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FeedError::Status(response.status()));
        }

        Ok(response.bytes().await?.to_vec())
    }

    // =========================================================================
    // Typed endpoints
    // =========================================================================

    pub fn list_page_url(&self, category: Category, page: u32) -> String {
        format!(
            "{}/movie/{}?api_key={}&language={}&region={}&page={}",
            self.base_url,
            category.as_path(),
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&self.language),
            urlencoding::encode(&self.region),
            page
        )
    }

    pub fn details_url(&self, movie_id: u64, with_credits: bool) -> String {
        let append = if with_credits {
            "release_dates,watch/providers,credits"
        } else {
            "release_dates,watch/providers"
        };
        format!(
            "{}/movie/{}?api_key={}&language={}&append_to_response={}",
            self.base_url,
            movie_id,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&self.language),
            urlencoding::encode(append)
        )
    }

    /// Get one page of a category list.
    pub async fn list_page(&self, category: Category, page: u32) -> Result<ListPage, FeedError> {
        let body = self.fetch(&self.list_page_url(category, page)).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Get the detail payload of one movie.
    pub async fn movie_details(
        &self,
        movie_id: u64,
        with_credits: bool,
    ) -> Result<MovieDetails, FeedError> {
        let body = self.fetch(&self.details_url(movie_id, with_credits)).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// The url without its api key, for logging.
    fn redact(&self, url: &str) -> String {
        if self.api_key.is_empty() {
            return url.to_string();
        }
        url.replace(&*urlencoding::encode(&self.api_key), "***")
    }
}
