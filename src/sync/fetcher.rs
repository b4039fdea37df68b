//! Paginated category fetch.

use super::models::CategoryResult;
use crate::catalog_feed::{Category, FeedClient};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Pulls every requested page of a category through a bounded pool.
#[derive(Clone)]
pub struct PageFetcher {
    client: FeedClient,
    concurrency: usize,
}

impl PageFetcher {
    pub fn new(client: FeedClient, concurrency: usize) -> Self {
        Self {
            client,
            concurrency: concurrency.max(1),
        }
    }

    /// Fetch pages `1..=page_count` of `category` and fold them by id.
    ///
    /// Pages complete in any order and a later completion overwrites an
    /// earlier one for the same id. Failed pages contribute nothing.
    pub async fn fetch_category(&self, category: Category, page_count: u32) -> CategoryResult {
        if page_count == 0 {
            return HashMap::new();
        }

        info!(
            "Fetching {} pages of '{}' ({} concurrent)",
            page_count, category, self.concurrency
        );

        let mut pages = stream::iter(1..=page_count)
            .map(|page| self.fetch_page(category, page))
            .buffer_unordered(self.concurrency);

        let mut result = CategoryResult::new();
        let mut completed = 0u32;
        let mut failed = 0u32;
        while let Some(page_result) = pages.next().await {
            completed += 1;
            match page_result {
                Some(listings) => result.extend(listings),
                None => failed += 1,
            }
            debug!("'{}': {}/{} pages done", category, completed, page_count);
        }

        info!(
            "Fetched '{}': {} movies from {} pages ({} failed)",
            category,
            result.len(),
            page_count,
            failed
        );
        result
    }

    /// One page as an id map, or `None` if it could not be fetched.
    async fn fetch_page(&self, category: Category, page: u32) -> Option<CategoryResult> {
        match self.client.list_page(category, page).await {
            Ok(list) => Some(
                list.results
                    .into_iter()
                    .map(|listing| (listing.id, listing))
                    .collect(),
            ),
            Err(e) => {
                warn!("Skipping '{}' page {}: {}", category, page, e);
                None
            }
        }
    }
}
