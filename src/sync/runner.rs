use super::enrichment::Enricher;
use super::fetcher::PageFetcher;
use super::merge::merge;
use super::models::SyncReport;
use super::publisher::BulkPublisher;
use crate::catalog_feed::{Category, FeedClient};
use crate::config::SyncSettings;
use crate::document_store::{ensure_index, recreate_index, DocumentStore, StoreError};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

/// Failures that abort a run. Everything else is counted in the report.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Document store is unreachable: {0}")]
    StoreUnreachable(#[source] StoreError),

    #[error("Failed to provision index: {0}")]
    Provisioning(#[source] StoreError),
}

/// Fetch, merge, enrich and publish the whole catalog once.
pub struct SyncRunner {
    client: FeedClient,
    store: Arc<dyn DocumentStore>,
    index_name: String,
    settings: SyncSettings,
}

impl SyncRunner {
    pub fn new(
        client: FeedClient,
        store: Arc<dyn DocumentStore>,
        index_name: impl Into<String>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            client,
            store,
            index_name: index_name.into(),
            settings,
        }
    }

    pub async fn run(&self) -> Result<SyncReport, SyncError> {
        let started = Instant::now();
        let mut report = SyncReport::default();

        let version = self
            .store
            .ping()
            .await
            .map_err(SyncError::StoreUnreachable)?;
        info!("Connected to document store (version {})", version);

        if self.settings.recreate_index {
            recreate_index(self.store.as_ref(), &self.index_name)
                .await
                .map_err(SyncError::Provisioning)?;
        } else {
            ensure_index(self.store.as_ref(), &self.index_name)
                .await
                .map_err(SyncError::Provisioning)?;
        }

        // =====================================================================
        // Fetch
        // =====================================================================
        let fetcher = PageFetcher::new(self.client.clone(), self.settings.fetch_concurrency);
        let (popular, now_playing) = tokio::join!(
            fetcher.fetch_category(Category::Popular, self.settings.popular_pages),
            fetcher.fetch_category(Category::NowPlaying, self.settings.now_playing_pages),
        );
        report.popular_fetched = popular.len();
        report.now_playing_fetched = now_playing.len();

        // =====================================================================
        // Merge
        // =====================================================================
        let merged = merge(popular, now_playing);
        report.merged = merged.records.len();
        info!(
            "Merged {} movies ({} now playing)",
            report.merged,
            merged.high_precedence_ids.len()
        );

        if merged.is_empty() {
            warn!("Both categories came back empty, nothing to publish");
            report.elapsed = started.elapsed();
            return Ok(report);
        }

        // =====================================================================
        // Enrich
        // =====================================================================
        let records = if self.settings.skip_enrichment {
            info!("Skipping enrichment");
            merged.records
        } else {
            let enricher = Enricher::new(
                self.client.clone(),
                self.settings.enrich_concurrency,
                self.settings.with_credits,
                self.settings.cast_limit,
            );
            let (records, stats) = enricher.enrich(merged.records).await;
            report.enrichment = stats;
            records
        };

        // =====================================================================
        // Publish
        // =====================================================================
        let publisher = BulkPublisher::new(
            Arc::clone(&self.store),
            self.index_name.as_str(),
            self.settings.chunk_size,
        );
        report.publish = publisher.publish(records.into_values()).await;

        report.elapsed = started.elapsed();
        log_summary(&report);
        Ok(report)
    }
}

fn log_summary(report: &SyncReport) {
    info!("");
    info!("Sync Summary");
    info!("============");
    info!("  Now playing fetched:  {}", report.now_playing_fetched);
    info!("  Popular fetched:      {}", report.popular_fetched);
    info!("  Merged:               {}", report.merged);
    info!(
        "  Enriched:             {} ({} failed)",
        report.enrichment.succeeded, report.enrichment.failed
    );
    info!("  Published:            {}", report.publish.success_count);
    info!("  Publish failures:     {}", report.publish.failures.len());
    info!("  Chunks:               {}", report.publish.chunks);
    info!("  Elapsed:              {:.1?}", report.elapsed);

    for failure in report.publish.failures.iter().take(10) {
        warn!("  Failed {}: {}", failure.document_id, failure.error);
    }
    if report.publish.failures.len() > 10 {
        warn!("  ... and {} more", report.publish.failures.len() - 10);
    }
}
