//! Chunked bulk publication into the document store.

use super::models::{CanonicalRecord, FailureDetail, PublishReport};
use crate::document_store::{DocumentStore, PublishAction};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct BulkPublisher {
    store: Arc<dyn DocumentStore>,
    index: String,
    chunk_size: usize,
}

impl BulkPublisher {
    pub fn new(store: Arc<dyn DocumentStore>, index: impl Into<String>, chunk_size: usize) -> Self {
        Self {
            store,
            index: index.into(),
            chunk_size: chunk_size.max(1),
        }
    }

    /// Upsert every record, `chunk_size` documents per store call.
    ///
    /// Rejections are collected per document. A chunk whose call fails as a
    /// whole counts all of its documents as failed, and the next chunk is
    /// still sent.
    pub async fn publish<I>(&self, records: I) -> PublishReport
    where
        I: IntoIterator<Item = CanonicalRecord>,
    {
        let mut report = PublishReport::default();
        let mut chunk: Vec<PublishAction> = Vec::with_capacity(self.chunk_size);

        let actions = records
            .into_iter()
            .map(|record| PublishAction::new(self.index.as_str(), record.to_document()));
        for action in actions {
            chunk.push(action);
            if chunk.len() == self.chunk_size {
                self.send_chunk(&chunk, &mut report).await;
                chunk.clear();
            }
        }
        if !chunk.is_empty() {
            self.send_chunk(&chunk, &mut report).await;
        }

        if report.chunks > 0 {
            info!(
                "Published to '{}': {} succeeded, {} failed in {} chunks",
                self.index,
                report.success_count,
                report.failures.len(),
                report.chunks
            );
        }
        report
    }

    async fn send_chunk(&self, chunk: &[PublishAction], report: &mut PublishReport) {
        report.chunks += 1;
        let chunk_number = report.chunks;

        match self.store.bulk_upsert(chunk).await {
            Ok(outcomes) => {
                let before = report.failures.len();
                for outcome in outcomes {
                    match outcome.error {
                        None => report.success_count += 1,
                        Some(error) => {
                            debug!("Document {} rejected: {}", outcome.document_id, error);
                            report.failures.push(FailureDetail {
                                document_id: outcome.document_id,
                                error,
                            });
                        }
                    }
                }
                let rejected = report.failures.len() - before;
                if rejected > 0 {
                    warn!(
                        "Chunk {}: {} of {} documents rejected",
                        chunk_number,
                        rejected,
                        chunk.len()
                    );
                } else {
                    debug!("Chunk {}: {} documents accepted", chunk_number, chunk.len());
                }
            }
            Err(e) => {
                warn!(
                    "Chunk {} of {} documents failed: {}",
                    chunk_number,
                    chunk.len(),
                    e
                );
                let error = e.to_string();
                report
                    .failures
                    .extend(chunk.iter().map(|action| FailureDetail {
                        document_id: action.document_id().to_string(),
                        error: error.clone(),
                    }));
            }
        }
    }
}
