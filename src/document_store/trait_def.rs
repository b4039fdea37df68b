//! Document store trait definition.

use super::models::{BulkItemOutcome, NowPlayingMovie, PublishAction};
use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document store responded with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Document store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Document store payload could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Searchable document store the catalog is published into.
///
/// Writes are upserts keyed by document id, so replaying the same action leaves
/// the store unchanged.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Check connectivity. Returns a human readable server version.
    async fn ping(&self) -> Result<String, StoreError>;

    async fn index_exists(&self, index: &str) -> Result<bool, StoreError>;

    /// Create `index` with the given settings and mappings.
    async fn create_index(
        &self,
        index: &str,
        definition: &serde_json::Value,
    ) -> Result<(), StoreError>;

    /// Delete `index`. Deleting a missing index is not an error.
    async fn delete_index(&self, index: &str) -> Result<(), StoreError>;

    /// Upsert a batch of documents in one call.
    ///
    /// An `Err` means the call as a whole failed; per-document rejections are
    /// reported in the returned outcomes, one per action.
    async fn bulk_upsert(
        &self,
        actions: &[PublishAction],
    ) -> Result<Vec<BulkItemOutcome>, StoreError>;

    /// Up to `limit` documents flagged as currently showing.
    async fn now_playing(
        &self,
        index: &str,
        limit: usize,
    ) -> Result<Vec<NowPlayingMovie>, StoreError>;
}
