//! In-process document store.
//!
//! Backs `--dry-run` syncs, where the full pipeline runs but nothing leaves the
//! machine.

use super::models::{BulkItemOutcome, MovieDocument, NowPlayingMovie, PublishAction};
use super::trait_def::{DocumentStore, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

type Index = HashMap<String, MovieDocument>;

#[derive(Default)]
pub struct InMemoryDocumentStore {
    indices: Mutex<HashMap<String, Index>>,
    definitions: Mutex<HashMap<String, serde_json::Value>>,
    bulk_calls: AtomicUsize,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `bulk_upsert` calls received so far.
    pub fn bulk_calls(&self) -> usize {
        self.bulk_calls.load(Ordering::SeqCst)
    }

    pub async fn document(&self, index: &str, document_id: &str) -> Option<MovieDocument> {
        self.indices
            .lock()
            .await
            .get(index)
            .and_then(|docs| docs.get(document_id))
            .cloned()
    }

    pub async fn document_count(&self, index: &str) -> usize {
        self.indices
            .lock()
            .await
            .get(index)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }

    pub async fn definition(&self, index: &str) -> Option<serde_json::Value> {
        self.definitions.lock().await.get(index).cloned()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn ping(&self) -> Result<String, StoreError> {
        Ok("in-memory".to_string())
    }

    async fn index_exists(&self, index: &str) -> Result<bool, StoreError> {
        Ok(self.indices.lock().await.contains_key(index))
    }

    async fn create_index(
        &self,
        index: &str,
        definition: &serde_json::Value,
    ) -> Result<(), StoreError> {
        self.indices
            .lock()
            .await
            .entry(index.to_string())
            .or_default();
        self.definitions
            .lock()
            .await
            .insert(index.to_string(), definition.clone());
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> Result<(), StoreError> {
        self.indices.lock().await.remove(index);
        self.definitions.lock().await.remove(index);
        Ok(())
    }

    async fn bulk_upsert(
        &self,
        actions: &[PublishAction],
    ) -> Result<Vec<BulkItemOutcome>, StoreError> {
        self.bulk_calls.fetch_add(1, Ordering::SeqCst);
        let mut indices = self.indices.lock().await;
        Ok(actions
            .iter()
            .map(|action| {
                indices
                    .entry(action.index().to_string())
                    .or_default()
                    .insert(action.document_id().to_string(), action.document().clone());
                BulkItemOutcome::accepted(action.document_id())
            })
            .collect())
    }

    async fn now_playing(
        &self,
        index: &str,
        limit: usize,
    ) -> Result<Vec<NowPlayingMovie>, StoreError> {
        let indices = self.indices.lock().await;
        let mut movies: Vec<NowPlayingMovie> = indices
            .get(index)
            .into_iter()
            .flat_map(|docs| docs.values())
            .filter(|doc| doc.is_now_playing)
            .map(|doc| NowPlayingMovie {
                id: doc.id,
                title: doc.title.clone(),
                runtime: Some(doc.runtime),
            })
            .collect();
        movies.sort_by_key(|movie| movie.id);
        movies.truncate(limit);
        Ok(movies)
    }
}
