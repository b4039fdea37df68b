//! Elasticsearch-compatible HTTP implementation of [`DocumentStore`].

use super::models::{BulkItemOutcome, NowPlayingMovie, PublishAction};
use super::trait_def::{DocumentStore, StoreError};
use crate::config::StoreSettings;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Client for an Elasticsearch (or OpenSearch) cluster.
#[derive(Clone)]
pub struct ElasticsearchStore {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct InfoResponse {
    #[serde(default)]
    version: Option<InfoVersion>,
}

#[derive(Deserialize)]
struct InfoVersion {
    #[serde(default)]
    number: Option<String>,
}

#[derive(Deserialize)]
struct BulkResponse {
    #[serde(default)]
    errors: bool,
    #[serde(default)]
    items: Vec<HashMap<String, BulkResponseItem>>,
}

#[derive(Deserialize)]
struct BulkResponseItem {
    #[serde(default, rename = "_id")]
    id: Option<String>,
    #[serde(default)]
    status: u16,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

#[derive(Deserialize)]
struct SearchHits {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    #[serde(rename = "_source")]
    source: NowPlayingMovie,
}

impl ElasticsearchStore {
    pub fn new(settings: &StoreSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn ensure_success(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Status { status, body })
    }

    fn bulk_body(actions: &[PublishAction]) -> Result<String, StoreError> {
        let mut body = String::new();
        for action in actions {
            let header = json!({
                "index": { "_index": action.index(), "_id": action.document_id() }
            });
            body.push_str(&serde_json::to_string(&header)?);
            body.push('\n');
            body.push_str(&serde_json::to_string(action.document())?);
            body.push('\n');
        }
        Ok(body)
    }

    fn describe_error(error: &serde_json::Value) -> String {
        match (
            error.get("type").and_then(|t| t.as_str()),
            error.get("reason").and_then(|r| r.as_str()),
        ) {
            (Some(kind), Some(reason)) => format!("{}: {}", kind, reason),
            _ => error.to_string(),
        }
    }

    /// Pair bulk response items with the actions that produced them.
    ///
    /// Items come back in request order. Actions without an item are reported
    /// as rejected so no document silently disappears from the accounting.
    fn outcomes(actions: &[PublishAction], response: BulkResponse) -> Vec<BulkItemOutcome> {
        let mut items = response.items.into_iter();
        actions
            .iter()
            .map(|action| {
                let Some(item) = items.next().and_then(|entry| entry.into_values().next())
                else {
                    return BulkItemOutcome::rejected(
                        action.document_id(),
                        "missing from bulk response",
                    );
                };
                let id = item
                    .id
                    .unwrap_or_else(|| action.document_id().to_string());
                match item.error {
                    Some(error) => BulkItemOutcome::rejected(id, Self::describe_error(&error)),
                    None if (200..300).contains(&item.status) => BulkItemOutcome::accepted(id),
                    None => BulkItemOutcome::rejected(id, format!("status {}", item.status)),
                }
            })
            .collect()
    }
}

#[async_trait]
impl DocumentStore for ElasticsearchStore {
    async fn ping(&self) -> Result<String, StoreError> {
        let response = self.client.get(&self.base_url).send().await?;
        let info: InfoResponse = Self::ensure_success(response).await?.json().await?;
        Ok(info
            .version
            .and_then(|v| v.number)
            .unwrap_or_else(|| "unknown".to_string()))
    }

    async fn index_exists(&self, index: &str) -> Result<bool, StoreError> {
        let url = format!("{}/{}", self.base_url, index);
        let response = self.client.head(&url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            _ => Self::ensure_success(response).await.map(|_| true),
        }
    }

    async fn create_index(
        &self,
        index: &str,
        definition: &serde_json::Value,
    ) -> Result<(), StoreError> {
        let url = format!("{}/{}", self.base_url, index);
        let response = self.client.put(&url).json(definition).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> Result<(), StoreError> {
        let url = format!("{}/{}", self.base_url, index);
        let response = self.client.delete(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn bulk_upsert(
        &self,
        actions: &[PublishAction],
    ) -> Result<Vec<BulkItemOutcome>, StoreError> {
        if actions.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/_bulk", self.base_url);
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(Self::bulk_body(actions)?)
            .send()
            .await?;
        let bytes = Self::ensure_success(response).await?.bytes().await?;
        let bulk: BulkResponse = serde_json::from_slice(&bytes)?;

        if bulk.errors {
            debug!("Bulk call of {} actions reported item errors", actions.len());
        }
        Ok(Self::outcomes(actions, bulk))
    }

    async fn now_playing(
        &self,
        index: &str,
        limit: usize,
    ) -> Result<Vec<NowPlayingMovie>, StoreError> {
        let url = format!("{}/{}/_search", self.base_url, index);
        let query = json!({
            "query": { "term": { "is_now_playing": true } },
            "size": limit,
            "_source": ["id", "title", "runtime"]
        });
        let response = self.client.post(&url).json(&query).send().await?;
        let bytes = Self::ensure_success(response).await?.bytes().await?;
        let search: SearchResponse = serde_json::from_slice(&bytes)?;
        Ok(search.hits.hits.into_iter().map(|hit| hit.source).collect())
    }
}
