use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub api_key: Option<String>,
    pub feed_base_url: Option<String>,
    pub store_url: Option<String>,
    pub index_name: Option<String>,
    pub store_timeout_secs: Option<u64>,

    // Feature configs
    pub feed: Option<FeedConfig>,
    pub sync: Option<SyncConfig>,
    pub showtimes: Option<ShowtimesConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct FeedConfig {
    pub language: Option<String>,
    pub region: Option<String>,
    pub request_interval_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    // Retry settings
    pub max_attempts: Option<u32>,
    pub initial_backoff_ms: Option<u64>,
    pub max_backoff_ms: Option<u64>,
    pub backoff_multiplier: Option<f64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct SyncConfig {
    pub now_playing_pages: Option<u32>,
    pub popular_pages: Option<u32>,
    pub fetch_concurrency: Option<usize>,
    pub enrich_concurrency: Option<usize>,
    pub skip_enrichment: Option<bool>,
    pub with_credits: Option<bool>,
    pub cast_limit: Option<usize>,
    pub chunk_size: Option<usize>,
    pub recreate_index: Option<bool>,
    pub dry_run: Option<bool>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct ShowtimesConfig {
    pub db_path: Option<String>,
    pub days: Option<u32>,
    pub movie_limit: Option<usize>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
