//! Settings pointing at the mock servers

use super::constants::*;
use movie_catalog_sync::config::{FeedSettings, StoreSettings, SyncSettings};

/// Feed settings without throttling and with millisecond backoff.
pub fn feed_settings(base_url: &str) -> FeedSettings {
    FeedSettings {
        base_url: base_url.to_string(),
        api_key: API_KEY.to_string(),
        language: "ko-KR".to_string(),
        region: REGION.to_string(),
        request_interval_ms: 0,
        request_timeout_secs: 5,
        max_attempts: 3,
        initial_backoff_ms: TEST_BACKOFF_MS,
        max_backoff_ms: TEST_BACKOFF_MS * 4,
        backoff_multiplier: 2.0,
    }
}

pub fn store_settings(base_url: &str) -> StoreSettings {
    StoreSettings {
        url: base_url.to_string(),
        index_name: INDEX_NAME.to_string(),
        timeout_secs: 5,
    }
}

pub fn sync_settings(now_playing_pages: u32, popular_pages: u32) -> SyncSettings {
    SyncSettings {
        now_playing_pages,
        popular_pages,
        fetch_concurrency: 4,
        enrich_concurrency: 4,
        ..SyncSettings::default()
    }
}
