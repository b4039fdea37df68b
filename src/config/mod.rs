mod file_config;

pub use file_config::{FeedConfig, FileConfig, ShowtimesConfig, SyncConfig};

use anyhow::{bail, Context, Result};
use std::path::PathBuf;

pub const DEFAULT_FEED_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_STORE_URL: &str = "http://localhost:9200";
pub const DEFAULT_INDEX_NAME: &str = "movies";

/// Resolve a path given on the command line to an absolute one. Paths that do
/// not exist yet are joined onto the working directory.
pub fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub api_key: Option<String>,
    pub feed_base_url: Option<String>,
    pub store_url: Option<String>,
    pub index_name: Option<String>,
    pub now_playing_pages: Option<u32>,
    pub popular_pages: Option<u32>,
    pub with_credits: bool,
    pub skip_enrichment: bool,
    /// Publish into the existing index instead of rebuilding it.
    pub keep_index: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub feed: FeedSettings,
    pub store: StoreSettings,
    pub sync: SyncSettings,
}

/// Everything the feed client needs.
#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub base_url: String,
    pub api_key: String,
    pub language: String,
    pub region: String,
    /// Spacing between outbound requests; 0 disables throttling.
    pub request_interval_ms: u64,
    pub request_timeout_secs: u64,
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub backoff_multiplier: f64,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_FEED_BASE_URL.to_string(),
            api_key: String::new(),
            language: "ko-KR".to_string(),
            region: "KR".to_string(),
            request_interval_ms: 50,
            request_timeout_secs: 10,
            max_attempts: 3,
            initial_backoff_ms: 500,
            max_backoff_ms: 8_000,
            backoff_multiplier: 2.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub url: String,
    pub index_name: String,
    pub timeout_secs: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_STORE_URL.to_string(),
            index_name: DEFAULT_INDEX_NAME.to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub now_playing_pages: u32,
    pub popular_pages: u32,
    /// Worker count of the page-fetch pool.
    pub fetch_concurrency: usize,
    /// Worker count of the detail-fetch pool.
    pub enrich_concurrency: usize,
    pub skip_enrichment: bool,
    pub with_credits: bool,
    pub cast_limit: usize,
    pub chunk_size: usize,
    /// Rebuild the index on every run so movies that left the feed disappear.
    pub recreate_index: bool,
    pub dry_run: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            now_playing_pages: 5,
            popular_pages: 50,
            fetch_concurrency: 8,
            enrich_concurrency: 8,
            skip_enrichment: false,
            with_credits: false,
            cast_limit: 20,
            chunk_size: 500,
            recreate_index: true,
            dry_run: false,
        }
    }
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let api_key = file
            .api_key
            .or_else(|| cli.api_key.clone())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "api_key must be specified via --api-key, TMDB_API_KEY or in config file"
                )
            })?;

        let feed_defaults = FeedSettings::default();
        let feed_file = file.feed.unwrap_or_default();
        let feed = FeedSettings {
            base_url: file
                .feed_base_url
                .or_else(|| cli.feed_base_url.clone())
                .unwrap_or(feed_defaults.base_url),
            api_key,
            language: feed_file.language.unwrap_or(feed_defaults.language),
            region: feed_file.region.unwrap_or(feed_defaults.region),
            request_interval_ms: feed_file
                .request_interval_ms
                .unwrap_or(feed_defaults.request_interval_ms),
            request_timeout_secs: feed_file
                .request_timeout_secs
                .unwrap_or(feed_defaults.request_timeout_secs),
            max_attempts: feed_file.max_attempts.unwrap_or(feed_defaults.max_attempts),
            initial_backoff_ms: feed_file
                .initial_backoff_ms
                .unwrap_or(feed_defaults.initial_backoff_ms),
            max_backoff_ms: feed_file
                .max_backoff_ms
                .unwrap_or(feed_defaults.max_backoff_ms),
            backoff_multiplier: feed_file
                .backoff_multiplier
                .unwrap_or(feed_defaults.backoff_multiplier),
        };

        let store_defaults = StoreSettings::default();
        let store = StoreSettings {
            url: file
                .store_url
                .or_else(|| cli.store_url.clone())
                .unwrap_or(store_defaults.url),
            index_name: file
                .index_name
                .or_else(|| cli.index_name.clone())
                .unwrap_or(store_defaults.index_name),
            timeout_secs: file
                .store_timeout_secs
                .unwrap_or(store_defaults.timeout_secs),
        };

        let sync_defaults = SyncSettings::default();
        let sync_file = file.sync.unwrap_or_default();
        let sync = SyncSettings {
            now_playing_pages: sync_file
                .now_playing_pages
                .or(cli.now_playing_pages)
                .unwrap_or(sync_defaults.now_playing_pages),
            popular_pages: sync_file
                .popular_pages
                .or(cli.popular_pages)
                .unwrap_or(sync_defaults.popular_pages),
            fetch_concurrency: sync_file
                .fetch_concurrency
                .unwrap_or(sync_defaults.fetch_concurrency),
            enrich_concurrency: sync_file
                .enrich_concurrency
                .unwrap_or(sync_defaults.enrich_concurrency),
            skip_enrichment: sync_file.skip_enrichment.unwrap_or(cli.skip_enrichment),
            with_credits: sync_file.with_credits.unwrap_or(cli.with_credits),
            cast_limit: sync_file.cast_limit.unwrap_or(sync_defaults.cast_limit),
            chunk_size: sync_file.chunk_size.unwrap_or(sync_defaults.chunk_size),
            recreate_index: sync_file.recreate_index.unwrap_or(!cli.keep_index),
            dry_run: sync_file.dry_run.unwrap_or(cli.dry_run),
        };

        let config = Self { feed, store, sync };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.sync.chunk_size == 0 {
            bail!("chunk_size must be greater than 0");
        }
        if self.sync.fetch_concurrency == 0 || self.sync.enrich_concurrency == 0 {
            bail!("fetch_concurrency and enrich_concurrency must be greater than 0");
        }
        if self.feed.max_attempts == 0 {
            bail!("max_attempts must be at least 1");
        }
        if self.feed.backoff_multiplier < 1.0 {
            bail!(
                "backoff_multiplier must be at least 1.0, got {}",
                self.feed.backoff_multiplier
            );
        }
        Ok(())
    }
}

/// CLI arguments of the showtime generator.
#[derive(Debug, Clone, Default)]
pub struct ShowtimesCliConfig {
    pub db_path: Option<PathBuf>,
    pub store_url: Option<String>,
    pub index_name: Option<String>,
    pub days: Option<u32>,
    pub movie_limit: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ShowtimesAppConfig {
    pub db_path: PathBuf,
    pub store: StoreSettings,
    pub days: u32,
    pub movie_limit: usize,
}

impl ShowtimesAppConfig {
    /// Same precedence rules as [`AppConfig::resolve`].
    pub fn resolve(cli: &ShowtimesCliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();
        let showtimes = file.showtimes.unwrap_or_default();

        let db_path = showtimes
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_path must be specified via --db-path or in config file")
            })?;

        let store_defaults = StoreSettings::default();
        let store = StoreSettings {
            url: file
                .store_url
                .or_else(|| cli.store_url.clone())
                .unwrap_or(store_defaults.url),
            index_name: file
                .index_name
                .or_else(|| cli.index_name.clone())
                .unwrap_or(store_defaults.index_name),
            timeout_secs: file
                .store_timeout_secs
                .unwrap_or(store_defaults.timeout_secs),
        };

        let days = showtimes.days.or(cli.days).unwrap_or(7);
        if days == 0 {
            bail!("days must be greater than 0");
        }

        Ok(Self {
            db_path,
            store,
            days,
            movie_limit: showtimes.movie_limit.or(cli.movie_limit).unwrap_or(10),
        })
    }
}
