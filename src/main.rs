use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use movie_catalog_sync::config::{parse_path, AppConfig, CliConfig, FileConfig};
use movie_catalog_sync::{
    DocumentStore, ElasticsearchStore, FeedClient, InMemoryDocumentStore, SyncRunner,
};

#[derive(Parser, Debug)]
#[clap(version = concat!(env!("CARGO_PKG_VERSION"), "-", env!("GIT_HASH")))]
struct CliArgs {
    /// Path to a TOML config file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Catalog feed API key.
    #[clap(long, env = "TMDB_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the catalog feed API.
    #[clap(long)]
    pub feed_base_url: Option<String>,

    /// Base URL of the document store.
    #[clap(long)]
    pub store_url: Option<String>,

    /// Name of the index documents are published into.
    #[clap(long)]
    pub index_name: Option<String>,

    /// Number of "now playing" pages to fetch.
    #[clap(long)]
    pub now_playing_pages: Option<u32>,

    /// Number of "popular" pages to fetch.
    #[clap(long)]
    pub popular_pages: Option<u32>,

    /// Also fetch directors and top cast for every movie.
    #[clap(long)]
    pub with_credits: bool,

    /// Publish list data only, without per-movie detail lookups.
    #[clap(long)]
    pub skip_enrichment: bool,

    /// Publish into the existing index instead of dropping and recreating it.
    #[clap(long)]
    pub keep_index: bool,

    /// Run the whole pipeline against an in-memory store.
    #[clap(long)]
    pub dry_run: bool,

    /// Exit with an error if any document failed to publish.
    #[clap(long)]
    pub fail_on_errors: bool,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            api_key: self.api_key.clone(),
            feed_base_url: self.feed_base_url.clone(),
            store_url: self.store_url.clone(),
            index_name: self.index_name.clone(),
            now_playing_pages: self.now_playing_pages,
            popular_pages: self.popular_pages,
            with_credits: self.with_credits,
            skip_enrichment: self.skip_enrichment,
            keep_index: self.keep_index,
            dry_run: self.dry_run,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    info!(
        "catalog-sync {}-{}",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH")
    );

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    let client = FeedClient::new(&config.feed).context("Failed to create feed client")?;
    info!(
        "Catalog feed at {} (language {}, region {})",
        client.base_url(),
        config.feed.language,
        config.feed.region
    );

    let store: Arc<dyn DocumentStore> = if config.sync.dry_run {
        info!("Dry run, publishing into an in-memory store");
        Arc::new(InMemoryDocumentStore::new())
    } else {
        let store = ElasticsearchStore::new(&config.store)
            .context("Failed to create document store client")?;
        info!(
            "Publishing into {}/{}",
            store.base_url(),
            config.store.index_name
        );
        Arc::new(store)
    };

    let runner = SyncRunner::new(client, store, config.store.index_name.clone(), config.sync);
    let report = match runner.run().await {
        Ok(report) => report,
        Err(e) => {
            error!("Sync aborted: {}", e);
            return Err(e.into());
        }
    };

    if cli_args.fail_on_errors && report.has_failures() {
        bail!(
            "{} documents failed to publish",
            report.publish.failures.len()
        );
    }
    Ok(())
}
