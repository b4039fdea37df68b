//! Generate a week of showtimes for the movies currently in theaters.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use movie_catalog_sync::config::{parse_path, FileConfig, ShowtimesAppConfig, ShowtimesCliConfig};
use movie_catalog_sync::showtimes::{ShowtimeGenerator, ShowtimeJob, SqliteShowtimeStore};
use movie_catalog_sync::ElasticsearchStore;

#[derive(Parser, Debug)]
#[clap(version = concat!(env!("CARGO_PKG_VERSION"), "-", env!("GIT_HASH")))]
struct CliArgs {
    /// Path to a TOML config file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Path to the SQLite database holding theaters, screens and showtimes.
    #[clap(long, value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// Base URL of the document store.
    #[clap(long)]
    pub store_url: Option<String>,

    /// Name of the index holding the movie documents.
    #[clap(long)]
    pub index_name: Option<String>,

    /// Number of days to schedule.
    #[clap(long)]
    pub days: Option<u32>,

    /// Maximum number of movies to schedule.
    #[clap(long)]
    pub movie_limit: Option<usize>,

    /// First day to schedule (YYYY-MM-DD). Defaults to today.
    #[clap(long)]
    pub start_date: Option<NaiveDate>,
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

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let config = ShowtimesAppConfig::resolve(
        &ShowtimesCliConfig {
            db_path: cli_args.db_path.clone(),
            store_url: cli_args.store_url.clone(),
            index_name: cli_args.index_name.clone(),
            days: cli_args.days,
            movie_limit: cli_args.movie_limit,
        },
        file_config,
    )?;

    let documents = ElasticsearchStore::new(&config.store)
        .context("Failed to create document store client")?;

    info!("Opening showtime database at {:?}", config.db_path);
    let mut database = SqliteShowtimeStore::open(&config.db_path)?;

    let start_date = cli_args
        .start_date
        .unwrap_or_else(|| Local::now().date_naive());
    let job = ShowtimeJob {
        documents: &documents,
        index_name: &config.store.index_name,
        database: &mut database,
        generator: ShowtimeGenerator::new(start_date, config.days),
        movie_limit: config.movie_limit,
    };

    match job.run(&mut rand::rng()).await? {
        Some(summary) => info!("Done, {} showtimes in the database", summary.total),
        None => info!("Nothing scheduled"),
    }
    Ok(())
}
