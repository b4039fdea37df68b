use super::generator::ShowtimeGenerator;
use super::models::ShowtimeSummary;
use super::store::SqliteShowtimeStore;
use crate::document_store::DocumentStore;
use anyhow::{Context, Result};
use rand::Rng;
use tracing::{info, warn};

/// Reads the movies currently showing from the search index and writes a
/// timetable for them into the relational store.
pub struct ShowtimeJob<'a> {
    pub documents: &'a dyn DocumentStore,
    pub index_name: &'a str,
    pub database: &'a mut SqliteShowtimeStore,
    pub generator: ShowtimeGenerator,
    pub movie_limit: usize,
}

impl ShowtimeJob<'_> {
    /// Returns `None` when there was nothing to schedule.
    pub async fn run<R: Rng>(mut self, rng: &mut R) -> Result<Option<ShowtimeSummary>> {
        info!(
            "Generating showtimes from {} to {}",
            self.generator.start_date(),
            self.generator.end_date()
        );

        let movies = self
            .documents
            .now_playing(self.index_name, self.movie_limit)
            .await
            .context("Failed to query movies now playing")?;
        if movies.is_empty() {
            warn!("No movies now playing in '{}', nothing to schedule", self.index_name);
            return Ok(None);
        }
        info!("Found {} movies now playing", movies.len());
        for movie in &movies {
            info!(
                "  - {} ({} min)",
                movie.title,
                movie
                    .runtime
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "?".to_string())
            );
        }

        let screens = self.database.list_screens()?;
        if screens.is_empty() {
            warn!("No screens in the database, nothing to schedule");
            return Ok(None);
        }
        info!("Found {} screens", screens.len());

        let showtimes = self.generator.generate(&movies, &screens, rng);
        info!("Generated {} showtimes", showtimes.len());

        self.database.insert_showtimes(&showtimes)?;

        let summary = self.database.summary()?;
        log_summary(&summary);
        Ok(Some(summary))
    }
}

fn log_summary(summary: &ShowtimeSummary) {
    info!("");
    info!("Showtime Summary");
    info!("================");
    info!("Total showtimes: {}", summary.total);

    info!("");
    info!("Per movie:");
    for (movie_id, count) in &summary.per_movie {
        info!("  {}: {}", movie_id, count);
    }

    info!("");
    info!("Per day:");
    for (date, count) in &summary.per_date {
        info!("  {}: {}", date, count);
    }

    info!("");
    info!("Busiest screens:");
    for usage in &summary.top_screens {
        info!(
            "  {} {}: {}",
            usage.theater_name, usage.screen_name, usage.showtimes
        );
    }
}
