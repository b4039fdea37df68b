//! Per-movie detail enrichment.
//!
//! Every record gets one detail request. A record whose lookup fails keeps the
//! default [`DetailBundle`] and is still published.

use super::models::{CanonicalRecord, DetailBundle, EnrichmentStats};
use crate::catalog_feed::{FeedClient, MovieDetails};
use futures::stream::{self, StreamExt};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, warn};

const PROGRESS_LOG_EVERY: usize = 100;

impl DetailBundle {
    /// Extract the fields we publish from a detail payload.
    pub fn from_details(
        details: &MovieDetails,
        region: &str,
        with_credits: bool,
        cast_limit: usize,
    ) -> Self {
        let certification = details
            .release_dates
            .as_ref()
            .and_then(|dates| dates.results.iter().find(|r| r.iso_3166_1 == region))
            .and_then(|region_dates| {
                region_dates
                    .release_dates
                    .iter()
                    .filter_map(|entry| entry.certification.as_deref())
                    .find(|cert| !cert.is_empty())
            })
            .unwrap_or_default()
            .to_string();

        let region_providers = details
            .watch_providers
            .as_ref()
            .and_then(|providers| providers.results.get(region));
        let providers: Vec<String> = region_providers
            .map(|rp| {
                rp.flatrate
                    .iter()
                    .chain(&rp.rent)
                    .chain(&rp.buy)
                    .filter_map(|p| p.provider_name.clone())
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect()
            })
            .unwrap_or_default();
        let provider_link = region_providers.and_then(|rp| rp.link.clone());

        let (directors, cast) = if with_credits {
            let credits = details.credits.clone().unwrap_or_default();

            let mut directors: Vec<String> = Vec::new();
            for name in credits
                .crew
                .iter()
                .filter(|member| member.job.as_deref() == Some("Director"))
                .filter_map(|member| member.name.as_ref())
            {
                if !directors.contains(name) {
                    directors.push(name.clone());
                }
            }

            let mut cast_members = credits.cast;
            cast_members.sort_by_key(|member| member.order.unwrap_or(u32::MAX));
            let cast: Vec<String> = cast_members
                .into_iter()
                .filter_map(|member| member.name)
                .take(cast_limit)
                .collect();

            (Some(directors), Some(cast))
        } else {
            (None, None)
        };

        Self {
            runtime: details.runtime.unwrap_or(0),
            certification,
            providers,
            provider_link,
            directors,
            cast,
        }
    }
}

/// Bounded fan-out of detail lookups.
#[derive(Clone)]
pub struct Enricher {
    client: FeedClient,
    concurrency: usize,
    with_credits: bool,
    cast_limit: usize,
}

impl Enricher {
    pub fn new(
        client: FeedClient,
        concurrency: usize,
        with_credits: bool,
        cast_limit: usize,
    ) -> Self {
        Self {
            client,
            concurrency: concurrency.max(1),
            with_credits,
            cast_limit,
        }
    }

    /// Attach details to every record. Never drops a record.
    pub async fn enrich(
        &self,
        records: HashMap<u64, CanonicalRecord>,
    ) -> (HashMap<u64, CanonicalRecord>, EnrichmentStats) {
        let total = records.len();
        info!(
            "Enriching {} movies ({} concurrent, credits: {})",
            total, self.concurrency, self.with_credits
        );

        let mut tasks = stream::iter(records.into_values())
            .map(|mut record| async move {
                let bundle = self.lookup(record.id).await;
                let succeeded = bundle.is_some();
                record.apply_details(bundle.unwrap_or_default());
                (record, succeeded)
            })
            .buffer_unordered(self.concurrency);

        let mut enriched = HashMap::with_capacity(total);
        let mut stats = EnrichmentStats::default();
        while let Some((record, succeeded)) = tasks.next().await {
            if succeeded {
                stats.succeeded += 1;
            } else {
                stats.failed += 1;
            }
            enriched.insert(record.id, record);

            let done = enriched.len();
            if done % PROGRESS_LOG_EVERY == 0 && done < total {
                info!("Enriched {}/{} movies", done, total);
            }
        }

        info!(
            "Enrichment complete: {} succeeded, {} failed",
            stats.succeeded, stats.failed
        );
        (enriched, stats)
    }

    async fn lookup(&self, movie_id: u64) -> Option<DetailBundle> {
        match self.client.movie_details(movie_id, self.with_credits).await {
            Ok(details) => {
                debug!("Got details for movie {}", movie_id);
                Some(DetailBundle::from_details(
                    &details,
                    self.client.region(),
                    self.with_credits,
                    self.cast_limit,
                ))
            }
            Err(e) => {
                warn!("Detail lookup failed for movie {}: {}", movie_id, e);
                None
            }
        }
    }
}
