use crate::catalog_feed::RawListing;
use crate::document_store::MovieDocument;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::time::Duration;

/// Listings of one category keyed by movie id.
pub type CategoryResult = HashMap<u64, RawListing>;

/// Supplementary per-movie detail.
///
/// The default value is what a record keeps when its detail lookup fails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailBundle {
    pub runtime: u32,
    pub certification: String,
    pub providers: Vec<String>,
    pub provider_link: Option<String>,
    pub directors: Option<Vec<String>>,
    pub cast: Option<Vec<String>>,
}

/// One movie after merge, the unit carried through enrichment and publication.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRecord {
    pub id: u64,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
    pub release_date: Option<NaiveDate>,
    pub genre_ids: Vec<u32>,
    pub is_now_playing: bool,
    pub details: DetailBundle,
}

impl CanonicalRecord {
    pub fn from_listing(listing: RawListing, is_now_playing: bool) -> Self {
        Self {
            id: listing.id,
            title: listing.title,
            overview: listing.overview,
            poster_path: listing.poster_path,
            vote_average: listing.vote_average,
            release_date: listing.release_date,
            genre_ids: listing.genre_ids,
            is_now_playing,
            details: DetailBundle::default(),
        }
    }

    /// Replace the detail fields. Listing fields and the flag are untouched.
    pub fn apply_details(&mut self, details: DetailBundle) {
        self.details = details;
    }

    pub fn to_document(&self) -> MovieDocument {
        MovieDocument {
            id: self.id,
            title: self.title.clone(),
            overview: self.overview.clone(),
            poster_path: self.poster_path.clone(),
            vote_average: self.vote_average,
            release_date: self.release_date,
            genre_ids: self.genre_ids.clone(),
            is_now_playing: self.is_now_playing,
            runtime: self.details.runtime,
            certification: self.details.certification.clone(),
            providers: self.details.providers.clone(),
            provider_link: self.details.provider_link.clone(),
            directors: self.details.directors.clone(),
            cast: self.details.cast.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentStats {
    pub succeeded: usize,
    pub failed: usize,
}

/// A document the store did not accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureDetail {
    pub document_id: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub success_count: usize,
    pub failures: Vec<FailureDetail>,
    /// Number of bulk calls issued.
    pub chunks: usize,
}

impl PublishReport {
    pub fn attempted(&self) -> usize {
        self.success_count + self.failures.len()
    }
}

/// Outcome of a full synchronization run.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub now_playing_fetched: usize,
    pub popular_fetched: usize,
    pub merged: usize,
    pub enrichment: EnrichmentStats,
    pub publish: PublishReport,
    pub elapsed: Duration,
}

impl SyncReport {
    pub fn has_failures(&self) -> bool {
        !self.publish.failures.is_empty()
    }
}
