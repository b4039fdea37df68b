//! Wire types for the catalog feed API.
//!
//! Every field that the feed may omit or send as `null` is decoded into an
//! `Option` or a defaulted collection, so a sparse payload never fails the whole
//! page or item.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// Upstream list partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Currently showing in theaters. Wins on merge.
    NowPlaying,
    /// Broadly popular titles.
    Popular,
}

impl Category {
    /// Path segment of the list endpoint.
    pub fn as_path(&self) -> &'static str {
        match self {
            Category::NowPlaying => "now_playing",
            Category::Popular => "popular",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_path())
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ListPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<RawListing>,
    #[serde(default)]
    pub total_pages: u32,
}

/// A movie as it appears in a list endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawListing {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub release_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre_ids: Vec<u32>,
}

/// Per-item detail payload, requested with
/// `append_to_response=release_dates,watch/providers[,credits]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieDetails {
    pub id: u64,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub release_dates: Option<ReleaseDates>,
    #[serde(default, rename = "watch/providers")]
    pub watch_providers: Option<WatchProviders>,
    #[serde(default)]
    pub credits: Option<Credits>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReleaseDates {
    #[serde(default)]
    pub results: Vec<RegionReleaseDates>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegionReleaseDates {
    #[serde(default)]
    pub iso_3166_1: String,
    #[serde(default)]
    pub release_dates: Vec<ReleaseDateEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReleaseDateEntry {
    #[serde(default)]
    pub certification: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchProviders {
    /// Keyed by ISO 3166-1 region code.
    #[serde(default)]
    pub results: HashMap<String, RegionProviders>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegionProviders {
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub flatrate: Vec<Provider>,
    #[serde(default)]
    pub rent: Vec<Provider>,
    #[serde(default)]
    pub buy: Vec<Provider>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Provider {
    #[serde(default)]
    pub provider_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CastMember {
    #[serde(default)]
    pub name: Option<String>,
    /// Billing position, 0 is top billed.
    #[serde(default)]
    pub order: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrewMember {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub job: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Missing, null, empty and malformed dates all become `None`.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()))
}
