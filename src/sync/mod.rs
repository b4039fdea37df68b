//! Catalog synchronization pipeline.
//!
//! ```text
//! fetch(popular) ∥ fetch(now_playing) → merge → enrich → publish
//! ```

mod enrichment;
mod fetcher;
mod merge;
mod models;
mod publisher;
mod runner;

pub use enrichment::Enricher;
pub use fetcher::PageFetcher;
pub use merge::{merge, MergeOutcome};
pub use models::*;
pub use publisher::BulkPublisher;
pub use runner::{SyncError, SyncRunner};
