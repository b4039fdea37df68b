//! Movie Catalog Sync Library
//!
//! Pulls the movie catalog feed, reconciles its categories and publishes the
//! result into a search index. Also hosts the showtime generator that reads
//! the published index back.

pub mod catalog_feed;
pub mod config;
pub mod document_store;
pub mod showtimes;
pub mod sync;

// Re-export commonly used types for convenience
pub use catalog_feed::FeedClient;
pub use document_store::{DocumentStore, ElasticsearchStore, InMemoryDocumentStore};
pub use sync::{SyncError, SyncReport, SyncRunner};
