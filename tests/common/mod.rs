#![allow(dead_code)]

//! Common test infrastructure
//!
//! Mock HTTP servers standing in for the catalog feed and the document store,
//! plus helpers to build settings pointing at them. Tests should only import
//! from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{FeedFixture, MockFeedServer, MockStoreServer};
//!
//! #[tokio::test]
//! async fn test_sync() {
//!     let feed = MockFeedServer::spawn(FeedFixture::new()).await;
//!     let store = MockStoreServer::spawn().await;
//!     // ...
//! }
//! ```

mod constants;
mod feed_server;
mod settings;
mod store_server;

pub use constants::*;
pub use feed_server::{detail_payload, listing, FeedFixture, MockFeedServer};
pub use settings::{feed_settings, store_settings, sync_settings};
pub use store_server::MockStoreServer;
