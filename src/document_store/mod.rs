//! Document store the synchronized catalog is published into.

mod elasticsearch;
mod memory_store;
mod models;
mod schema;
mod trait_def;

pub use elasticsearch::ElasticsearchStore;
pub use memory_store::InMemoryDocumentStore;
pub use models::*;
pub use schema::{ensure_index, movie_index_definition, recreate_index};
pub use trait_def::{DocumentStore, StoreError};
