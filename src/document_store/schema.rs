//! Settings and mappings of the movie index, and index provisioning.

use super::trait_def::{DocumentStore, StoreError};
use serde_json::{json, Value};
use tracing::info;

/// Index definition: Korean morphological analysis on text fields plus an
/// n-gram sub-field on titles for partial matches.
pub fn movie_index_definition() -> Value {
    json!({
        "settings": {
            "index": { "max_ngram_diff": 10 },
            "analysis": {
                "analyzer": {
                    "nori_analyzer": {
                        "type": "custom",
                        "tokenizer": "nori_tokenizer",
                        "filter": ["nori_part_of_speech"]
                    },
                    "ngram_analyzer": {
                        "type": "custom",
                        "tokenizer": "ngram_tokenizer"
                    }
                },
                "tokenizer": {
                    "ngram_tokenizer": {
                        "type": "ngram",
                        "min_gram": 1,
                        "max_gram": 10,
                        "token_chars": ["letter", "digit"]
                    }
                },
                "filter": {
                    "nori_part_of_speech": {
                        "type": "nori_part_of_speech",
                        "stoptags": ["E", "J"]
                    }
                }
            }
        },
        "mappings": {
            "properties": {
                "id": { "type": "keyword" },
                "title": {
                    "type": "text",
                    "analyzer": "nori_analyzer",
                    "fields": {
                        "ngram": { "type": "text", "analyzer": "ngram_analyzer" },
                        "keyword": { "type": "keyword" }
                    }
                },
                "overview": { "type": "text", "analyzer": "nori_analyzer" },
                "poster_path": { "type": "keyword", "index": false },
                "vote_average": { "type": "float" },
                "release_date": { "type": "date" },
                "genre_ids": { "type": "keyword" },
                "is_now_playing": { "type": "boolean" },
                "runtime": { "type": "integer" },
                "certification": { "type": "keyword" },
                "providers": { "type": "keyword" },
                "provider_link": { "type": "keyword", "index": false },
                "directors": { "type": "keyword" },
                "cast": { "type": "keyword" }
            }
        }
    })
}

/// Create `index` unless it already exists. Returns true if it was created.
pub async fn ensure_index(store: &dyn DocumentStore, index: &str) -> Result<bool, StoreError> {
    if store.index_exists(index).await? {
        info!("Index '{}' already exists", index);
        return Ok(false);
    }
    store.create_index(index, &movie_index_definition()).await?;
    info!("Created index '{}' with movie mappings", index);
    Ok(true)
}

/// Drop `index` if present and create it again from scratch.
pub async fn recreate_index(store: &dyn DocumentStore, index: &str) -> Result<(), StoreError> {
    if store.index_exists(index).await? {
        store.delete_index(index).await?;
        info!("Deleted existing index '{}'", index);
    }
    store.create_index(index, &movie_index_definition()).await?;
    info!("Created index '{}' with movie mappings", index);
    Ok(())
}
