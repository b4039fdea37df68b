use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Shape of a movie document in the search index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDocument {
    pub id: u64,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
    pub release_date: Option<NaiveDate>,
    pub genre_ids: Vec<u32>,
    pub is_now_playing: bool,
    pub runtime: u32,
    pub certification: String,
    pub providers: Vec<String>,
    pub provider_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cast: Option<Vec<String>>,
}

/// One upsert-by-id write.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishAction {
    index: String,
    document_id: String,
    document: MovieDocument,
}

impl PublishAction {
    pub fn new(index: impl Into<String>, document: MovieDocument) -> Self {
        Self {
            index: index.into(),
            document_id: document.id.to_string(),
            document,
        }
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn document(&self) -> &MovieDocument {
        &self.document
    }
}

/// Store verdict for one document of a bulk call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkItemOutcome {
    pub document_id: String,
    /// `None` when the write was accepted.
    pub error: Option<String>,
}

impl BulkItemOutcome {
    pub fn accepted(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            error: None,
        }
    }

    pub fn rejected(document_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            error: Some(error.into()),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.error.is_none()
    }
}

/// A currently showing movie as read back by the showtime generator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NowPlayingMovie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub runtime: Option<u32>,
}
