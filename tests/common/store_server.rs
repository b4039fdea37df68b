//! Mock Elasticsearch server
//!
//! Implements the handful of endpoints the sync and the showtime generator
//! use: ping, index create/exists/delete, `_bulk` and `_search`. Documents can
//! be rejected by id, and whole bulk calls can be made to fail.

use super::constants::*;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, head, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Default)]
struct StoreState {
    /// index name -> definition
    indices: Mutex<HashMap<String, Value>>,
    /// index name -> document id -> source
    documents: Mutex<HashMap<String, BTreeMap<String, Value>>>,
    rejected_ids: Mutex<HashSet<String>>,
    /// 1-based numbers of bulk calls answered with a 500.
    failing_bulk_calls: Mutex<HashSet<usize>>,
    bulk_calls: AtomicUsize,
    bulk_sizes: Mutex<Vec<usize>>,
}

/// Mock store instance. Shuts down when dropped.
pub struct MockStoreServer {
    pub base_url: String,
    state: Arc<StoreState>,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl MockStoreServer {
    pub async fn spawn() -> Self {
        let state = Arc::new(StoreState::default());

        let app = Router::new()
            .route("/", get(info))
            .route("/_bulk", post(bulk))
            .route(
                "/{index}",
                head(index_exists).put(create_index).delete(delete_index),
            )
            .route("/{index}/_search", post(search))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Mock store failed");
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            state,
            _shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Reject these document ids in every later bulk call.
    pub fn reject_ids(&self, ids: &[&str]) {
        self.state
            .rejected_ids
            .lock()
            .unwrap()
            .extend(ids.iter().map(|id| id.to_string()));
    }

    /// Answer the given bulk calls (1-based) with a 500.
    pub fn fail_bulk_calls(&self, calls: &[usize]) {
        self.state
            .failing_bulk_calls
            .lock()
            .unwrap()
            .extend(calls.iter().copied());
    }

    pub fn bulk_calls(&self) -> usize {
        self.state.bulk_calls.load(Ordering::SeqCst)
    }

    /// Number of actions in each bulk call, in arrival order.
    pub fn bulk_sizes(&self) -> Vec<usize> {
        self.state.bulk_sizes.lock().unwrap().clone()
    }

    pub fn has_index(&self, index: &str) -> bool {
        self.state.indices.lock().unwrap().contains_key(index)
    }

    pub fn index_definition(&self, index: &str) -> Option<Value> {
        self.state.indices.lock().unwrap().get(index).cloned()
    }

    pub fn document(&self, index: &str, id: &str) -> Option<Value> {
        self.state
            .documents
            .lock()
            .unwrap()
            .get(index)
            .and_then(|docs| docs.get(id))
            .cloned()
    }

    pub fn document_count(&self, index: &str) -> usize {
        self.state
            .documents
            .lock()
            .unwrap()
            .get(index)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }
}

async fn info() -> Json<Value> {
    Json(json!({
        "name": "mock-node",
        "cluster_name": "mock",
        "version": { "number": STORE_VERSION }
    }))
}

async fn index_exists(
    State(state): State<Arc<StoreState>>,
    Path(index): Path<String>,
) -> StatusCode {
    if state.indices.lock().unwrap().contains_key(&index) {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn create_index(
    State(state): State<Arc<StoreState>>,
    Path(index): Path<String>,
    Json(definition): Json<Value>,
) -> Response {
    let mut indices = state.indices.lock().unwrap();
    if indices.contains_key(&index) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": { "type": "resource_already_exists_exception", "reason": format!("index [{}] already exists", index) },
                "status": 400
            })),
        )
            .into_response();
    }
    indices.insert(index.clone(), definition);
    state.documents.lock().unwrap().entry(index.clone()).or_default();
    Json(json!({ "acknowledged": true, "index": index })).into_response()
}

async fn delete_index(
    State(state): State<Arc<StoreState>>,
    Path(index): Path<String>,
) -> Response {
    if state.indices.lock().unwrap().remove(&index).is_none() {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": { "type": "index_not_found_exception" }, "status": 404 })),
        )
            .into_response();
    }
    state.documents.lock().unwrap().remove(&index);
    Json(json!({ "acknowledged": true })).into_response()
}

async fn bulk(State(state): State<Arc<StoreState>>, body: String) -> Response {
    let call = state.bulk_calls.fetch_add(1, Ordering::SeqCst) + 1;
    if state.failing_bulk_calls.lock().unwrap().contains(&call) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "mock bulk failure").into_response();
    }

    let lines: Vec<Value> = match body
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(serde_json::from_str::<Value>)
        .collect::<Result<_, _>>()
    {
        Ok(lines) => lines,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };
    state.bulk_sizes.lock().unwrap().push(lines.len() / 2);

    let rejected = state.rejected_ids.lock().unwrap().clone();
    let mut documents = state.documents.lock().unwrap();
    let mut items = Vec::new();
    let mut errors = false;
    for pair in lines.chunks(2) {
        let header = &pair[0]["index"];
        let index = header["_index"].as_str().unwrap_or_default().to_string();
        let id = header["_id"].as_str().unwrap_or_default().to_string();

        if rejected.contains(&id) {
            errors = true;
            items.push(json!({
                "index": {
                    "_index": index,
                    "_id": id,
                    "status": 400,
                    "error": { "type": "mapper_parsing_exception", "reason": "failed to parse field [release_date]" }
                }
            }));
            continue;
        }

        let source = pair.get(1).cloned().unwrap_or(Value::Null);
        let previous = documents.entry(index.clone()).or_default().insert(id.clone(), source);
        let (result, status) = match previous {
            Some(_) => ("updated", 200),
            None => ("created", 201),
        };
        items.push(json!({
            "index": { "_index": index, "_id": id, "result": result, "status": status }
        }));
    }

    Json(json!({ "took": 3, "errors": errors, "items": items })).into_response()
}

async fn search(
    State(state): State<Arc<StoreState>>,
    Path(index): Path<String>,
    Json(query): Json<Value>,
) -> Response {
    let size = query["size"].as_u64().unwrap_or(10) as usize;
    let wanted = query["query"]["term"]["is_now_playing"].as_bool();

    let documents = state.documents.lock().unwrap();
    let Some(docs) = documents.get(&index) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": { "type": "index_not_found_exception" }, "status": 404 })),
        )
            .into_response();
    };

    let hits: Vec<Value> = docs
        .iter()
        .filter(|(_, doc)| wanted.is_none() || doc["is_now_playing"].as_bool() == wanted)
        .take(size)
        .map(|(id, doc)| json!({ "_index": index, "_id": id, "_source": doc }))
        .collect();

    Json(json!({
        "hits": { "total": { "value": hits.len(), "relation": "eq" }, "hits": hits }
    }))
    .into_response()
}
