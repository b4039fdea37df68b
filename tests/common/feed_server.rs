//! Mock catalog feed API
//!
//! Serves `/3/movie/{category}` list pages and `/3/movie/{id}` details from a
//! [`FeedFixture`], and counts every request it receives.

use super::constants::*;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// Minimal list entry.
pub fn listing(id: u64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "overview": format!("{} overview", title),
        "poster_path": format!("/{}.jpg", id),
        "vote_average": 7.2,
        "release_date": "2024-10-30",
        "genre_ids": [18, 53]
    })
}

/// Detail payload with a runtime, a certification and providers for
/// [`REGION`].
pub fn detail_payload(id: u64, runtime: u32, certification: &str, providers: &[&str]) -> Value {
    let flatrate: Vec<Value> = providers
        .iter()
        .map(|name| json!({ "provider_name": name }))
        .collect();
    json!({
        "id": id,
        "runtime": runtime,
        "release_dates": {
            "results": [
                { "iso_3166_1": "US", "release_dates": [{ "certification": "R" }] },
                { "iso_3166_1": REGION, "release_dates": [{ "certification": certification }] }
            ]
        },
        "watch/providers": {
            "results": {
                "KR": {
                    "link": format!("https://www.themoviedb.org/movie/{}/watch?locale={}", id, REGION),
                    "flatrate": flatrate
                }
            }
        },
        "credits": {
            "cast": [
                { "name": "Lead", "order": 0 },
                { "name": "Support", "order": 1 }
            ],
            "crew": [{ "name": "Director Name", "job": "Director" }]
        }
    })
}

/// What the mock feed serves.
#[derive(Default, Clone)]
pub struct FeedFixture {
    pages: HashMap<(String, u32), Vec<Value>>,
    details: HashMap<u64, Value>,
    /// Statuses returned, in order, before a list page is served normally.
    page_failures: HashMap<(String, u32), VecDeque<u16>>,
    /// Held before answering any request, so overlapping requests can be seen.
    response_delay: Duration,
}

impl FeedFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, category: &str, page: u32, results: Vec<Value>) -> Self {
        self.pages.insert((category.to_string(), page), results);
        self
    }

    pub fn details(mut self, id: u64, payload: Value) -> Self {
        self.details.insert(id, payload);
        self
    }

    pub fn failing_page(mut self, category: &str, page: u32, statuses: &[u16]) -> Self {
        self.page_failures
            .insert((category.to_string(), page), statuses.iter().copied().collect());
        self
    }

    pub fn response_delay(mut self, delay: Duration) -> Self {
        self.response_delay = delay;
        self
    }
}

/// Tracks how many requests are being served at once.
#[derive(Default)]
struct InFlight {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl InFlight {
    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }
}

struct FeedState {
    fixture: Mutex<FeedFixture>,
    list_requests: Mutex<HashMap<(String, u32), usize>>,
    detail_requests: AtomicUsize,
    list_in_flight: InFlight,
    detail_in_flight: InFlight,
}

/// Mock feed instance. Shuts down when dropped.
pub struct MockFeedServer {
    /// Base URL including the API version, e.g. "http://127.0.0.1:12345/3"
    pub base_url: String,
    state: Arc<FeedState>,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl MockFeedServer {
    pub async fn spawn(fixture: FeedFixture) -> Self {
        let state = Arc::new(FeedState {
            fixture: Mutex::new(fixture),
            list_requests: Mutex::new(HashMap::new()),
            detail_requests: AtomicUsize::new(0),
            list_in_flight: InFlight::default(),
            detail_in_flight: InFlight::default(),
        });

        let app = Router::new()
            .route("/3/movie/{segment}", get(movie))
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
                .expect("Mock feed failed");
        });

        Self {
            base_url: format!("http://127.0.0.1:{}/3", port),
            state,
            _shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Requests received for one list page, retries included.
    pub fn list_requests_for(&self, category: &str, page: u32) -> usize {
        self.state
            .list_requests
            .lock()
            .unwrap()
            .get(&(category.to_string(), page))
            .copied()
            .unwrap_or(0)
    }

    pub fn list_requests(&self) -> usize {
        self.state.list_requests.lock().unwrap().values().sum()
    }

    pub fn detail_requests(&self) -> usize {
        self.state.detail_requests.load(Ordering::SeqCst)
    }

    /// Most list page requests ever served at the same time.
    pub fn peak_list_in_flight(&self) -> usize {
        self.state.list_in_flight.peak.load(Ordering::SeqCst)
    }

    /// Most detail requests ever served at the same time.
    pub fn peak_detail_in_flight(&self) -> usize {
        self.state.detail_in_flight.peak.load(Ordering::SeqCst)
    }
}

async fn movie(
    State(state): State<Arc<FeedState>>,
    Path(segment): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if params.get("api_key").map(String::as_str) != Some(API_KEY) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "status_code": 7, "status_message": "Invalid API key" })),
        )
            .into_response();
    }

    let delay = state.fixture.lock().unwrap().response_delay;
    match segment.parse::<u64>() {
        Ok(id) => {
            state.detail_in_flight.enter();
            tokio::time::sleep(delay).await;
            let response = details(&state, id);
            state.detail_in_flight.leave();
            response
        }
        Err(_) => {
            let page = params
                .get("page")
                .and_then(|p| p.parse::<u32>().ok())
                .unwrap_or(1);
            state.list_in_flight.enter();
            tokio::time::sleep(delay).await;
            let response = list_page(&state, segment, page);
            state.list_in_flight.leave();
            response
        }
    }
}

fn list_page(state: &FeedState, category: String, page: u32) -> Response {
    let key = (category, page);
    *state
        .list_requests
        .lock()
        .unwrap()
        .entry(key.clone())
        .or_insert(0) += 1;

    let mut fixture = state.fixture.lock().unwrap();
    if let Some(status) = fixture
        .page_failures
        .get_mut(&key)
        .and_then(|statuses| statuses.pop_front())
    {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, "mock failure").into_response();
    }

    let results = fixture.pages.get(&key).cloned().unwrap_or_default();
    Json(json!({
        "page": page,
        "results": results,
        "total_pages": 500,
        "total_results": 10000
    }))
    .into_response()
}

fn details(state: &FeedState, id: u64) -> Response {
    state.detail_requests.fetch_add(1, Ordering::SeqCst);

    match state.fixture.lock().unwrap().details.get(&id) {
        Some(payload) => Json(payload.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "status_code": 34,
                "status_message": "The resource you requested could not be found."
            })),
        )
            .into_response(),
    }
}
