//! In-process stand-in for a DraftBuddy frame's HTTP surface.
//!
//! Binds an ephemeral loopback port and serves the same routes the
//! firmware does, with switches for failure injection and a request
//! recorder the assertions read back.

// Shared across test binaries; not every binary uses every helper.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// One request as the device saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Handle to a spawned mock frame. Clones share the same device state.
#[derive(Clone)]
pub struct MockDevice {
    state: Arc<DeviceState>,
}

struct DeviceState {
    status: Mutex<Value>,
    healthy: AtomicBool,
    healthy_for: AtomicUsize,
    api_healthy: AtomicBool,
    upload_healthy: AtomicBool,
    status_delay_ms: AtomicU64,
    status_hits: AtomicUsize,
    status_in_flight: AtomicUsize,
    status_peak_in_flight: AtomicUsize,
    images: Mutex<Vec<String>>,
    thumbnails: Mutex<HashMap<String, Vec<u8>>>,
    backgrounds: Mutex<HashMap<String, Vec<u8>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// A status body typical of a provisioned master frame.
pub fn service_status(name: &str) -> Value {
    json!({
        "device": name,
        "service": "draftbuddy",
        "mode": "service",
        "uptime": 3600,
        "wifi_ssid": "workshop",
        "slave_count": 2,
        "free_heap": 150_000,
    })
}

/// A status body of a follower panel.
pub fn slave_status(name: &str) -> Value {
    json!({
        "device": name,
        "mode": "slave",
        "uptime": 60,
    })
}

impl MockDevice {
    /// Spawn a healthy frame answering as a service-mode master.
    pub async fn spawn() -> (MockDevice, String) {
        Self::spawn_with_status(service_status("DraftBuddy Frame")).await
    }

    /// Spawn a frame with a specific `/status` body.
    pub async fn spawn_with_status(status: Value) -> (MockDevice, String) {
        let device = MockDevice {
            state: Arc::new(DeviceState {
                status: Mutex::new(status),
                healthy: AtomicBool::new(true),
                healthy_for: AtomicUsize::new(usize::MAX),
                api_healthy: AtomicBool::new(true),
                upload_healthy: AtomicBool::new(true),
                status_delay_ms: AtomicU64::new(0),
                status_hits: AtomicUsize::new(0),
                status_in_flight: AtomicUsize::new(0),
                status_peak_in_flight: AtomicUsize::new(0),
                images: Mutex::new(Vec::new()),
                thumbnails: Mutex::new(HashMap::new()),
                backgrounds: Mutex::new(HashMap::new()),
                requests: Mutex::new(Vec::new()),
            }),
        };

        let app = Router::new()
            .route("/status", get(get_status))
            .route("/api/gallery", get(get_gallery))
            .route("/api/thumbnail/:name", get(get_thumbnail))
            .route("/api/background-raw/:name", get(get_background))
            .route("/api/set-background", post(post_api))
            .route("/api/delete-background", post(post_api))
            .route("/upload", post(post_upload))
            .with_state(device.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (device, addr.to_string())
    }

    /// Toggle `/status` between healthy and HTTP 500.
    pub fn set_healthy(&self, healthy: bool) {
        self.state.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Answer `/status` healthy for the first `hits` requests, then 500.
    pub fn fail_status_after(&self, hits: usize) {
        self.state.healthy_for.store(hits, Ordering::SeqCst);
    }

    /// Toggle the gallery API routes between healthy and HTTP 500.
    pub fn set_api_healthy(&self, healthy: bool) {
        self.state.api_healthy.store(healthy, Ordering::SeqCst);
    }

    /// Toggle `/upload` between healthy and HTTP 500.
    pub fn set_upload_healthy(&self, healthy: bool) {
        self.state.upload_healthy.store(healthy, Ordering::SeqCst);
    }

    /// Replace the `/status` body.
    pub fn set_status(&self, status: Value) {
        *self.state.status.lock().unwrap() = status;
    }

    /// Delay every `/status` response, for timeout tests.
    pub fn set_status_delay(&self, delay: Duration) {
        self.state
            .status_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// How many times `/status` has been hit, healthy or not.
    pub fn status_hits(&self) -> usize {
        self.state.status_hits.load(Ordering::SeqCst)
    }

    /// Most `/status` requests ever observed in flight at once.
    pub fn peak_status_in_flight(&self) -> usize {
        self.state.status_peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn set_images(&self, names: &[&str]) {
        *self.state.images.lock().unwrap() = names.iter().map(|n| n.to_string()).collect();
    }

    pub fn insert_thumbnail(&self, name: &str, data: Vec<u8>) {
        self.state
            .thumbnails
            .lock()
            .unwrap()
            .insert(name.to_string(), data);
    }

    pub fn insert_background(&self, name: &str, data: Vec<u8>) {
        self.state
            .backgrounds
            .lock()
            .unwrap()
            .insert(name.to_string(), data);
    }

    /// Every API/upload request recorded so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.state.requests.lock().unwrap().last().cloned()
    }

    fn record(&self, method: &str, uri: &Uri, headers: &HeaderMap, body: Bytes) {
        self.state.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            path: uri.path().to_string(),
            content_type: headers
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body,
        });
    }
}

/// Bind and immediately release a loopback port, yielding an address
/// that refuses connections.
pub async fn refused_addr() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr.to_string()
}

async fn get_status(State(device): State<MockDevice>) -> (StatusCode, Json<Value>) {
    let state = &device.state;
    let hit = state.status_hits.fetch_add(1, Ordering::SeqCst) + 1;

    let in_flight = state.status_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    state
        .status_peak_in_flight
        .fetch_max(in_flight, Ordering::SeqCst);

    let delay = state.status_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    state.status_in_flight.fetch_sub(1, Ordering::SeqCst);

    let healthy =
        state.healthy.load(Ordering::SeqCst) && hit <= state.healthy_for.load(Ordering::SeqCst);
    if !healthy {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "offline"})),
        );
    }

    (StatusCode::OK, Json(state.status.lock().unwrap().clone()))
}

async fn get_gallery(
    State(device): State<MockDevice>,
    uri: Uri,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    device.record("GET", &uri, &headers, Bytes::new());

    if !device.state.api_healthy.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "gallery unavailable"})),
        );
    }

    let images = device.state.images.lock().unwrap().clone();
    (StatusCode::OK, Json(json!({ "images": images })))
}

async fn get_thumbnail(
    State(device): State<MockDevice>,
    Path(name): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> (StatusCode, Vec<u8>) {
    device.record("GET", &uri, &headers, Bytes::new());
    serve_blob(&device.state.thumbnails, &name)
}

async fn get_background(
    State(device): State<MockDevice>,
    Path(name): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> (StatusCode, Vec<u8>) {
    device.record("GET", &uri, &headers, Bytes::new());
    serve_blob(&device.state.backgrounds, &name)
}

fn serve_blob(store: &Mutex<HashMap<String, Vec<u8>>>, name: &str) -> (StatusCode, Vec<u8>) {
    match store.lock().unwrap().get(name) {
        Some(data) => (StatusCode::OK, data.clone()),
        None => (StatusCode::NOT_FOUND, Vec::new()),
    }
}

async fn post_api(
    State(device): State<MockDevice>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    device.record("POST", &uri, &headers, body);

    if !device.state.api_healthy.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "api unavailable"})),
        );
    }

    (StatusCode::OK, Json(json!({"success": true})))
}

async fn post_upload(
    State(device): State<MockDevice>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    device.record("POST", &uri, &headers, body);

    if !device.state.upload_healthy.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "upload rejected".to_string(),
        );
    }

    (StatusCode::OK, json!({"success": true}).to_string())
}
