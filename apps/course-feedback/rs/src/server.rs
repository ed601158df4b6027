use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use feedback_dom::html::render_page;
use feedback_dom::Snapshot;
use futures::stream::{self, Stream, StreamExt};
use tokio::sync::{broadcast, watch, Mutex};

use crate::entry::{FeedbackEntry, FeedbackInput};
use crate::error::AppError;
use crate::page::{Action, ActionPayload, Page};
use crate::store::FeedbackStore;
use crate::view;

// ── Shared state ────────────────────────────────────────────────────

/// What read-only requests see: the page as a new visitor gets it and the
/// latest entry. Refreshed after every action.
#[derive(Debug, Clone)]
pub struct Shown {
    pub first_paint: Snapshot,
    pub latest: Option<FeedbackEntry>,
}

pub struct AppState<S> {
    /// Held for the whole of an action, remote insert included, so
    /// submissions are applied one at a time. Read paths use `shown`
    /// instead and never wait on it.
    pub page: Mutex<Page<S>>,
    pub shown: watch::Sender<Shown>,
    pub updates: broadcast::Sender<String>,
    pub public_dir: PathBuf,
}

impl<S: FeedbackStore> AppState<S> {
    pub fn new(store: S, public_dir: PathBuf) -> Self {
        let page = Page::new(store);
        let (shown, _) = watch::channel(Shown {
            first_paint: page.first_paint(),
            latest: None,
        });
        let (updates, _) = broadcast::channel(64);
        Self {
            page: Mutex::new(page),
            shown,
            updates,
            public_dir,
        }
    }

    /// Refresh the read-side view and push the page to every connected SSE
    /// client. Returns the snapshot as the acting user sees it.
    fn publish(&self, page: &Page<S>) -> Snapshot {
        let snapshot = page.snapshot();
        self.shown.send_replace(Shown {
            first_paint: page.first_paint(),
            latest: page.latest().cloned(),
        });
        if let Some(json) = encode(&snapshot) {
            // Err only means nobody is listening
            let _ = self.updates.send(json);
        }
        snapshot
    }
}

fn encode(snapshot: &Snapshot) -> Option<String> {
    snapshot
        .to_json()
        .map_err(|e| tracing::error!("snapshot serialization failed: {}", e))
        .ok()
}

// ── Router ──────────────────────────────────────────────────────────

pub fn router<S: FeedbackStore + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", get(index::<S>))
        .route("/index.html", get(index::<S>))
        .route("/sse", get(sse::<S>))
        .route("/actions/:action", post(action::<S>))
        .route("/api/feedback", post(create_feedback::<S>))
        .route("/api/feedback/latest", get(latest_feedback::<S>))
        .fallback(static_file::<S>)
        .with_state(state)
}

// ── Handlers: UI ────────────────────────────────────────────────────

async fn health() -> &'static str {
    "ok"
}

async fn index<S: FeedbackStore + 'static>(State(state): State<Arc<AppState<S>>>) -> Html<String> {
    let root = state.shown.borrow().first_paint.root.clone();
    Html(render_page(&view::page_options(root)))
}

async fn sse<S: FeedbackStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // Subscribe before taking the snapshot so no update slips between them
    let rx = state.updates.subscribe();
    let first = encode(&state.shown.borrow().first_paint);
    tracing::debug!(clients = state.updates.receiver_count(), "sse client connected");

    let events = stream::iter(first)
        .chain(snapshot_updates(rx))
        .map(|json| Ok::<_, Infallible>(message(json)));
    Sse::new(events).keep_alive(KeepAlive::new().interval(Duration::from_secs(30)))
}

/// Published snapshots in order. A receiver that falls behind drops the
/// snapshots it missed and carries on from the oldest one still buffered.
fn snapshot_updates(rx: broadcast::Receiver<String>) -> impl Stream<Item = String> {
    stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(json) => return Some((json, rx)),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "sse client lagged, skipping missed snapshots");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    })
}

fn message(json: String) -> Event {
    Event::default().event("message").data(json)
}

async fn action<S: FeedbackStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(name): Path<String>,
    body: Option<Json<ActionPayload>>,
) -> Json<Snapshot> {
    let payload = body.map(|Json(p)| p).unwrap_or_default();
    let mut page = state.page.lock().await;
    if let Err(e) = page.apply(Action::parse(&name, payload)).await {
        tracing::info!(action = %name, "submission not accepted: {}", e);
    }
    let snapshot = state.publish(&page);
    Json(snapshot)
}

// ── Handlers: JSON API ──────────────────────────────────────────────

async fn create_feedback<S: FeedbackStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    body: Result<Json<FeedbackInput>, JsonRejection>,
) -> Result<(StatusCode, Json<FeedbackEntry>), AppError> {
    let Json(input) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let mut page = state.page.lock().await;
    let entry = page.submit_direct(&input).await?;
    state.publish(&page);
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn latest_feedback<S: FeedbackStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<FeedbackEntry>, AppError> {
    let latest = state.shown.borrow().latest.clone();
    latest
        .map(Json)
        .ok_or_else(|| AppError::NotFound("no feedback yet".into()))
}

// ── Static files ────────────────────────────────────────────────────

async fn static_file<S: FeedbackStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    method: Method,
    uri: Uri,
) -> Response {
    if method != Method::GET {
        return StatusCode::NOT_FOUND.into_response();
    }
    let rel = uri.path().trim_start_matches('/');
    if rel.is_empty() || rel.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
        return StatusCode::NOT_FOUND.into_response();
    }
    match tokio::fs::read(state.public_dir.join(rel)).await {
        Ok(data) => ([(header::CONTENT_TYPE, content_type(rel))], data).into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

fn content_type(path: &str) -> &'static str {
    match path.rsplit_once('.').map(|(_, ext)| ext) {
        Some("js") => "application/javascript",
        Some("css") => "text/css",
        Some("html") => "text/html; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}
