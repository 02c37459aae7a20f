//! HTTP and WebSocket surface for the dashboard.
//!
//! Routes:
//! - `PUT  /api/tasks/{task_id}/records` - ingest a fetched record batch
//! - `GET  /api/tasks/{task_id}/timeline` - correlated turns + live buffers
//! - `DELETE /api/tasks/{task_id}` - forget a task's records and stage buffers
//! - `DELETE /api/tasks/{task_id}/stage-logs` - tear down a task's stage view
//! - `POST /api/streams/{log_id}/subscribe|unsubscribe|clear|status`
//! - `GET  /api/streams/{log_id}` - stream buffer snapshot
//! - `GET  /api/stages/{stage_id}/log` - stage ring buffer
//! - `GET  /ws` - inbound live channel (chunk and stage-record messages)

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::CorsLayer;

use lens_protocol::{EventRecord, LiveEnvelope, LivePayload, RunStatus};
use lens_state::StreamSnapshot;
use lens_timeline::correlate;

use crate::config::ConnectorConfig;
use crate::limiter::RateLimiter;
use crate::state::ConnectorState;
use crate::view::{render_turns, TurnView};

/// Handler state: the store lock plus the ingest flood guard.
#[derive(Clone)]
pub struct AppState {
    pub state: Arc<RwLock<ConnectorState>>,
    pub limiter: Arc<Mutex<RateLimiter>>,
}

impl AppState {
    pub fn new(config: &ConnectorConfig) -> Self {
        Self {
            state: Arc::new(RwLock::new(ConnectorState::new())),
            limiter: Arc::new(Mutex::new(RateLimiter::new(
                config.rate_limit_burst,
                config.rate_limit_per_sec,
            ))),
        }
    }
}

pub fn router(app: AppState) -> Router {
    Router::new()
        .route("/api/tasks/:task_id", delete(drop_task))
        .route("/api/tasks/:task_id/records", put(put_records))
        .route("/api/tasks/:task_id/timeline", get(get_timeline))
        .route("/api/tasks/:task_id/stage-logs", delete(delete_stage_logs))
        .route("/api/streams/:log_id", get(get_stream))
        .route("/api/streams/:log_id/subscribe", post(subscribe_stream))
        .route("/api/streams/:log_id/unsubscribe", post(unsubscribe_stream))
        .route("/api/streams/:log_id/clear", post(clear_stream))
        .route("/api/streams/:log_id/status", post(set_stream_status))
        .route("/api/stages/:stage_id/log", get(get_stage_log))
        .route("/ws", get(ws_upgrade))
        .layer(CorsLayer::permissive())
        .with_state(app)
}

async fn put_records(
    State(app): State<AppState>,
    Path(task_id): Path<String>,
    Json(batch): Json<Vec<EventRecord>>,
) -> impl IntoResponse {
    if !app.limiter.lock().await.allow(&task_id) {
        return StatusCode::TOO_MANY_REQUESTS.into_response();
    }
    let fresh = app.state.write().await.merge_records(&task_id, batch);
    tracing::debug!(task_id = %task_id, fresh, "record batch merged");
    Json(serde_json::json!({ "fresh": fresh })).into_response()
}

async fn get_timeline(
    State(app): State<AppState>,
    Path(task_id): Path<String>,
) -> Json<Vec<TurnView>> {
    let state = app.state.read().await;
    let records = state.task_records(&task_id);
    let turns = correlate(&records);
    Json(render_turns(&turns, &state.streams))
}

async fn drop_task(State(app): State<AppState>, Path(task_id): Path<String>) -> StatusCode {
    app.state.write().await.drop_task(&task_id);
    StatusCode::NO_CONTENT
}

async fn delete_stage_logs(
    State(app): State<AppState>,
    Path(task_id): Path<String>,
) -> StatusCode {
    app.state.write().await.stage_logs.clear_task(&task_id);
    StatusCode::NO_CONTENT
}

async fn get_stream(
    State(app): State<AppState>,
    Path(log_id): Path<String>,
) -> Result<Json<StreamSnapshot>, StatusCode> {
    app.state
        .read()
        .await
        .streams
        .snapshot(&log_id)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn subscribe_stream(
    State(app): State<AppState>,
    Path(log_id): Path<String>,
) -> Result<Json<StreamSnapshot>, StatusCode> {
    let mut state = app.state.write().await;
    state.streams.subscribe(&log_id, Utc::now());
    // Subscribe just created the buffer if it was absent.
    state
        .streams
        .snapshot(&log_id)
        .map(Json)
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)
}

async fn unsubscribe_stream(
    State(app): State<AppState>,
    Path(log_id): Path<String>,
) -> StatusCode {
    app.state.write().await.streams.unsubscribe(&log_id);
    StatusCode::NO_CONTENT
}

async fn clear_stream(State(app): State<AppState>, Path(log_id): Path<String>) -> StatusCode {
    app.state.write().await.streams.clear(&log_id);
    StatusCode::NO_CONTENT
}

#[derive(Debug, serde::Deserialize)]
struct StatusBody {
    status: RunStatus,
}

async fn set_stream_status(
    State(app): State<AppState>,
    Path(log_id): Path<String>,
    Json(body): Json<StatusBody>,
) -> StatusCode {
    app.state.write().await.streams.set_status(&log_id, body.status);
    StatusCode::NO_CONTENT
}

async fn get_stage_log(
    State(app): State<AppState>,
    Path(stage_id): Path<String>,
) -> Json<Vec<EventRecord>> {
    Json(app.state.read().await.stage_logs.records(&stage_id))
}

async fn ws_upgrade(State(app): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_live_channel(socket, app))
}

/// Drain one live-channel connection, applying each frame to the stores.
/// Malformed frames are logged and skipped; the channel itself never fails
/// the connection.
async fn handle_live_channel(mut socket: WebSocket, app: AppState) {
    while let Some(Ok(message)) = socket.recv().await {
        let Message::Text(raw) = message else {
            continue;
        };
        match LiveEnvelope::from_json(&raw) {
            Ok(envelope) => apply_live_message(&app.state, envelope).await,
            Err(error) => {
                tracing::warn!(error = %error, "discarding malformed live message");
            }
        }
    }
    tracing::debug!("live channel closed");
}

/// Apply one decoded live-channel message to the stores.
pub async fn apply_live_message(state: &Arc<RwLock<ConnectorState>>, envelope: LiveEnvelope) {
    let mut guard = state.write().await;
    match envelope.payload {
        LivePayload::StreamChunk(chunk) => {
            guard.streams.append(&chunk, envelope.timestamp);
        }
        LivePayload::StageRecord(record) => match record.stage_id.clone() {
            Some(stage_id) => guard.stage_logs.append(&stage_id, record),
            None => {
                tracing::trace!(id = %record.id, "stage record without stage id dropped");
            }
        },
    }
}
