//! HTTP surface: webhook intake plus introspection endpoints.
//!
//! The server never evaluates anything inline. A valid `patchset-created`
//! notification is validated, enqueued, and acknowledged with 202; the
//! background processor does the rest. Ignored event types are acknowledged
//! with 200 so the sender does not retry them.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::config::{Criterion, Settings};
use crate::error::GavelError;
use crate::host::events::PATCHSET_CREATED;
use crate::host::{EventChange, EventOwner, GerritEvent, PatchsetRef};
use crate::pipeline::{ProcessorState, ReviewQueue, ReviewTask};

/// Shared state handed to every request handler
pub struct AppState {
    pub queue: ReviewQueue,
    pub settings: Settings,
    pub processor_state: watch::Receiver<ProcessorState>,
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/config", get(config))
        .route("/webhook", post(webhook))
        .route("/manual-review", post(manual_review))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn timestamp() -> String {
    Utc::now().to_rfc3339()
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let processor = *state.processor_state.borrow();
    Json(json!({
        "status": if processor == ProcessorState::Stopped { "unhealthy" } else { "healthy" },
        "services": {
            "change_host": "ok",
            "ai_reviewer": "ok",
            "processor": processor,
        },
        "queue_size": state.queue.depth(),
        "timestamp": timestamp(),
    }))
}

async fn status(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "system_status": "running",
        "queue_size": state.queue.depth(),
        "queue_capacity": state.queue.capacity(),
        "processor_state": *state.processor_state.borrow(),
        "configuration": {
            "gerrit_host": state.settings.gerrit.host,
            "ai_model": state.settings.ai.model,
            "auto_post_review": state.settings.review.auto_post_review,
            "min_review_score": state.settings.review.min_review_score,
        },
        "review_criteria_count": Criterion::ALL.len(),
        "timestamp": timestamp(),
    }))
}

async fn config(State(state): State<Arc<AppState>>) -> Json<Value> {
    let weights = state.settings.scoring_weights();
    let criteria: Vec<Value> = Criterion::ALL
        .iter()
        .map(|c| {
            json!({
                "key": c.key(),
                "label": c.label(),
                "description": c.description(),
                "weight": weights.weight_of(*c),
            })
        })
        .collect();

    // Credentials and API keys never leave the process
    Json(json!({
        "review_criteria": criteria,
        "settings": {
            "ai_model": state.settings.ai.model,
            "ai_temperature": state.settings.ai.temperature,
            "auto_post_review": state.settings.review.auto_post_review,
            "min_review_score": state.settings.review.min_review_score,
            "server_host": state.settings.server.host,
            "server_port": state.settings.server.port,
            "review_dir": state.settings.storage.review_dir,
        },
        "timestamp": timestamp(),
    }))
}

async fn webhook(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let event = match GerritEvent::parse(&payload) {
        Ok(event) => event,
        Err(e) => {
            warn!("rejected webhook payload: {e}");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": e.to_string(), "timestamp": timestamp()})),
            );
        }
    };

    if !event.is_review_trigger() {
        info!(event_type = %event.event_type, "ignoring event");
        return (
            StatusCode::OK,
            Json(json!({"message": "Event ignored", "event_type": event.event_type})),
        );
    }

    let change_id = event.change.id.clone();
    let event_type = event.event_type.clone();
    enqueue_response(&state, ReviewTask::new(event), &change_id, &event_type)
}

/// Manual trigger body; only `change_id` is mandatory
#[derive(Debug, Deserialize)]
struct ManualReviewRequest {
    change_id: String,
    #[serde(default = "default_revision")]
    revision_id: String,
    #[serde(default)]
    change_number: u64,
    #[serde(default)]
    project: String,
    #[serde(default = "default_branch")]
    branch: String,
    #[serde(default = "default_subject")]
    subject: String,
    #[serde(default = "default_owner_name")]
    owner_name: String,
    #[serde(default = "default_owner_email")]
    owner_email: String,
}

fn default_revision() -> String {
    "current".to_string()
}
fn default_branch() -> String {
    "main".to_string()
}
fn default_subject() -> String {
    "Manual review".to_string()
}
fn default_owner_name() -> String {
    "Manual".to_string()
}
fn default_owner_email() -> String {
    "manual@example.com".to_string()
}

async fn manual_review(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ManualReviewRequest>,
) -> (StatusCode, Json<Value>) {
    info!(
        change = %request.change_id,
        revision = %request.revision_id,
        "manual review requested"
    );

    let event = GerritEvent {
        event_type: PATCHSET_CREATED.to_string(),
        change: EventChange {
            id: request.change_id.clone(),
            number: request.change_number,
            project: request.project,
            branch: request.branch,
            subject: request.subject,
            owner: EventOwner {
                name: request.owner_name,
                email: request.owner_email,
            },
        },
        patch_set: PatchsetRef {
            revision: request.revision_id,
        },
    };

    enqueue_response(
        &state,
        ReviewTask::new(event),
        &request.change_id,
        PATCHSET_CREATED,
    )
}

fn enqueue_response(
    state: &AppState,
    task: ReviewTask,
    change_id: &str,
    event_type: &str,
) -> (StatusCode, Json<Value>) {
    match state.queue.enqueue(task) {
        Ok(depth) => {
            info!(change = %change_id, depth, "queued for review");
            (
                StatusCode::ACCEPTED,
                Json(json!({
                    "message": "Queued for processing",
                    "change_id": change_id,
                    "event_type": event_type,
                    "queue_size": depth,
                    "timestamp": timestamp(),
                })),
            )
        }
        Err(GavelError::QueueFull { capacity }) => {
            warn!(capacity, "review queue is full");
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({"error": "Review queue is full, try again later"})),
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": e.to_string()})),
        ),
    }
}
