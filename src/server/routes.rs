//! Axum route handlers for the tonebridge HTTP server.
//!
//! # Routes
//!
//! - `GET  /health`      — Returns `{"status": "ok", "version": ...}`
//! - `POST /api/message` — Accepts `{input?, context?}`, runs one turn
//!
//! `/api/message` always answers 200 for designed outcomes (reply,
//! configuration advisory, textless no-op); only dialogue engine
//! failures surface an error status, which mirrors the engine's own.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::pipeline::{MessageRequest, Pipeline, TurnOutcome};

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// The per-turn orchestrator.
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    /// Wire production clients from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::with_pipeline(Pipeline::from_config(config))
    }

    pub fn with_pipeline(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/message", post(message_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET /health — liveness probe.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "service": "tonebridge",
    }))
}

/// POST /api/message — run one conversational turn.
///
/// Request:  `{ "input": {"text": ...}?, "context": {...}? }`
/// Response: the moderated dialogue reply, or `{output:{text}}` with an
/// advisory when configuration is missing, or `{}` when the input
/// carried no text, or the dialogue engine's error body with its status.
async fn message_handler(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match state.pipeline.run_turn(request).await {
        TurnOutcome::Reply(reply) => {
            let body = serde_json::to_value(&reply).map_err(|err| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({
                        "error": format!("failed to encode reply: {err}"),
                    })),
                )
            })?;
            Ok(Json(body))
        }
        TurnOutcome::Advisory(text) => Ok(Json(serde_json::json!({
            "output": { "text": text },
        }))),
        TurnOutcome::NoOp => Ok(Json(serde_json::json!({}))),
        TurnOutcome::DialogueFailed(err) => {
            let status = err
                .status()
                .and_then(|code| StatusCode::from_u16(code).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            Err((status, Json(err.into_body())))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
