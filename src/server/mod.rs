//! HTTP server for the orchestration pipeline.
//!
//! Exposes the tone-aware dialogue gateway to chat clients.
//!
//! # Endpoints
//!
//! - `GET  /health`      — Liveness probe
//! - `POST /api/message` — Run one conversational turn
pub mod routes;

pub use routes::{app_router, AppState};
