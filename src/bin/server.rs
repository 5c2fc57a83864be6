//! tonebridge HTTP server binary.
//!
//! Starts an axum HTTP server that bridges chat clients to the
//! dialogue and tone cloud services.
//!
//! # Environment Variables
//!
//! - `PORT` — HTTP port (default: 8080)
//! - `WORKSPACE_ID`, `CONVERSATION_USERNAME`, `CONVERSATION_PASSWORD`
//!   — dialogue service access (required for replies; without them
//!   every turn answers with a configuration advisory)
//! - `TONE_ANALYZER_USERNAME`, `TONE_ANALYZER_PASSWORD` — tone service
//!   access (optional; without them tone enrichment is skipped)
//! - `CONFIDENCE_THRESHOLD` — moderation cutoff (default: 0.5)
//! - `RUST_LOG` — Tracing filter (default: "info")
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin server
//! ```

use tonebridge::config::Config;
use tonebridge::server::{app_router, AppState};

#[tokio::main]
async fn main() {
    // Local deployments keep credentials in a .env file.
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tonebridge=debug".into()),
        )
        .init();

    let config = Config::from_env();
    let bind_addr = format!("0.0.0.0:{}", config.port);

    let state = AppState::from_config(&config);
    let app = app_router(state);

    tracing::info!("tonebridge server starting on {}", bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health       — liveness probe");
    tracing::info!("  POST /api/message  — conversational turn");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app).await.expect("Server failed");
}
