//! Dialogue engine client.
//!
//! Advances a stateful remote dialogue given workspace identity, the
//! merged conversation context and the user's input. Must only be
//! called after the tone stage has fully resolved, since the context it
//! sends is expected to carry the freshly computed dominant tone.
//!
//! Engine failures carry the service's HTTP status and raw error body;
//! the server layer propagates both to the client verbatim. No retries.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::config::Credentials;

use super::types::{DialogueRequest, DialogueResponse};

/// API version date pinned for the dialogue service.
pub const DIALOGUE_VERSION_DATE: &str = "2017-04-21";

/// Default public endpoint for the dialogue service.
pub const DEFAULT_DIALOGUE_URL: &str = "https://gateway.watsonplatform.net/conversation/api";

/// Per-call timeout applied to the underlying HTTP client.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Error from a dialogue advance call.
#[derive(Debug, Error)]
pub enum DialogueError {
    #[error("dialogue service transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("dialogue service returned status {status}")]
    Service { status: u16, body: Value },
}

impl DialogueError {
    /// HTTP status reported by the service, if it got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => Some(*status),
            Self::Transport(_) => None,
        }
    }

    /// JSON body to hand back to the chat client.
    pub fn into_body(self) -> Value {
        match self {
            Self::Service { body, .. } => body,
            Self::Transport(err) => serde_json::json!({"error": err.to_string()}),
        }
    }
}

/// Remote dialogue engine seam.
#[async_trait]
pub trait DialogueService: Send + Sync {
    /// Advance the dialogue by one turn.
    async fn advance(&self, request: &DialogueRequest) -> Result<DialogueResponse, DialogueError>;
}

/// HTTP client for the dialogue service.
#[derive(Debug, Clone)]
pub struct DialogueClient {
    base_url: String,
    credentials: Credentials,
    timeout: Duration,
}

impl DialogueClient {
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl DialogueService for DialogueClient {
    async fn advance(&self, request: &DialogueRequest) -> Result<DialogueResponse, DialogueError> {
        log::debug!(
            "DialogueClient.advance: workspace={}, context keys={}",
            request.workspace_id,
            request.context.0.len(),
        );

        let endpoint = format!(
            "{}/v1/workspaces/{}/message",
            self.base_url, request.workspace_id
        );

        let client = reqwest::Client::builder().timeout(self.timeout).build()?;

        let response = client
            .post(&endpoint)
            .query(&[("version", DIALOGUE_VERSION_DATE)])
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body = serde_json::from_str(&text)
                .unwrap_or_else(|_| serde_json::json!({"error": text}));
            return Err(DialogueError::Service {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

// ============================================================================
// Tests
// ============================================================================
