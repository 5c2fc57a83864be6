//! Tone classifier client.
//!
//! Wraps the remote service that scores a single utterance across a
//! fixed set of emotional categories. The service speaks a chat-tone
//! wire contract:
//!
//! - Request:  `{"utterances": [{"text": "...", "user": "customer"}]}`
//! - Response: `{"utterances_tone": [{"tones": [{score, tone_id, tone_name}, ...]}]}`
//!
//! One call per conversational turn, issued before the dialogue engine
//! is advanced. Failures here are surfaced as [`ToneError`] and the
//! caller decides whether to degrade; the client itself never retries.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Credentials;

/// API version date pinned for the tone service.
pub const TONE_VERSION_DATE: &str = "2016-05-19";

/// Default public endpoint for the tone service.
pub const DEFAULT_TONE_URL: &str = "https://gateway.watsonplatform.net/tone-analyzer/api";

/// Per-call timeout applied to the underlying HTTP client.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A single scored tone category, in wire order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneScore {
    pub score: f64,
    pub tone_id: String,
    pub tone_name: String,
}

/// Error from a tone classification call.
#[derive(Debug, Error)]
pub enum ToneError {
    #[error("tone service transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("tone service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed tone response: {0}")]
    Malformed(String),
}

/// Remote tone classification seam.
#[async_trait]
pub trait ToneService: Send + Sync {
    /// Score one utterance; returns the ordered tone categories.
    async fn classify(&self, text: &str) -> Result<Vec<ToneScore>, ToneError>;
}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ToneChatRequest<'a> {
    utterances: Vec<UtterancePayload<'a>>,
}

#[derive(Debug, Serialize)]
struct UtterancePayload<'a> {
    text: &'a str,
    user: &'static str,
}

impl<'a> ToneChatRequest<'a> {
    /// Single-utterance request, always spoken as the customer.
    fn for_utterance(text: &'a str) -> Self {
        Self {
            utterances: vec![UtterancePayload {
                text,
                user: "customer",
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct ToneChatResponse {
    utterances_tone: Vec<UtteranceTone>,
}

#[derive(Debug, Deserialize)]
struct UtteranceTone {
    tones: Vec<ToneScore>,
}

// ---------------------------------------------------------------------------
// ToneClient
// ---------------------------------------------------------------------------

/// HTTP client for the tone service.
#[derive(Debug, Clone)]
pub struct ToneClient {
    base_url: String,
    credentials: Credentials,
    timeout: Duration,
}

impl ToneClient {
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
impl ToneService for ToneClient {
    async fn classify(&self, text: &str) -> Result<Vec<ToneScore>, ToneError> {
        log::debug!("ToneClient.classify: {} chars", text.len());

        let body = ToneChatRequest::for_utterance(text);
        let endpoint = format!("{}/v3/tone_chat", self.base_url);

        let client = reqwest::Client::builder().timeout(self.timeout).build()?;

        let response = client
            .post(&endpoint)
            .query(&[("version", TONE_VERSION_DATE)])
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToneError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ToneChatResponse = response.json().await?;
        let first = parsed
            .utterances_tone
            .into_iter()
            .next()
            .ok_or_else(|| ToneError::Malformed("empty utterances_tone array".to_string()))?;

        Ok(first.tones)
    }
}

// ============================================================================
// Tests
// ============================================================================
