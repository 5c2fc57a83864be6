//! Fire-and-forget feedback recording.
//!
//! The dialogue graph collects free-text feedback plus an email address
//! into the conversation context. Once the engine has replied, pending
//! feedback is taken out of the context (the fields the client gets
//! back are reset to the sentinel) and handed to a [`FeedbackSink`] on
//! a detached task. The reply path never waits on the sink: feedback
//! persistence must not add latency to the user-visible response, which
//! also means sink failures are invisible to the caller. They are
//! logged on the detached task instead.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use crate::context::ConversationState;

/// A captured piece of user feedback, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackEntry {
    pub feedback_text: String,
    pub user_email: String,
    pub recorded_at: DateTime<Utc>,
}

/// Persistence seam for recorded feedback.
///
/// The default implementation only logs. A durable store slots in here
/// without touching the pipeline.
#[async_trait]
pub trait FeedbackSink: Send + Sync {
    async fn record(
        &self,
        entry: FeedbackEntry,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Logging-only sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl FeedbackSink for LogSink {
    async fn record(
        &self,
        entry: FeedbackEntry,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        tracing::info!(
            feedback = %entry.feedback_text,
            email = %entry.user_email,
            recorded_at = %entry.recorded_at,
            "saving user feedback",
        );
        Ok(())
    }
}

/// Consume pending feedback from `state` and dispatch it to the sink.
///
/// The field reset happens synchronously so the context handed back to
/// the client is well-defined; only the recording itself runs on the
/// returned detached task. Callers on the request path drop the handle.
/// Returns `None` when the state held no pending feedback, in which
/// case the state is untouched.
pub fn dispatch_feedback(
    state: &mut ConversationState,
    sink: Arc<dyn FeedbackSink>,
) -> Option<JoinHandle<()>> {
    let (feedback_text, user_email) = state.pending_feedback()?;
    state.clear_feedback();

    let entry = FeedbackEntry {
        feedback_text,
        user_email,
        recorded_at: Utc::now(),
    };

    Some(tokio::spawn(async move {
        if let Err(err) = sink.record(entry).await {
            tracing::warn!("feedback recording failed: {err}");
        }
    }))
}

// ============================================================================
// Tests
// ============================================================================
