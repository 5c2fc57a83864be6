//! Turn orchestration.
//!
//! One conversational turn runs through the stages below, in order:
//!
//! 1. Configuration gate — missing dialogue settings short-circuit to
//!    an advisory reply, with no external calls.
//! 2. Seed — an absent `input` becomes a synthetic greeting with a
//!    fresh zero-tone context; an `input` without text ends the turn.
//! 3. Tone — classify the utterance and write the dominant tone into
//!    the context. Best effort: a failure (or absent tone credentials)
//!    degrades to no enrichment rather than failing the turn.
//! 4. Dialogue — advance the engine with the merged context. Never
//!    starts before the tone stage has fully resolved.
//! 5. Feedback — pending feedback in the returned context is consumed
//!    and recorded on a detached task the reply never waits on.
//! 6. Moderation — gate the reply text on the top intent's confidence.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::{Config, MissingConfig};
use crate::context::ConversationState;
use crate::dialogue::{
    DialogueClient, DialogueError, DialogueInput, DialogueRequest, DialogueResponse,
    DialogueService,
};
use crate::feedback::{dispatch_feedback, FeedbackSink, LogSink};
use crate::moderation::moderate;
use crate::tone::{select_dominant, ToneClient, ToneService};

/// Inbound body of one conversational turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<DialogueInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ConversationState>,
}

/// Result of running one turn.
#[derive(Debug)]
pub enum TurnOutcome {
    /// Moderated dialogue reply, ready to serialize back to the client.
    Reply(DialogueResponse),
    /// Required configuration is missing; advisory text for the client.
    Advisory(String),
    /// Input was present but carried no text; nothing to do this turn.
    NoOp,
    /// The dialogue engine call failed.
    DialogueFailed(DialogueError),
}

/// The per-turn orchestrator, wired once at startup.
pub struct Pipeline {
    inner: PipelineInner,
}

enum PipelineInner {
    /// Dialogue settings were missing at startup; every turn answers
    /// with the advisory until the environment is fixed.
    Unconfigured(MissingConfig),
    Ready(Ready),
}

struct Ready {
    workspace_id: String,
    confidence_threshold: f64,
    tone: Option<Arc<dyn ToneService>>,
    dialogue: Arc<dyn DialogueService>,
    sink: Arc<dyn FeedbackSink>,
}

impl Pipeline {
    /// Wire production clients from configuration.
    pub fn from_config(config: &Config) -> Self {
        let access = match config.dialogue_access() {
            Err(missing) => {
                tracing::warn!("{missing}; the service will answer with an advisory");
                return Self::unconfigured(missing);
            }
            Ok(access) => access,
        };

        let dialogue: Arc<dyn DialogueService> = Arc::new(DialogueClient::new(
            config.conversation_url.clone(),
            access.credentials,
        ));
        let tone: Option<Arc<dyn ToneService>> =
            config.tone_credentials.clone().map(|credentials| {
                Arc::new(ToneClient::new(config.tone_url.clone(), credentials))
                    as Arc<dyn ToneService>
            });
        if tone.is_none() {
            tracing::info!("tone credentials not configured; tone enrichment disabled");
        }

        Self::with_services(
            access.workspace_id,
            config.confidence_threshold,
            tone,
            dialogue,
            Arc::new(LogSink),
        )
    }

    /// A pipeline that answers every turn with the advisory for
    /// `missing`.
    pub fn unconfigured(missing: MissingConfig) -> Self {
        Self {
            inner: PipelineInner::Unconfigured(missing),
        }
    }

    /// Wire explicit service implementations. This is the seam tests
    /// and embedders use.
    pub fn with_services(
        workspace_id: impl Into<String>,
        confidence_threshold: f64,
        tone: Option<Arc<dyn ToneService>>,
        dialogue: Arc<dyn DialogueService>,
        sink: Arc<dyn FeedbackSink>,
    ) -> Self {
        Self {
            inner: PipelineInner::Ready(Ready {
                workspace_id: workspace_id.into(),
                confidence_threshold,
                tone,
                dialogue,
                sink,
            }),
        }
    }

    /// Run one conversational turn.
    pub async fn run_turn(&self, request: MessageRequest) -> TurnOutcome {
        let ready = match &self.inner {
            PipelineInner::Unconfigured(missing) => {
                return TurnOutcome::Advisory(missing.advisory());
            }
            PipelineInner::Ready(ready) => ready,
        };

        // Seed the first turn. No input means the client just opened the
        // conversation: greet on its behalf and start from a zero-tone
        // context. Any caller-supplied context is discarded on this path,
        // which the stock client relies on for a clean restart.
        let (input, mut context) = match request.input {
            None => {
                tracing::debug!("request has no input; seeding greeting turn");
                (DialogueInput::greeting(), ConversationState::seeded())
            }
            Some(input) => (input, request.context.unwrap_or_default()),
        };

        let Some(utterance) = input.text.clone() else {
            // Input present but without text: nothing to classify or
            // advance, so the turn ends here.
            return TurnOutcome::NoOp;
        };

        match &ready.tone {
            Some(tone) => match tone.classify(&utterance).await {
                Ok(tones) => {
                    let dominant = select_dominant(&tones);
                    tracing::debug!(
                        score = dominant.score,
                        tone = dominant.tone_id.as_deref().unwrap_or(""),
                        "dominant tone selected",
                    );
                    context.set_dominant_tone(&dominant);
                }
                Err(err) => {
                    tracing::warn!("tone classification failed, continuing without it: {err}");
                }
            },
            None => {
                tracing::debug!("tone service not configured; skipping enrichment");
            }
        }

        let dialogue_request = DialogueRequest {
            workspace_id: ready.workspace_id.clone(),
            context,
            input,
        };

        let mut response = match ready.dialogue.advance(&dialogue_request).await {
            Ok(response) => response,
            Err(err) => return TurnOutcome::DialogueFailed(err),
        };

        // Recording must never delay the reply; the task runs on its own.
        dispatch_feedback(&mut response.context, Arc::clone(&ready.sink));

        TurnOutcome::Reply(moderate(response, ready.confidence_threshold))
    }
}

// ============================================================================
// Tests
// ============================================================================
