//! Caller-owned conversation state.
//!
//! The state blob is created by the chat client on its first turn (or
//! seeded here when absent), mutated once per turn, and handed back to
//! the client to persist and resubmit. Nothing is stored server-side.
//!
//! The service owns exactly three keys: `dominantTone`, `feedbackText`
//! and `userEmail`. Everything else (the dialogue engine's own system
//! fields, `clientType`, whatever the client stashes) must round-trip
//! untouched, which is why this is a transparent wrapper over a JSON
//! map rather than a typed struct.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::tone::DominantTone;

/// Context key: dominant tone of the latest utterance.
pub const KEY_DOMINANT_TONE: &str = "dominantTone";
/// Context key: pending user feedback text.
pub const KEY_FEEDBACK_TEXT: &str = "feedbackText";
/// Context key: email address supplied with the feedback.
pub const KEY_USER_EMAIL: &str = "userEmail";

/// Sentinel marking a feedback field as empty or already consumed.
pub const FEEDBACK_SENTINEL: &str = "none";

/// Opaque, caller-owned conversation state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationState(pub Map<String, Value>);

impl ConversationState {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Fresh first-turn state: a zeroed `dominantTone` and nothing else.
    ///
    /// The zeroed record uses empty-string ids, distinct from the
    /// null-id default a toneless utterance produces later.
    pub fn seeded() -> Self {
        let mut state = Self::new();
        state.0.insert(
            KEY_DOMINANT_TONE.to_string(),
            serde_json::json!({
                "score": 0.0,
                "tone_id": "",
                "tone_name": "",
            }),
        );
        state
    }

    /// Overwrite the dominant tone with the one computed for this turn.
    pub fn set_dominant_tone(&mut self, tone: &DominantTone) {
        self.0.insert(
            KEY_DOMINANT_TONE.to_string(),
            serde_json::json!({
                "score": tone.score,
                "tone_id": tone.tone_id,
                "tone_name": tone.tone_name,
            }),
        );
    }

    pub fn dominant_tone(&self) -> Option<&Value> {
        self.0.get(KEY_DOMINANT_TONE)
    }

    /// Pending user feedback, if both fields are set past the sentinel.
    pub fn pending_feedback(&self) -> Option<(String, String)> {
        let feedback = self.feedback_field(KEY_FEEDBACK_TEXT)?;
        let email = self.feedback_field(KEY_USER_EMAIL)?;
        Some((feedback.to_string(), email.to_string()))
    }

    /// Reset both feedback fields to the sentinel so the client does
    /// not resubmit consumed feedback on its next turn.
    pub fn clear_feedback(&mut self) {
        self.0.insert(
            KEY_FEEDBACK_TEXT.to_string(),
            Value::String(FEEDBACK_SENTINEL.to_string()),
        );
        self.0.insert(
            KEY_USER_EMAIL.to_string(),
            Value::String(FEEDBACK_SENTINEL.to_string()),
        );
    }

    fn feedback_field(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|value| *value != FEEDBACK_SENTINEL)
    }
}

// ============================================================================
// Tests
// ============================================================================
