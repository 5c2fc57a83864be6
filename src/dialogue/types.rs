//! Wire types for the dialogue engine.
//!
//! The engine is a stateful cloud service: each request carries the
//! workspace identity, the conversation context from the previous turn
//! and the user's input; each response carries the reply text, the
//! matched intents with confidence scores, the dialogue nodes visited
//! and the updated context.
//!
//! Response structs flatten unknown fields into a catch-all map so
//! engine fields this service does not interpret (entities, alternate
//! intents, and whatever future versions add) are echoed to the client
//! unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::context::ConversationState;

/// Free-text input for one turn. Extra fields ride along untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogueInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DialogueInput {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            extra: Map::new(),
        }
    }

    /// Synthetic greeting used when a first-turn request has no input.
    pub fn greeting() -> Self {
        Self::from_text("Hi")
    }
}

/// Request that advances a stateful dialogue by one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueRequest {
    pub workspace_id: String,
    pub context: ConversationState,
    pub input: DialogueInput,
}

/// A classified user goal with the engine's confidence in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub intent: String,
    pub confidence: f64,
}

/// The reply portion of a dialogue response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogueOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes_visited: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One turn's worth of dialogue engine output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogueResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<DialogueOutput>,
    #[serde(default)]
    pub intents: Vec<Intent>,
    #[serde(default)]
    pub context: ConversationState,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parses_engine_reply() {
        let json = r#"{
            "output": {
                "text": "Your order is on its way.",
                "nodes_visited": ["Order Lookup"],
                "log_messages": []
            },
            "intents": [{"intent": "order_status", "confidence": 0.93}],
            "entities": [{"entity": "order", "value": "1234"}],
            "context": {"clientType": "web", "system": {"dialog_turn_counter": 2}}
        }"#;

        let response: DialogueResponse = serde_json::from_str(json).unwrap();

        let output = response.output.as_ref().unwrap();
        assert_eq!(output.text.as_deref(), Some("Your order is on its way."));
        assert_eq!(output.nodes_visited, vec!["Order Lookup"]);
        assert_eq!(output.extra["log_messages"], serde_json::json!([]));

        assert_eq!(response.intents[0].intent, "order_status");
        assert_eq!(response.context.0["clientType"], "web");
        assert_eq!(
            response.extra["entities"],
            serde_json::json!([{"entity": "order", "value": "1234"}])
        );
    }

    #[test]
    fn test_response_without_output_or_intents() {
        let response: DialogueResponse = serde_json::from_str(r#"{"context": {}}"#).unwrap();
        assert!(response.output.is_none());
        assert!(response.intents.is_empty());
    }

    #[test]
    fn test_unknown_fields_survive_serialization() {
        let json: Value = serde_json::from_str(
            r#"{
                "output": {"text": "hello", "nodes_visited": ["Greeting"], "custom": 7},
                "intents": [],
                "context": {"k": "v"},
                "alternate_intents": false
            }"#,
        )
        .unwrap();

        let response: DialogueResponse = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(serde_json::to_value(&response).unwrap(), json);
    }

    #[test]
    fn test_request_body_shape() {
        let request = DialogueRequest {
            workspace_id: "ws-1".to_string(),
            context: ConversationState::seeded(),
            input: DialogueInput::from_text("hello"),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["workspace_id"], "ws-1");
        assert_eq!(json["input"]["text"], "hello");
        assert_eq!(json["context"]["dominantTone"]["score"], 0.0);
    }

    #[test]
    fn test_empty_output_serializes_as_empty_object() {
        let output = DialogueOutput::default();
        assert_eq!(serde_json::to_value(&output).unwrap(), serde_json::json!({}));
    }
}
