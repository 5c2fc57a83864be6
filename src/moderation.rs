//! Confidence-gated response moderation.
//!
//! The dialogue engine always assigns an intent to the input, however
//! unsure it is. A low top-intent confidence means the reply is a
//! guess, so instead of presenting it as authoritative the reply text
//! is replaced with a clarification prompt asking the user to rephrase.
//!
//! Two kinds of dialogue nodes are exempt and pass through at face
//! value regardless of confidence: the negative-emotion branch and the
//! feedback-capture branch, where the scripted reply matters more than
//! the intent match.

use crate::dialogue::{DialogueOutput, DialogueResponse};

/// Confidence cutoff used when none is configured.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Dialogue nodes whose replies are trusted at face value.
pub const CONFIDENCE_EXEMPT_NODES: &[&str] = &[
    "Negative Emotion",
    "Capture User Feedback and ask for email address",
];

/// Clarification shown in place of a low-confidence reply.
fn clarification(intent: &str, confidence: f64) -> String {
    format!(
        "I think your intent was {intent} but my confidence is low at {confidence}. \
         I'm still learning so please be patient with me. \
         Can you please rephrase and ask me again."
    )
}

/// Inspect a dialogue reply and either pass it through or substitute a
/// clarification message.
///
/// Checks run in order:
/// 1. A missing `output` is replaced with an empty one and returned as
///    is; there is no text to gate.
/// 2. If the first visited node is exempt, the reply passes unmodified.
/// 3. If the top intent's confidence is at or below `threshold`, the
///    reply text is overwritten (not appended to) with the
///    clarification prompt.
/// 4. Otherwise the reply passes unmodified.
pub fn moderate(mut response: DialogueResponse, threshold: f64) -> DialogueResponse {
    if response.output.is_none() {
        response.output = Some(DialogueOutput::default());
        return response;
    }

    let exempt = response
        .output
        .as_ref()
        .and_then(|output| output.nodes_visited.first())
        .is_some_and(|node| CONFIDENCE_EXEMPT_NODES.contains(&node.as_str()));
    if exempt {
        return response;
    }

    if let Some(top_intent) = response.intents.first() {
        if top_intent.confidence <= threshold {
            if let Some(output) = response.output.as_mut() {
                output.text = Some(clarification(&top_intent.intent, top_intent.confidence));
            }
        }
    }

    response
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use serde_json::Map;

    use super::*;
    use crate::context::ConversationState;
    use crate::dialogue::Intent;

    fn reply(text: &str, node: &str, intent: &str, confidence: f64) -> DialogueResponse {
        DialogueResponse {
            output: Some(DialogueOutput {
                text: Some(text.to_string()),
                nodes_visited: vec![node.to_string()],
                extra: Map::new(),
            }),
            intents: vec![Intent {
                intent: intent.to_string(),
                confidence,
            }],
            context: ConversationState::new(),
            extra: Map::new(),
        }
    }

    #[test]
    fn test_low_confidence_replaces_text_with_clarification() {
        let moderated = moderate(
            reply("Order 1234 shipped.", "Order Lookup", "order_status", 0.4),
            0.5,
        );

        let text = moderated.output.unwrap().text.unwrap();
        assert_eq!(
            text,
            "I think your intent was order_status but my confidence is low at 0.4. \
             I'm still learning so please be patient with me. \
             Can you please rephrase and ask me again."
        );
    }

    #[test]
    fn test_confidence_equal_to_threshold_is_replaced() {
        let moderated = moderate(reply("sure", "Order Lookup", "order_status", 0.5), 0.5);
        let text = moderated.output.unwrap().text.unwrap();
        assert!(text.starts_with("I think your intent was order_status"));
    }

    #[test]
    fn test_high_confidence_passes_through() {
        let original = reply("Order 1234 shipped.", "Order Lookup", "order_status", 0.93);
        let moderated = moderate(original.clone(), 0.5);
        assert_eq!(moderated, original);
    }

    #[test]
    fn test_exempt_node_passes_through_regardless_of_confidence() {
        let original = reply("I hear you're frustrated.", "Negative Emotion", "chitchat", 0.1);
        let moderated = moderate(original.clone(), 0.5);
        assert_eq!(moderated, original);

        let original = reply(
            "Thanks! What's your email?",
            "Capture User Feedback and ask for email address",
            "feedback",
            0.05,
        );
        let moderated = moderate(original.clone(), 0.5);
        assert_eq!(moderated, original);
    }

    #[test]
    fn test_exemption_checks_first_node_only() {
        let mut response = reply("guess", "Order Lookup", "order_status", 0.1);
        if let Some(output) = response.output.as_mut() {
            output
                .nodes_visited
                .push("Negative Emotion".to_string());
        }

        let moderated = moderate(response, 0.5);
        let text = moderated.output.unwrap().text.unwrap();
        assert!(text.starts_with("I think your intent was"));
    }

    #[test]
    fn test_missing_output_becomes_empty_object() {
        let response = DialogueResponse {
            output: None,
            intents: vec![Intent {
                intent: "order_status".to_string(),
                confidence: 0.1,
            }],
            ..DialogueResponse::default()
        };

        let moderated = moderate(response, 0.5);
        let output = moderated.output.unwrap();
        assert!(output.text.is_none());
        assert!(output.nodes_visited.is_empty());
    }

    #[test]
    fn test_no_intents_passes_through() {
        let mut original = reply("hello", "Greeting", "x", 0.0);
        original.intents.clear();

        let moderated = moderate(original.clone(), 0.5);
        assert_eq!(moderated, original);
    }

    #[test]
    fn test_only_top_intent_is_inspected() {
        let mut response = reply("hello", "Greeting", "greeting", 0.9);
        response.intents.push(Intent {
            intent: "order_status".to_string(),
            confidence: 0.1,
        });

        let moderated = moderate(response.clone(), 0.5);
        assert_eq!(moderated, response);
    }

    #[test]
    fn test_moderation_is_idempotent() {
        let once = moderate(
            reply("Order 1234 shipped.", "Order Lookup", "order_status", 0.4),
            0.5,
        );
        let twice = moderate(once.clone(), 0.5);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_moderation_preserves_unknown_fields() {
        let mut response = reply("guess", "Order Lookup", "order_status", 0.2);
        response
            .extra
            .insert("alternate_intents".to_string(), serde_json::json!(true));
        if let Some(output) = response.output.as_mut() {
            output
                .extra
                .insert("log_messages".to_string(), serde_json::json!([]));
        }

        let moderated = moderate(response, 0.5);
        assert_eq!(moderated.extra["alternate_intents"], true);
        assert_eq!(
            moderated.output.unwrap().extra["log_messages"],
            serde_json::json!([])
        );
    }
}
