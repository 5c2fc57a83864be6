//! Dominant-tone selection.
//!
//! The tone service scores an utterance across several emotional
//! categories; only the single strongest one is carried into the
//! dialogue context.

use serde::{Deserialize, Serialize};

use super::ToneScore;

/// The single highest-scoring tone for one utterance.
///
/// `tone_id` and `tone_name` are `None` when the utterance produced no
/// scored tones at all; downstream this serializes as explicit nulls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DominantTone {
    pub score: f64,
    pub tone_id: Option<String>,
    pub tone_name: Option<String>,
}

impl DominantTone {
    /// Zero default used when an utterance produced no tones.
    pub fn none() -> Self {
        Self {
            score: 0.0,
            tone_id: None,
            tone_name: None,
        }
    }
}

impl Default for DominantTone {
    fn default() -> Self {
        Self::none()
    }
}

/// Reduce a turn's scored tones to the single dominant one.
///
/// Single pass, strictly-greater comparison: an equal score never
/// replaces the current maximum, so on ties the first-encountered tone
/// wins. An empty slice yields the zero default.
pub fn select_dominant(tones: &[ToneScore]) -> DominantTone {
    let mut dominant = DominantTone::none();
    for tone in tones {
        if tone.score > dominant.score {
            dominant = DominantTone {
                score: tone.score,
                tone_id: Some(tone.tone_id.clone()),
                tone_name: Some(tone.tone_name.clone()),
            };
        }
    }
    dominant
}

// ============================================================================
// Tests
// ============================================================================
