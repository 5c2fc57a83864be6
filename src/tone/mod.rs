//! Tone classification: remote client and dominant-tone selection.

pub mod client;
pub mod dominant;

pub use client::{ToneClient, ToneError, ToneScore, ToneService, DEFAULT_TONE_URL, TONE_VERSION_DATE};
pub use dominant::{select_dominant, DominantTone};
