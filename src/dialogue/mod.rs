//! Dialogue engine: remote client and wire types.

pub mod client;
pub mod types;

pub use client::{
    DialogueClient, DialogueError, DialogueService, DEFAULT_DIALOGUE_URL, DIALOGUE_VERSION_DATE,
};
pub use types::{DialogueInput, DialogueOutput, DialogueRequest, DialogueResponse, Intent};
