//! Environment-derived service configuration.
//!
//! Built once at startup and passed into the pipeline. Sample
//! deployments ship a `.env` whose values are literal placeholders like
//! `<workspace-id>`; a placeholder is treated exactly like an unset
//! variable, and that normalization happens here so nothing past the
//! config boundary ever compares against sentinel strings.
//!
//! # Variables
//!
//! - `WORKSPACE_ID`             — dialogue workspace (required)
//! - `CONVERSATION_USERNAME`    — dialogue basic-auth user (required)
//! - `CONVERSATION_PASSWORD`    — dialogue basic-auth password (required)
//! - `TONE_ANALYZER_USERNAME`   — tone basic-auth user (optional)
//! - `TONE_ANALYZER_PASSWORD`   — tone basic-auth password (optional)
//! - `CONVERSATION_URL`         — dialogue base URL
//! - `TONE_ANALYZER_URL`        — tone base URL
//! - `CONFIDENCE_THRESHOLD`     — moderation cutoff (default 0.5)
//! - `PORT`                     — HTTP port (default 8080)
//!
//! Missing tone credentials are not an error: the pipeline skips tone
//! enrichment without them. Missing dialogue settings produce a
//! per-request advisory instead of a reply.

use std::env;

use thiserror::Error;

use crate::dialogue::DEFAULT_DIALOGUE_URL;
use crate::moderation::DEFAULT_CONFIDENCE_THRESHOLD;
use crate::tone::DEFAULT_TONE_URL;

const WORKSPACE_PLACEHOLDER: &str = "<workspace-id>";
const USERNAME_PLACEHOLDER: &str = "<conversation-username>";
const PASSWORD_PLACEHOLDER: &str = "<conversation-password>";
const THRESHOLD_PLACEHOLDER: &str = "<confidence-threshold>";

const DEFAULT_PORT: u16 = 8080;

/// Basic-auth credential pair for a cloud service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// A required variable that is unset or still at its placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MissingConfig {
    #[error("WORKSPACE_ID is unset or still a placeholder")]
    WorkspaceId,
    #[error("CONVERSATION_USERNAME is unset or still a placeholder")]
    ConversationUsername,
    #[error("CONVERSATION_PASSWORD is unset or still a placeholder")]
    ConversationPassword,
}

impl MissingConfig {
    pub fn var_name(&self) -> &'static str {
        match self {
            Self::WorkspaceId => "WORKSPACE_ID",
            Self::ConversationUsername => "CONVERSATION_USERNAME",
            Self::ConversationPassword => "CONVERSATION_PASSWORD",
        }
    }

    /// Advisory text shown to the chat client. The stock UI renders
    /// HTML, hence the bold tags.
    pub fn advisory(&self) -> String {
        format!(
            "The app has not been configured with a <b>{}</b> environment variable.",
            self.var_name()
        )
    }
}

/// Workspace identity plus credentials for the dialogue engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueAccess {
    pub workspace_id: String,
    pub credentials: Credentials,
}

/// Full service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub workspace_id: Option<String>,
    pub conversation_username: Option<String>,
    pub conversation_password: Option<String>,
    pub tone_credentials: Option<Credentials>,
    pub conversation_url: String,
    pub tone_url: String,
    pub confidence_threshold: f64,
    pub port: u16,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        let tone_username = normalize(env::var("TONE_ANALYZER_USERNAME").ok(), None);
        let tone_password = normalize(env::var("TONE_ANALYZER_PASSWORD").ok(), None);
        let tone_credentials = match (tone_username, tone_password) {
            (Some(username), Some(password)) => Some(Credentials { username, password }),
            _ => None,
        };

        Self {
            workspace_id: normalize(
                env::var("WORKSPACE_ID").ok(),
                Some(WORKSPACE_PLACEHOLDER),
            ),
            conversation_username: normalize(
                env::var("CONVERSATION_USERNAME").ok(),
                Some(USERNAME_PLACEHOLDER),
            ),
            conversation_password: normalize(
                env::var("CONVERSATION_PASSWORD").ok(),
                Some(PASSWORD_PLACEHOLDER),
            ),
            tone_credentials,
            conversation_url: env::var("CONVERSATION_URL")
                .unwrap_or_else(|_| DEFAULT_DIALOGUE_URL.to_string()),
            tone_url: env::var("TONE_ANALYZER_URL")
                .unwrap_or_else(|_| DEFAULT_TONE_URL.to_string()),
            confidence_threshold: parse_threshold(env::var("CONFIDENCE_THRESHOLD").ok()),
            port: parse_port(env::var("PORT").ok()),
        }
    }

    /// Workspace and credentials for the dialogue engine, or the first
    /// missing variable. Variables are checked in a fixed order so the
    /// advisory always names the same one for the same environment.
    pub fn dialogue_access(&self) -> Result<DialogueAccess, MissingConfig> {
        let workspace_id = self
            .workspace_id
            .clone()
            .ok_or(MissingConfig::WorkspaceId)?;
        let username = self
            .conversation_username
            .clone()
            .ok_or(MissingConfig::ConversationUsername)?;
        let password = self
            .conversation_password
            .clone()
            .ok_or(MissingConfig::ConversationPassword)?;

        Ok(DialogueAccess {
            workspace_id,
            credentials: Credentials { username, password },
        })
    }
}

/// Treat empty values and the placeholder (when given) as unset.
fn normalize(value: Option<String>, placeholder: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty() && Some(v.as_str()) != placeholder)
}

/// Parse the confidence threshold, falling back to the default on the
/// placeholder, an unset variable, or garbage.
fn parse_threshold(raw: Option<String>) -> f64 {
    match raw {
        None => DEFAULT_CONFIDENCE_THRESHOLD,
        Some(raw) if raw == THRESHOLD_PLACEHOLDER => DEFAULT_CONFIDENCE_THRESHOLD,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("CONFIDENCE_THRESHOLD {raw:?} is not a number, using default");
            DEFAULT_CONFIDENCE_THRESHOLD
        }),
    }
}

fn parse_port(raw: Option<String>) -> u16 {
    match raw {
        None => DEFAULT_PORT,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("PORT {raw:?} is not a valid port, using default");
            DEFAULT_PORT
        }),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> Config {
        Config {
            workspace_id: Some("ws-1".to_string()),
            conversation_username: Some("user".to_string()),
            conversation_password: Some("pass".to_string()),
            tone_credentials: None,
            conversation_url: DEFAULT_DIALOGUE_URL.to_string(),
            tone_url: DEFAULT_TONE_URL.to_string(),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            port: DEFAULT_PORT,
        }
    }

    #[test]
    fn test_normalize_treats_placeholder_as_unset() {
        assert_eq!(
            normalize(Some("<workspace-id>".to_string()), Some(WORKSPACE_PLACEHOLDER)),
            None
        );
        assert_eq!(normalize(Some(String::new()), Some(WORKSPACE_PLACEHOLDER)), None);
        assert_eq!(normalize(None, Some(WORKSPACE_PLACEHOLDER)), None);
        assert_eq!(
            normalize(Some("real-id".to_string()), Some(WORKSPACE_PLACEHOLDER)),
            Some("real-id".to_string())
        );
    }

    #[test]
    fn test_parse_threshold_fallbacks() {
        assert_eq!(parse_threshold(None), 0.5);
        assert_eq!(
            parse_threshold(Some("<confidence-threshold>".to_string())),
            0.5
        );
        assert_eq!(parse_threshold(Some("not-a-number".to_string())), 0.5);
        assert_eq!(parse_threshold(Some("0.72".to_string())), 0.72);
    }

    #[test]
    fn test_dialogue_access_reports_first_missing_variable() {
        let mut config = configured();
        config.workspace_id = None;
        config.conversation_username = None;
        assert_eq!(
            config.dialogue_access().unwrap_err(),
            MissingConfig::WorkspaceId
        );

        let mut config = configured();
        config.conversation_password = None;
        assert_eq!(
            config.dialogue_access().unwrap_err(),
            MissingConfig::ConversationPassword
        );
    }

    #[test]
    fn test_dialogue_access_when_fully_configured() {
        let access = configured().dialogue_access().unwrap();
        assert_eq!(access.workspace_id, "ws-1");
        assert_eq!(access.credentials.username, "user");
        assert_eq!(access.credentials.password, "pass");
    }

    #[test]
    fn test_advisory_names_the_variable() {
        assert_eq!(
            MissingConfig::WorkspaceId.advisory(),
            "The app has not been configured with a <b>WORKSPACE_ID</b> environment variable."
        );
        assert!(MissingConfig::ConversationUsername
            .advisory()
            .contains("<b>CONVERSATION_USERNAME</b>"));
    }
}
