//! Shared configuration, error taxonomy and workflow status types.

use neuro_core::Locale;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::contract::ContractViolation;

/// Result type for generation operations
pub type AgentResult<T> = Result<T, GenerationError>;

/// Failure of a single generation call
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Malformed response: {0}")]
    MalformedResponse(#[from] MalformedResponse),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl GenerationError {
    /// Only transport failures may succeed on an identical second attempt
    pub fn is_transient(&self) -> bool {
        matches!(self, GenerationError::Transport(_))
    }
}

/// The service could not be reached or refused the request
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Service unreachable: {0}")]
    Unreachable(String),

    #[error("Service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },
}

/// The service answered, but not with usable data
#[derive(Debug, thiserror::Error)]
pub enum MalformedResponse {
    #[error("Response is not valid JSON: {0}")]
    Unparseable(String),

    #[error("Contract violation: {0}")]
    ContractViolation(#[from] ContractViolation),

    #[error("Response does not decode: {0}")]
    Decode(String),

    #[error("Response contained no candidate text")]
    EmptyCandidate,
}

/// One-shot workflows whose failures surface to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Workflow {
    Profile,
    Scenario,
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Workflow::Profile => f.write_str("Profile generation"),
            Workflow::Scenario => f.write_str("Scenario simulation"),
        }
    }
}

/// Caller-facing failure carrying only a generic localized message.
///
/// The underlying cause is logged where it happens and never stored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{workflow} failed: {message}")]
pub struct ApplicationError {
    pub workflow: Workflow,
    pub message: String,
}

impl ApplicationError {
    pub fn new(workflow: Workflow, locale: Locale) -> Self {
        let message = match workflow {
            Workflow::Profile => locale.profile_error(),
            Workflow::Scenario => locale.scenario_error(),
        };
        Self {
            workflow,
            message: message.to_string(),
        }
    }
}

/// Loading/error state of a one-shot workflow
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WorkflowStatus {
    #[default]
    Idle,
    Loading,
    Failed(String),
}

impl WorkflowStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, WorkflowStatus::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            WorkflowStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Bounded exponential backoff, applied to transport failures only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Extra attempts after the first; 0 fails fast
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `retry` (0-based)
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 1u64.checked_shl(retry).unwrap_or(u64::MAX);
        let ms = self
            .initial_backoff_ms
            .saturating_mul(factor)
            .min(self.max_backoff_ms);
        Duration::from_millis(ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_backoff_ms: 500,
            max_backoff_ms: 8_000,
        }
    }
}

/// Generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Fixed model identity (e.g., "gemini-2.5-flash")
    pub model: String,
    /// Language of every generated text
    pub locale: Locale,
    /// Sampling temperature for baseline profiles (0.0-1.0]
    pub profile_temperature: f32,
    pub chat_temperature: f32,
    pub scenario_temperature: f32,
    pub retry: RetryPolicy,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            locale: Locale::default(),
            profile_temperature: 0.8,
            chat_temperature: 0.7,
            scenario_temperature: 0.7,
            retry: RetryPolicy::default(),
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> neuro_core::Result<()> {
        if self.model.trim().is_empty() {
            return Err(neuro_core::Error::Configuration(
                "model must not be empty".to_string(),
            ));
        }

        for (name, value) in [
            ("profile_temperature", self.profile_temperature),
            ("chat_temperature", self.chat_temperature),
            ("scenario_temperature", self.scenario_temperature),
        ] {
            if !temperature_in_range(value) {
                return Err(neuro_core::Error::Configuration(format!(
                    "{name} must be in (0, 1], got {value}"
                )));
            }
        }

        Ok(())
    }
}

/// Sampling temperatures accepted by the service: (0, 1]
pub fn temperature_in_range(temperature: f32) -> bool {
    temperature > 0.0 && temperature <= 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_config_default() {
        let config = AgentConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.profile_temperature, 0.8);
        assert_eq!(config.retry.max_retries, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_zero_temperature() {
        let config = AgentConfig {
            chat_temperature: 0.0,
            ..AgentConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("chat_temperature"));
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy {
            max_retries: 10,
            initial_backoff_ms: 500,
            max_backoff_ms: 3_000,
        };
        assert_eq!(policy.backoff(0), Duration::from_millis(500));
        assert_eq!(policy.backoff(1), Duration::from_millis(1_000));
        assert_eq!(policy.backoff(3), Duration::from_millis(3_000));
        assert_eq!(policy.backoff(80), Duration::from_millis(3_000));
    }

    #[test]
    fn test_only_transport_is_transient() {
        let transport: GenerationError = TransportError::Timeout { duration_ms: 10 }.into();
        let malformed: GenerationError = MalformedResponse::EmptyCandidate.into();
        assert!(transport.is_transient());
        assert!(!malformed.is_transient());
    }

    #[test]
    fn test_application_error_is_generic() {
        let err = ApplicationError::new(Workflow::Scenario, Locale::English);
        assert_eq!(err.message, Locale::English.scenario_error());
        assert!(err.to_string().starts_with("Scenario simulation failed"));
    }
}
