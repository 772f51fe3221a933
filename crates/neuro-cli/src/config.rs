//! Host configuration.

use config::builder::DefaultState;
use config::ConfigBuilder;
use neuro_agents::{AgentConfig, GeminiConfig, RetryPolicy, DEFAULT_BASE_URL};
use neuro_core::{Error, Locale};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete host configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Credential for the generative service
    pub api_key: Option<String>,

    pub model: String,

    pub base_url: String,

    /// Request timeout (seconds)
    pub timeout_secs: u64,

    /// Output language (english | persian)
    pub locale: String,

    pub profile_temperature: f32,
    pub chat_temperature: f32,
    pub scenario_temperature: f32,

    /// Retries after a transport failure; 0 disables retrying
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let agent = AgentConfig::default();
        Self {
            api_key: None,
            model: agent.model,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 60,
            locale: "english".to_string(),
            profile_temperature: agent.profile_temperature,
            chat_temperature: agent.chat_temperature,
            scenario_temperature: agent.scenario_temperature,
            max_retries: agent.retry.max_retries,
            initial_backoff_ms: agent.retry.initial_backoff_ms,
            max_backoff_ms: agent.retry.max_backoff_ms,
        }
    }
}

impl AppConfig {
    /// Load from an optional file, then `NEURO_*` environment variables.
    ///
    /// A bare `API_KEY` is accepted when `NEURO_API_KEY` is absent.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let mut settings = Self::from_builder(
            builder.add_source(config::Environment::with_prefix("NEURO")),
        )?;

        if settings.api_key.is_none() {
            settings.api_key = std::env::var("API_KEY").ok();
        }

        Ok(settings)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, config::ConfigError> {
        builder.build()?.try_deserialize()
    }

    pub fn locale(&self) -> neuro_core::Result<Locale> {
        self.locale.parse()
    }

    /// The API key, or a configuration error when missing or blank
    pub fn api_key(&self) -> neuro_core::Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                Error::Configuration("NEURO_API_KEY (or API_KEY) must be set".to_string())
            })
    }

    pub fn validate(&self) -> neuro_core::Result<()> {
        self.api_key()?;
        if self.timeout_secs == 0 {
            return Err(Error::Configuration(
                "timeout_secs must be positive".to_string(),
            ));
        }
        if self.initial_backoff_ms > self.max_backoff_ms {
            return Err(Error::Configuration(
                "initial_backoff_ms must not exceed max_backoff_ms".to_string(),
            ));
        }
        self.agent_config()?.validate()
    }

    pub fn agent_config(&self) -> neuro_core::Result<AgentConfig> {
        Ok(AgentConfig {
            model: self.model.clone(),
            locale: self.locale()?,
            profile_temperature: self.profile_temperature,
            chat_temperature: self.chat_temperature,
            scenario_temperature: self.scenario_temperature,
            retry: RetryPolicy {
                max_retries: self.max_retries,
                initial_backoff_ms: self.initial_backoff_ms,
                max_backoff_ms: self.max_backoff_ms,
            },
        })
    }

    pub fn gemini_config(&self) -> neuro_core::Result<GeminiConfig> {
        Ok(GeminiConfig {
            api_key: self.api_key()?.to_string(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
        })
    }
}
