use std::env;
use std::time::Duration;

use crate::error::ConfigError;

pub const API_KEY_VAR: &str = "GROQ_API_KEY";
pub const BASE_URL_VAR: &str = "QUIZ_AI_BASE_URL";
pub const MODEL_VAR: &str = "QUIZ_AI_MODEL";
pub const TEMPERATURE_VAR: &str = "QUIZ_AI_TEMPERATURE";
pub const TIMEOUT_VAR: &str = "QUIZ_AI_TIMEOUT_SECS";

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_MODEL: &str = "llama3-8b-8192";
const DEFAULT_TEMPERATURE: f32 = 0.5;
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Connection settings for the chat-completion classifier.
#[derive(Clone, PartialEq)]
pub struct ClassifierConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl std::fmt::Debug for ClassifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ClassifierConfig {
    /// Config with defaults for everything but the key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Read the config from process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredential` when the API key is unset or blank,
    /// and `ConfigError::InvalidValue` for unparsable numeric settings.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read the config through `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// Same as [`ClassifierConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingCredential { var: API_KEY_VAR })?;

        let mut config = Self::new(api_key.trim());
        if let Some(base_url) = lookup(BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config.base_url = base_url.trim().to_owned();
        }
        if let Some(model) = lookup(MODEL_VAR).filter(|v| !v.trim().is_empty()) {
            config.model = model.trim().to_owned();
        }
        if let Some(raw) = lookup(TEMPERATURE_VAR) {
            config.temperature = raw
                .trim()
                .parse::<f32>()
                .ok()
                .filter(|t| (0.0..=2.0).contains(t))
                .ok_or(ConfigError::InvalidValue {
                    var: TEMPERATURE_VAR,
                    raw,
                })?;
        }
        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidValue {
                    var: TIMEOUT_VAR,
                    raw,
                })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}
