//! OpenAI client configuration.

use crate::error::Result;
use crate::llms::LlmError;
use crate::settings::Settings;

/// Configuration for the OpenAI client.
#[derive(Clone)]
pub struct OpenAIConfig {
    /// API key for authentication.
    pub api_key: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Default model to use.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for OpenAIConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl OpenAIConfig {
    /// Default OpenAI API base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";
    /// Default model.
    pub const DEFAULT_MODEL: &'static str = "gpt-4o-mini";

    /// Creates a new configuration with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Creates configuration from a settings source.
    ///
    /// Reads `OPENAI_API_KEY` (required), `OPENAI_BASE_URL` and
    /// `OPENAI_MODEL`.
    ///
    /// # Errors
    ///
    /// Returns an auth error if no API key is set.
    pub fn from_settings(settings: &dyn Settings) -> Result<Self> {
        let api_key = settings
            .get("OPENAI_API_KEY")
            .ok_or_else(|| LlmError::auth("openai", "OPENAI_API_KEY is not set"))?;
        let base_url = settings
            .get("OPENAI_BASE_URL")
            .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_owned());
        let model = settings
            .get("OPENAI_MODEL")
            .unwrap_or_else(|| Self::DEFAULT_MODEL.to_owned());

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_owned(),
            model,
            timeout_secs: Some(120),
        })
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the default model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            model: Self::DEFAULT_MODEL.to_owned(),
            timeout_secs: Some(120),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MapSettings;

    #[test]
    fn from_settings_requires_key() {
        assert!(OpenAIConfig::from_settings(&MapSettings::new()).is_err());
    }

    #[test]
    fn from_settings_reads_overrides() {
        let settings = MapSettings::new()
            .with("OPENAI_API_KEY", "sk-test")
            .with("OPENAI_BASE_URL", "http://localhost:8080/v1/")
            .with("OPENAI_MODEL", "local-model");
        let config = OpenAIConfig::from_settings(&settings).expect("configured");

        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.model, "local-model");
        assert!(!format!("{config:?}").contains("sk-test"));
    }

    #[test]
    fn builder() {
        let config = OpenAIConfig::new("key").with_model("gpt-4o").with_timeout(30);
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.timeout_secs, Some(30));
        assert_eq!(config.base_url, OpenAIConfig::DEFAULT_BASE_URL);
    }
}
