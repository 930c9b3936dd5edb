//! Configuration for the external text generator.
//!
//! The credential is read once, by whoever builds the config, and then
//! passed in explicitly. Nothing in this crate looks at the environment
//! on its own.

use std::time::Duration;

/// Environment variable checked first for the Gemini credential.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Fallback environment variable for the credential.
pub const LEGACY_API_KEY_VAR: &str = "API_KEY";

const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Settings for the AI host's generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Access credential. `None` means every client uses its fallback.
    pub api_key: Option<String>,

    /// Model used for commentary and hints.
    pub model: String,

    /// Override for the API root, mainly for proxies.
    pub base_url: Option<String>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Cap on generated tokens per reply.
    pub max_output_tokens: Option<u32>,

    /// Overall timeout per request.
    pub timeout: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
            temperature: Some(0.9),
            max_output_tokens: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl GeneratorConfig {
    /// A config with no credential; all generator calls short-circuit.
    pub fn offline() -> Self {
        Self::default()
    }

    /// Read the credential from `GEMINI_API_KEY`, then `API_KEY`.
    pub fn from_env() -> Self {
        let api_key = [API_KEY_VAR, LEGACY_API_KEY_VAR]
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|k| !k.trim().is_empty()));
        Self::default().with_optional_api_key(api_key)
    }

    /// Set the credential.
    pub fn with_api_key(self, api_key: impl Into<String>) -> Self {
        self.with_optional_api_key(Some(api_key.into()))
    }

    fn with_optional_api_key(mut self, api_key: Option<String>) -> Self {
        // Blank keys are treated as missing.
        self.api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        self
    }

    /// Drop any configured credential.
    pub fn without_api_key(mut self) -> Self {
        self.api_key = None;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_has_no_credential() {
        let config = GeneratorConfig::offline();
        assert!(!config.has_credential());
        assert_eq!(config.model, "gemini-2.5-flash");
    }

    #[test]
    fn test_builder() {
        let config = GeneratorConfig::offline()
            .with_api_key("abc")
            .with_model("gemini-2.5-pro")
            .with_temperature(0.2)
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.temperature, Some(0.2));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(!config.without_api_key().has_credential());
    }

    #[test]
    fn test_blank_key_is_missing() {
        assert!(!GeneratorConfig::offline().with_api_key("   ").has_credential());
        assert!(!GeneratorConfig::offline().with_api_key("").has_credential());
    }
}
