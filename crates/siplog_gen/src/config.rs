//! Provider configuration.
//!
//! One fixed endpoint and model per build; the app does not switch providers
//! at runtime. Values are serializable so the host app can persist overrides
//! alongside its other settings.

use serde::{Deserialize, Serialize};

/// Default cancellation deadline for a provider round trip (seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Generation provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Chat-completions endpoint URL.
    pub endpoint: String,
    /// Fixed model identifier sent with every request.
    pub model: String,
    /// Cancellation deadline in seconds; the in-flight request is aborted
    /// when it elapses.
    pub timeout_secs: u64,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            temperature: 0.7,
        }
    }
}

impl GenerationConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GenerationConfig::default();
        assert_eq!(config.timeout_secs, 20);
        assert_eq!(config.temperature, 0.7);
        assert!(config.endpoint.starts_with("https://"));
        assert!(!config.model.is_empty());
    }

    #[test]
    fn test_builder_overrides() {
        let config = GenerationConfig::default()
            .with_endpoint("http://localhost:8080/v1/chat/completions")
            .with_model("test-model")
            .with_timeout_secs(2);
        assert_eq!(config.endpoint, "http://localhost:8080/v1/chat/completions");
        assert_eq!(config.model, "test-model");
        assert_eq!(config.timeout_secs, 2);
    }
}
