//! Service configuration, with environment-driven construction.

use crate::error::{Error, Result};
use std::env;
use url::Url;

pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

const ENV_API_KEY: &str = "GEMINI_API_KEY";
const ENV_MODEL: &str = "GEMINI_MODEL";
const ENV_BASE_URL: &str = "GEMINI_BASE_URL";

/// Connection settings for the hosted Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: Url,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    /// Read `GEMINI_API_KEY` (required) plus the optional `GEMINI_MODEL`
    /// and `GEMINI_BASE_URL` overrides.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var(ENV_API_KEY)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| Error::config(format!("{} is not set", ENV_API_KEY)))?;

        let mut config = Self::new(api_key);
        if let Ok(model) = env::var(ENV_MODEL) {
            if !model.trim().is_empty() {
                config.model = model;
            }
        }
        if let Ok(base_url) = env::var(ENV_BASE_URL) {
            if !base_url.trim().is_empty() {
                config = config.with_base_url(&base_url)?;
            }
        }
        Ok(config)
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    // Url::join drops the last path segment unless the base ends in '/'.
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&normalized).map_err(|e| Error::config(format!("invalid base URL {:?}: {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeminiConfig::new("key");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let config = GeminiConfig::new("key")
            .with_base_url("https://proxy.example.com/v1beta")
            .unwrap();
        let joined = config.base_url.join("models/x:streamGenerateContent").unwrap();
        assert_eq!(
            joined.as_str(),
            "https://proxy.example.com/v1beta/models/x:streamGenerateContent"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = GeminiConfig::new("key").with_base_url("not a url").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_model_override() {
        let config = GeminiConfig::new("key").with_model("gemini-experimental");
        assert_eq!(config.model, "gemini-experimental");
    }
}
