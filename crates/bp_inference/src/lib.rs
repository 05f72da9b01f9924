use std::env;
use bp_core::{Error, Result};
use url::Url;

pub mod models;
pub mod pipeline;

pub const DEFAULT_MODEL_NAME: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Clone, Default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    pub base_url: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Config {
    /// Reads `GEMINI_API_KEY`, `GEMINI_MODEL` and `GEMINI_BASE_URL`.
    pub fn from_env() -> Self {
        let read = |key: &str| env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            api_key: read("GEMINI_API_KEY"),
            model_name: read("GEMINI_MODEL"),
            base_url: read("GEMINI_BASE_URL"),
        }
    }

    pub fn model_name(&self) -> &str {
        self.model_name.as_deref().unwrap_or(DEFAULT_MODEL_NAME)
    }

    /// Validated base URL without a trailing slash.
    pub fn base_url(&self) -> Result<String> {
        let raw = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let url = Url::parse(raw).map_err(|e| Error::Config(format!("Invalid base URL '{}': {}", raw, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!("Unsupported base URL scheme: {}", url.scheme())));
        }
        Ok(url.as_str().trim_end_matches('/').to_string())
    }
}

pub mod prelude {
    pub use super::Config;
    pub use super::models::{create_model, ModelKind};
    pub use super::pipeline::{Pipeline, PipelineError, Stage};
    pub use bp_core::{Topic, Theme, Source, Result, Error};
}

pub use models::{create_model, ModelKind};
pub use pipeline::{Pipeline, PipelineError, Stage};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.model_name(), DEFAULT_MODEL_NAME);
        assert_eq!(config.base_url().unwrap(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_config_rejects_bad_base_url() {
        let config = Config { base_url: Some("not a url".to_string()), ..Default::default() };
        assert!(matches!(config.base_url(), Err(Error::Config(_))));

        let config = Config { base_url: Some("ftp://example.com".to_string()), ..Default::default() };
        assert!(config.base_url().is_err());

        let config = Config { base_url: Some("http://localhost:8080/v1beta/".to_string()), ..Default::default() };
        assert_eq!(config.base_url().unwrap(), "http://localhost:8080/v1beta");
    }

    #[test]
    fn test_config_debug_redacts_key() {
        let config = Config { api_key: Some("sk-secret".to_string()), ..Default::default() };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
