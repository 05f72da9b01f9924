use std::fmt;
use async_trait::async_trait;
use crate::Result;

/// How a prompt is sent to the remote model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationMode {
    /// Web-search augmentation enabled so the answer can be grounded in live results.
    SearchGrounded,
    /// Strict JSON response format, no search.
    Json,
    /// No special configuration.
    Plain,
}

impl GenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SearchGrounded => "search",
            Self::Json => "json",
            Self::Plain => "plain",
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait GenerativeModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Send a single prompt and return the raw text of the reply
    async fn generate(&self, prompt: &str, mode: GenerationMode) -> Result<String>;
}
