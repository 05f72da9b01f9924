use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use bp_core::{GenerativeModel, Result};
use crate::Config;

pub mod dummy;
pub mod gemini;

pub use dummy::DummyModel;
pub use gemini::{GeminiModel, ModelFilter, ModelInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelKind {
    #[default]
    Gemini,
    Dummy,
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "dummy" => Ok(Self::Dummy),
            other => Err(format!("Unknown model: {} (available: gemini, dummy)", other)),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gemini => f.write_str("gemini"),
            Self::Dummy => f.write_str("dummy"),
        }
    }
}

pub fn create_model(kind: ModelKind, config: Config) -> Result<Arc<dyn GenerativeModel>> {
    match kind {
        ModelKind::Gemini => Ok(Arc::new(GeminiModel::new(config)?)),
        ModelKind::Dummy => Ok(Arc::new(DummyModel::with_sample_responses())),
    }
}
