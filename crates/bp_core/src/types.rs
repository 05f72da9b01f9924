use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// Subject domains the operator can start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    AiPerformanceEngineering,
    GpuComputing,
    HighPerformanceNetworking,
    RoboticsEdgeComputing,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::AiPerformanceEngineering,
        Category::GpuComputing,
        Category::HighPerformanceNetworking,
        Category::RoboticsEdgeComputing,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::AiPerformanceEngineering => "AI Performance Engineering",
            Self::GpuComputing => "GPU Computing & Hardware",
            Self::HighPerformanceNetworking => "High-Performance Networking",
            Self::RoboticsEdgeComputing => "Robotics & Edge Computing",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown category: {}", wanted))
    }
}

impl TryFrom<String> for Category {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.name().to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub rationale: String,
}

/// A cited reference. Its position in the list is its citation number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestTopicsRequest {
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestThemesRequest {
    pub topic: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepResearchRequest {
    pub theme: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateArticleRequest {
    pub theme: String,
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleResponse {
    pub article: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_names_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.name().parse::<Category>().unwrap(), category);
        }
        assert_eq!("gpu computing & hardware".parse::<Category>().unwrap(), Category::GpuComputing);
        assert!("Quantum Basket Weaving".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serializes_as_name() {
        let json = serde_json::to_string(&Category::RoboticsEdgeComputing).unwrap();
        assert_eq!(json, "\"Robotics & Edge Computing\"");
    }

    #[test]
    fn test_model_extras_are_ignored() {
        let topic: Topic = serde_json::from_str(
            r#"{"title": "CXL memory pooling", "description": "Why it matters", "trend_signal": "OCP 2025"}"#,
        )
        .unwrap();
        assert_eq!(topic.title, "CXL memory pooling");

        let source: Source = serde_json::from_str(r#"{"title": "Paper", "url": "https://arxiv.org/abs/1"}"#).unwrap();
        assert!(source.snippet.is_empty());
        assert!(source.date.is_empty());
    }

    #[test]
    fn test_generate_article_request_requires_sources() {
        let result = serde_json::from_str::<GenerateArticleRequest>(r#"{"theme": "x"}"#);
        assert!(result.is_err());
    }
}
