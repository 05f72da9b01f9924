use std::fmt;
use std::sync::Arc;
use chrono::Datelike;
use thiserror::Error;
use bp_core::{parse_json_response, GenerationMode, GenerativeModel, Logger, Source, Theme, Topic};

pub mod prompts;

use prompts::Window;

/// One orchestration operation: prompt, remote call, parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    SuggestTopics,
    SuggestThemes,
    DeepResearch,
    GenerateArticle,
}

impl Stage {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::SuggestTopics => "suggest-topics",
            Self::SuggestThemes => "suggest-themes",
            Self::DeepResearch => "deep-research",
            Self::GenerateArticle => "generate-article",
        }
    }

    /// The only thing a caller ever learns about a failure.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::SuggestTopics => "Failed to suggest topics",
            Self::SuggestThemes => "Failed to suggest themes",
            Self::DeepResearch => "Failed to conduct deep research",
            Self::GenerateArticle => "Failed to generate article",
        }
    }

    pub fn mode(&self) -> GenerationMode {
        match self {
            Self::SuggestTopics | Self::DeepResearch => GenerationMode::SearchGrounded,
            Self::SuggestThemes => GenerationMode::Json,
            Self::GenerateArticle => GenerationMode::Plain,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Every failure of a stage collapses into this; the underlying cause is kept for logs.
#[derive(Error, Debug)]
#[error("{}", .stage.failure_message())]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: bp_core::Error,
}

impl PipelineError {
    pub fn new(stage: Stage, source: impl Into<bp_core::Error>) -> Self {
        Self { stage, source: source.into() }
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

/// Stateless orchestrator; clones share the same model.
#[derive(Debug, Clone)]
pub struct Pipeline {
    model: Arc<dyn GenerativeModel>,
    reference_year: Option<i32>,
    logger: Logger,
}

impl Pipeline {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            model,
            reference_year: None,
            logger: Logger::new().with_prefix("pipeline"),
        }
    }

    /// Pins the year the prompt time windows are computed from.
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    fn reference_year(&self) -> i32 {
        self.reference_year.unwrap_or_else(|| chrono::Utc::now().year())
    }

    async fn call(&self, stage: Stage, prompt: String) -> PipelineResult<String> {
        let logger = self.logger.clone().with_prefix(stage.tag());
        logger.info(&format!("Calling {} in {} mode", self.model.name(), stage.mode()));
        match self.model.generate(&prompt, stage.mode()).await {
            Ok(text) => {
                logger.debug(&format!("Received {} chars", text.len()));
                Ok(text)
            }
            Err(e) => {
                logger.error(&format!("Model call failed: {}", e));
                Err(PipelineError::new(stage, e))
            }
        }
    }

    async fn call_json<T: serde::de::DeserializeOwned>(&self, stage: Stage, prompt: String) -> PipelineResult<Vec<T>> {
        let text = self.call(stage, prompt).await?;
        parse_json_response::<Vec<T>>(&text).map_err(|e| {
            self.logger
                .clone()
                .with_prefix(stage.tag())
                .error(&format!("Unparseable model output: {}", e));
            PipelineError::new(stage, e)
        })
    }

    pub async fn suggest_topics(&self, category: &str) -> PipelineResult<Vec<Topic>> {
        let prompt = prompts::suggest_topics(category, Window::topics(self.reference_year()));
        self.call_json(Stage::SuggestTopics, prompt).await
    }

    pub async fn suggest_themes(&self, topic: &str) -> PipelineResult<Vec<Theme>> {
        self.call_json(Stage::SuggestThemes, prompts::suggest_themes(topic)).await
    }

    /// Sources come back exactly as the model wrote them; URLs and dates are not checked.
    pub async fn deep_research(&self, theme: &str) -> PipelineResult<Vec<Source>> {
        let prompt = prompts::deep_research(theme, Window::sources(self.reference_year()));
        self.call_json(Stage::DeepResearch, prompt).await
    }

    /// Returns the raw reply; the article body is the entire response.
    pub async fn generate_article(&self, theme: &str, sources: &[Source]) -> PipelineResult<String> {
        self.call(Stage::GenerateArticle, prompts::generate_article(theme, sources)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DummyModel;

    fn make_pipeline(model: DummyModel) -> (Pipeline, Arc<DummyModel>) {
        let model = Arc::new(model);
        (Pipeline::new(model.clone()).with_reference_year(2026), model)
    }

    #[tokio::test]
    async fn test_fenced_topics_are_unwrapped() {
        let body = r#"[{"title": "Isaac ROS on Jetson Thor", "description": "Edge perception latency"}]"#;
        let (pipeline, model) = make_pipeline(DummyModel::new().push_text(format!("```json\n{}\n```", body)));

        let topics = pipeline.suggest_topics("Robotics & Edge Computing").await.unwrap();
        let expected: Vec<Topic> = serde_json::from_str(body).unwrap();
        assert_eq!(topics, expected);

        let calls = model.calls();
        assert_eq!(calls[0].1, GenerationMode::SearchGrounded);
        assert!(calls[0].0.contains("Robotics & Edge Computing"));
        assert!(calls[0].0.contains("2025-2026"));
    }

    #[tokio::test]
    async fn test_themes_use_json_mode() {
        let (pipeline, model) = make_pipeline(DummyModel::new().push_text(r#"[{"theme": "a", "rationale": "b"}]"#));
        let themes = pipeline.suggest_themes("CXL").await.unwrap();
        assert_eq!(themes, vec![Theme { theme: "a".into(), rationale: "b".into() }]);
        assert_eq!(model.calls()[0].1, GenerationMode::Json);
    }

    #[tokio::test]
    async fn test_fenced_themes_are_unwrapped() {
        let (pipeline, _) = make_pipeline(DummyModel::new().push_text("```json\n[{\"theme\": \"a\", \"rationale\": \"b\"}]\n```"));
        let themes = pipeline.suggest_themes("CXL").await.unwrap();
        assert_eq!(themes, vec![Theme { theme: "a".into(), rationale: "b".into() }]);
    }

    #[tokio::test]
    async fn test_truncated_topics_fail_whole_stage() {
        let (pipeline, _) = make_pipeline(DummyModel::new().push_text(r#"[{"title": "NVLink Fusion", "descr"#));
        let err = pipeline.suggest_topics("GPU Computing & Hardware").await.unwrap_err();
        assert_eq!(err.stage, Stage::SuggestTopics);
        assert_eq!(err.to_string(), "Failed to suggest topics");
        assert!(matches!(err.source, bp_core::Error::Serialization(_)));
    }

    #[tokio::test]
    async fn test_truncated_research_fails_whole_stage() {
        let (pipeline, _) = make_pipeline(DummyModel::new().push_text(r#"[{"title": "A", "url": "https://a.example", "snip"#));
        let err = pipeline.deep_research("theme").await.unwrap_err();
        assert_eq!(err.stage, Stage::DeepResearch);
        assert_eq!(err.to_string(), "Failed to conduct deep research");
        assert!(matches!(err.source, bp_core::Error::Serialization(_)));
    }

    #[tokio::test]
    async fn test_model_failure_is_collapsed() {
        let (pipeline, _) = make_pipeline(DummyModel::new().push_failure("connection reset"));
        let err = pipeline.suggest_topics("GPU Computing & Hardware").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to suggest topics");
        assert!(err.source.to_string().contains("connection reset"));

        let (pipeline, _) = make_pipeline(DummyModel::new().push_failure("quota"));
        let err = pipeline.generate_article("t", &[]).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to generate article");
    }

    #[tokio::test]
    async fn test_object_instead_of_array_is_rejected() {
        let (pipeline, _) = make_pipeline(DummyModel::new().push_text(r#"{"theme": "a", "rationale": "b"}"#));
        let err = pipeline.suggest_themes("x").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to suggest themes");
    }

    #[tokio::test]
    async fn test_article_is_returned_raw() {
        let raw = "```json\n# Not parsed\n```";
        let (pipeline, model) = make_pipeline(DummyModel::new().push_text(raw));
        let sources = vec![Source { title: "S".into(), url: "https://s.example".into(), ..Default::default() }];

        let article = pipeline.generate_article("theme", &sources).await.unwrap();
        assert_eq!(article, raw);

        let calls = model.calls();
        assert_eq!(calls[0].1, GenerationMode::Plain);
        assert!(calls[0].0.contains("[1] S - https://s.example"));
    }

    #[tokio::test]
    async fn test_empty_list_is_accepted() {
        let (pipeline, _) = make_pipeline(DummyModel::new().push_text("[]"));
        assert!(pipeline.deep_research("theme").await.unwrap().is_empty());
    }
}
