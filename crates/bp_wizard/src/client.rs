use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use bp_core::{
    ArticleResponse, DeepResearchRequest, ErrorResponse, GenerateArticleRequest, Source,
    SuggestThemesRequest, SuggestTopicsRequest, Theme, Topic,
};
use bp_inference::Pipeline;
use crate::state::{PendingCall, Reply};

pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";

#[derive(Error, Debug)]
pub enum ClientError {
    /// The message the service sent back, shown to the operator as is.
    #[error("{0}")]
    Service(String),

    #[error("{message}")]
    Transport {
        message: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// The four orchestration operations as the wizard sees them.
#[async_trait]
pub trait PipelineClient: Send + Sync {
    async fn suggest_topics(&self, category: &str) -> Result<Vec<Topic>, ClientError>;

    async fn suggest_themes(&self, topic: &str) -> Result<Vec<Theme>, ClientError>;

    async fn deep_research(&self, theme: &str) -> Result<Vec<Source>, ClientError>;

    async fn generate_article(&self, theme: &str, sources: &[Source]) -> Result<String, ClientError>;

    /// Runs whichever operation `call` names.
    async fn execute(&self, call: PendingCall) -> Result<Reply, ClientError> {
        match call {
            PendingCall::SuggestTopics { category } => self.suggest_topics(&category).await.map(Reply::Topics),
            PendingCall::SuggestThemes { topic } => self.suggest_themes(&topic).await.map(Reply::Themes),
            PendingCall::DeepResearch { theme } => self.deep_research(&theme).await.map(Reply::Sources),
            PendingCall::GenerateArticle { theme, sources } => {
                self.generate_article(&theme, &sources).await.map(Reply::Article)
            }
        }
    }
}

/// Talks to a running `bp serve` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B, R>(&self, path: &str, body: &B, fallback: &'static str) -> Result<R, ClientError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let transport = |source| ClientError::Transport { message: fallback, source };

        let response = self
            .client
            .post(format!("{}/{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|e| e.error)
                .unwrap_or_else(|_| fallback.to_string());
            return Err(ClientError::Service(message));
        }

        response.json::<R>().await.map_err(transport)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

#[async_trait]
impl PipelineClient for HttpClient {
    async fn suggest_topics(&self, category: &str) -> Result<Vec<Topic>, ClientError> {
        let body = SuggestTopicsRequest { category: category.to_string() };
        self.post("suggest-topics", &body, "Failed to fetch topics").await
    }

    async fn suggest_themes(&self, topic: &str) -> Result<Vec<Theme>, ClientError> {
        let body = SuggestThemesRequest { topic: topic.to_string() };
        self.post("suggest-themes", &body, "Failed to fetch themes").await
    }

    async fn deep_research(&self, theme: &str) -> Result<Vec<Source>, ClientError> {
        let body = DeepResearchRequest { theme: theme.to_string() };
        self.post("deep-research", &body, "Failed to perform deep research").await
    }

    async fn generate_article(&self, theme: &str, sources: &[Source]) -> Result<String, ClientError> {
        let body = GenerateArticleRequest { theme: theme.to_string(), sources: sources.to_vec() };
        let response: ArticleResponse = self.post("generate-article", &body, "Failed to generate article").await?;
        Ok(response.article)
    }
}

/// Runs the pipeline in-process, with the same generic failure messages the service returns.
#[async_trait]
impl PipelineClient for Pipeline {
    async fn suggest_topics(&self, category: &str) -> Result<Vec<Topic>, ClientError> {
        Pipeline::suggest_topics(self, category).await.map_err(service_error)
    }

    async fn suggest_themes(&self, topic: &str) -> Result<Vec<Theme>, ClientError> {
        Pipeline::suggest_themes(self, topic).await.map_err(service_error)
    }

    async fn deep_research(&self, theme: &str) -> Result<Vec<Source>, ClientError> {
        Pipeline::deep_research(self, theme).await.map_err(service_error)
    }

    async fn generate_article(&self, theme: &str, sources: &[Source]) -> Result<String, ClientError> {
        Pipeline::generate_article(self, theme, sources).await.map_err(service_error)
    }
}

fn service_error(err: bp_inference::PipelineError) -> ClientError {
    tracing::debug!("{} failed: {}", err.stage, err.source);
    ClientError::Service(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use bp_inference::models::DummyModel;

    #[test]
    fn test_base_url_is_normalized() {
        assert_eq!(HttpClient::new("http://localhost:3001/api/").base_url(), "http://localhost:3001/api");
        assert_eq!(HttpClient::default().base_url(), DEFAULT_API_URL);
    }

    #[tokio::test]
    async fn test_in_process_client_collapses_errors() {
        let pipeline = Pipeline::new(Arc::new(DummyModel::new().push_text("not json")));
        let err = PipelineClient::suggest_themes(&pipeline, "topic").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to suggest themes");
    }

    #[tokio::test]
    async fn test_execute_dispatches_by_call() {
        let pipeline = Pipeline::new(Arc::new(DummyModel::new().push_text("# Article")));
        let reply = pipeline
            .execute(PendingCall::GenerateArticle { theme: "t".to_string(), sources: vec![] })
            .await
            .unwrap();
        assert_eq!(reply, Reply::Article("# Article".to_string()));
    }

    #[tokio::test]
    async fn test_unreachable_service_uses_fallback_message() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = HttpClient::new(format!("http://127.0.0.1:{}/api", port));
        let err = client.suggest_topics("GPU Computing & Hardware").await.unwrap_err();
        assert!(matches!(err, ClientError::Transport { .. }));
        assert_eq!(err.to_string(), "Failed to fetch topics");
    }
}
