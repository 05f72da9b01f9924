use std::fmt;
use std::sync::Arc;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use bp_core::{Error, GenerationMode, GenerativeModel, Result};
use crate::Config;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Serialize)]
struct GoogleSearch {}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    temperature: f32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct RemoteErrorBody {
    error: RemoteError,
}

#[derive(Deserialize)]
struct RemoteError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
    next_page_token: Option<String>,
}

/// A remote model as reported by the `models` listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

/// Selects models whose name contains any of `name_contains`, or that support `method`.
/// An empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct ModelFilter {
    pub name_contains: Vec<String>,
    pub method: Option<String>,
}

impl ModelFilter {
    pub fn is_empty(&self) -> bool {
        self.name_contains.is_empty() && self.method.is_none()
    }

    pub fn matches(&self, model: &ModelInfo) -> bool {
        if self.is_empty() {
            return true;
        }
        let by_name = self.name_contains.iter().any(|needle| model.name.contains(needle.as_str()));
        let by_method = self
            .method
            .as_ref()
            .map(|m| model.supported_generation_methods.iter().any(|s| s == m))
            .unwrap_or(false);
        by_name || by_method
    }
}

pub struct GeminiModel {
    client: Arc<Client>,
    api_key: String,
    model_name: String,
    base_url: String,
}

impl fmt::Debug for GeminiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeminiModel {
    pub fn new(config: Config) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::Config("GEMINI_API_KEY is required for the Gemini model".to_string()))?;
        Ok(Self {
            client: Arc::new(Client::new()),
            api_key,
            model_name: config.model_name().to_string(),
            base_url: config.base_url()?,
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Walks every page of the model listing and keeps what the filter accepts.
    pub async fn list_models(&self, filter: &ModelFilter) -> Result<Vec<ModelInfo>> {
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(format!("{}/models", self.base_url))
                .header(API_KEY_HEADER, &self.api_key)
                .query(&[("pageSize", "1000")]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(remote_failure(status, &body));
            }

            let page: ListModelsResponse = response.json().await?;
            models.extend(page.models.into_iter().filter(|m| filter.matches(m)));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(models)
    }
}

fn build_request(prompt: &str, mode: GenerationMode) -> GenerateContentRequest<'_> {
    let (tools, response_mime_type, temperature) = match mode {
        GenerationMode::SearchGrounded => (vec![Tool { google_search: GoogleSearch {} }], None, 0.4),
        GenerationMode::Json => (Vec::new(), Some("application/json"), 0.5),
        GenerationMode::Plain => (Vec::new(), None, 0.6),
    };
    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![RequestPart { text: prompt }],
        }],
        tools,
        generation_config: GenerationConfig {
            response_mime_type,
            temperature,
        },
    }
}

/// Joins the text parts of the first candidate, skipping thinking parts.
fn extract_text(response: GenerateContentResponse) -> Result<String> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates".to_string());
        return Err(Error::EmptyResponse(reason));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|p| !p.thought)
        .filter_map(|p| p.text)
        .collect();

    if text.trim().is_empty() {
        return Err(Error::EmptyResponse(
            candidate.finish_reason.unwrap_or_else(|| "unknown".to_string()),
        ));
    }
    Ok(text)
}

fn remote_failure(status: reqwest::StatusCode, body: &str) -> Error {
    let detail = serde_json::from_str::<RemoteErrorBody>(body)
        .map(|b| format!("{} {}", b.error.status, b.error.message).trim().to_string())
        .unwrap_or_else(|_| body.chars().take(300).collect());
    Error::Inference(format!("Gemini returned {}: {}", status, detail))
}

#[async_trait]
impl GenerativeModel for GeminiModel {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn generate(&self, prompt: &str, mode: GenerationMode) -> Result<String> {
        let request = build_request(prompt, mode);
        tracing::debug!("Calling {} ({} mode, {} prompt chars)", self.model_name, mode, prompt.len());

        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, self.model_name))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(remote_failure(status, &body));
        }

        extract_text(response.json::<GenerateContentResponse>().await?)
    }
}
