use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;
use bp_core::{
    ArticleResponse, DeepResearchRequest, GenerateArticleRequest, Source, SuggestThemesRequest,
    SuggestTopicsRequest, Theme, Topic,
};
use bp_inference::Stage;
use crate::{ApiError, AppState};

type Payload<T> = Result<Json<T>, JsonRejection>;

/// A body that does not deserialize fails the stage like any other error.
fn accept<T>(stage: Stage, payload: Payload<T>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::new(stage, format!("bad request body: {}", rejection.body_text())))
}

pub async fn suggest_topics(
    State(state): State<Arc<AppState>>,
    payload: Payload<SuggestTopicsRequest>,
) -> Result<Json<Vec<Topic>>, ApiError> {
    let request = accept(Stage::SuggestTopics, payload)?;
    tracing::info!("Suggesting topics for category {:?}", request.category);
    Ok(Json(state.pipeline.suggest_topics(&request.category).await?))
}

pub async fn suggest_themes(
    State(state): State<Arc<AppState>>,
    payload: Payload<SuggestThemesRequest>,
) -> Result<Json<Vec<Theme>>, ApiError> {
    let request = accept(Stage::SuggestThemes, payload)?;
    tracing::info!("Suggesting themes for topic {:?}", request.topic);
    Ok(Json(state.pipeline.suggest_themes(&request.topic).await?))
}

pub async fn deep_research(
    State(state): State<Arc<AppState>>,
    payload: Payload<DeepResearchRequest>,
) -> Result<Json<Vec<Source>>, ApiError> {
    let request = accept(Stage::DeepResearch, payload)?;
    tracing::info!("Researching theme {:?}", request.theme);
    Ok(Json(state.pipeline.deep_research(&request.theme).await?))
}

pub async fn generate_article(
    State(state): State<Arc<AppState>>,
    payload: Payload<GenerateArticleRequest>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let request = accept(Stage::GenerateArticle, payload)?;
    tracing::info!("Generating article for {:?} from {} sources", request.theme, request.sources.len());
    let article = state.pipeline.generate_article(&request.theme, &request.sources).await?;
    Ok(Json(ArticleResponse { article }))
}
