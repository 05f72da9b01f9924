use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bp_core::ErrorResponse;
use bp_inference::{PipelineError, Stage};
use thiserror::Error;

/// What a handler returns on failure: always a 500 naming the stage, never the cause.
#[derive(Error, Debug)]
#[error("{}", .stage.failure_message())]
pub struct ApiError {
    pub stage: Stage,
    detail: String,
}

impl ApiError {
    pub fn new(stage: Stage, detail: impl ToString) -> Self {
        Self { stage, detail: detail.to_string() }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        Self::new(err.stage, err.source)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("Error in {}: {}", self.stage, self.detail);
        let body = ErrorResponse {
            error: self.stage.failure_message().to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
