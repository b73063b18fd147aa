use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::recommend::RecommendError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Pipeline(#[from] RecommendError),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let GatewayError::Pipeline(error) = &self;

        let status = match error {
            RecommendError::ForbiddenWord => StatusCode::BAD_REQUEST,
            RecommendError::NoCategoryFound
            | RecommendError::NoStoreFound { .. }
            | RecommendError::UserNotFound { .. } => StatusCode::NOT_FOUND,
            RecommendError::Embedding(_)
            | RecommendError::VectorDb(_)
            | RecommendError::Llm(_) => StatusCode::BAD_GATEWAY,
            RecommendError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}
