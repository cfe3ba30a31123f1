//! Error handling
//!
//! Every failure reaches the client as `500 {"error": "<message>"}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::features::EncodingError;
use crate::model::InferenceError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Request errors
    #[error("{0}")]
    InvalidBody(String),

    #[error("{0}")]
    ValidationError(String),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    // Model errors
    #[error("model artifacts are not loaded")]
    ModelNotLoaded,

    #[error(transparent)]
    Inference(#[from] InferenceError),

    // Generic errors
    #[error("{0}")]
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::ModelNotLoaded | AppError::InternalError(_) => {
                tracing::error!("Error during request: {}", self);
            }
            _ => tracing::warn!("Error during prediction: {}", self),
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_error_is_500_with_message() {
        let errors = [
            AppError::ModelNotLoaded,
            AppError::InvalidBody("bad json".to_string()),
            AppError::Encoding(EncodingError::WrongLength { expected: 11, actual: 2 }),
            AppError::Inference(InferenceError::NonFinite),
        ];

        for err in errors {
            let message = err.to_string();
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(body, json!({ "error": message }));
        }
    }
}
