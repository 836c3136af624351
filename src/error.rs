use crate::storage::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use plated_template::{OwnerKeyError, ValidationError};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("No template saved for '{0}'")]
    TemplateNotFound(String),

    #[error("Malformed template payload: {0}")]
    MalformedTemplatePayload(String),

    #[error("Invalid template: {0}")]
    InvalidTemplate(#[from] ValidationError),

    #[error("Invalid recipe id: {0}")]
    InvalidOwner(#[from] OwnerKeyError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Template store read failed: {0}")]
    Store(#[from] StoreError),

    #[error("Template store write failed: {0}")]
    Persist(StoreError),

    #[error("PDF generation failed: {0}")]
    GenerationFailed(String),

    #[error("Service overloaded, please try again later")]
    ServiceOverloaded,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::TemplateNotFound(_) => {
                (StatusCode::NOT_FOUND, "TemplateNotFound", self.to_string())
            }
            Self::MalformedTemplatePayload(_) | Self::InvalidTemplate(_) => (
                StatusCode::BAD_REQUEST,
                "MalformedTemplatePayload",
                self.to_string(),
            ),
            Self::InvalidOwner(_) | Self::InvalidRequest(_) => {
                (StatusCode::BAD_REQUEST, "InvalidRequest", self.to_string())
            }
            Self::Store(_) => {
                tracing::error!("{}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "StoreReadFailure",
                    "The template store could not be read".to_string(),
                )
            }
            Self::Persist(_) => {
                tracing::error!("{}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "StorePersistenceFailure",
                    "The template could not be stored".to_string(),
                )
            }
            Self::GenerationFailed(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "GenerationFailed",
                self.to_string(),
            ),
            Self::ServiceOverloaded => (
                StatusCode::SERVICE_UNAVAILABLE,
                "ServiceOverloaded",
                self.to_string(),
            ),
            Self::Internal(_) => {
                tracing::error!("Internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalError",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
