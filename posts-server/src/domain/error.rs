use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::domain::post::PostId;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("post with id {0} not found")]
    PostNotFound(PostId),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::Validation(errors.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::PostNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            DomainError::Internal(cause) => {
                error!(%cause, "request failed");
                "internal error".to_string()
            }
            other => other.to_string(),
        };
        let details = match self {
            DomainError::PostNotFound(id) => Some(json!({ "resource": "post", "id": id })),
            _ => None,
        };
        let body = ErrorBody {
            error: message.as_str(),
            details,
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<DomainError> for tonic::Status {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::PostNotFound(id) => {
                tonic::Status::not_found(format!("post with id {id} not found"))
            }
            DomainError::Validation(msg) => tonic::Status::invalid_argument(msg),
            DomainError::Internal(cause) => {
                error!(%cause, "rpc failed");
                tonic::Status::internal("internal error")
            }
        }
    }
}
