use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tonic::{Code, Status};

#[derive(Debug, Error)]
pub enum PostsClientError {
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("gRPC transport error: {0}")]
    GrpcError(#[from] tonic::transport::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Server error ({status}): {message}")]
    Server { status: String, message: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl PostsClientError {
    pub(crate) async fn from_http_response(resp: reqwest::Response) -> Self {
        let status = resp.status();
        match resp.text().await {
            Ok(body) => Self::from_http_parts(status, &body),
            Err(err) => Self::RequestError(err),
        }
    }

    pub(crate) fn from_http_parts(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.error)
            .unwrap_or_else(|_| body.trim().to_string());

        match status {
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                Self::InvalidRequest(message)
            }
            other => Self::Server {
                status: other.to_string(),
                message,
            },
        }
    }
}

impl From<Status> for PostsClientError {
    fn from(status: Status) -> Self {
        let message = status.message().to_string();
        match status.code() {
            Code::NotFound => Self::NotFound(message),
            Code::InvalidArgument => Self::InvalidRequest(message),
            code => Self::Server {
                status: format!("{code:?}"),
                message,
            },
        }
    }
}
