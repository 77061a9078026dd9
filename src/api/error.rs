//! The single point where failures become HTTP responses.

use std::any::Any;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{error, warn};

use crate::contact::{ContactError, ValidationError};

/// Every way a request can fail. The `Display` text is the `error` field of
/// the JSON body and is stable per kind.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("malformed id")]
    MalformedId(String),
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("malformed payload")]
    MalformedPayload(JsonRejection),
    #[error("payload too large")]
    PayloadTooLarge(JsonRejection),
    #[error("name must be unique")]
    Conflict(String),
    #[error("person not found")]
    NotFound(String),
    #[error("unknown endpoint")]
    UnknownEndpoint,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("something went wrong")]
    Internal(String),
}

impl From<ContactError> for ApiError {
    fn from(err: ContactError) -> Self {
        match err {
            ContactError::Validation(e) => ApiError::Validation(e),
            ContactError::NotFound(id) => ApiError::NotFound(id),
            ContactError::Conflict(name) => ApiError::Conflict(name),
            ContactError::MalformedId(id) => ApiError::MalformedId(id),
            ContactError::Storage(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(rejection)
        } else {
            ApiError::MalformedPayload(rejection)
        }
    }
}

impl From<JoinError> for ApiError {
    fn from(err: JoinError) -> Self {
        ApiError::Internal(format!("store task failed: {err}"))
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MalformedId(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UnknownEndpoint => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(status = status.as_u16(), error = ?self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = ?self, "Request rejected");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Panics inside handlers end up here instead of tearing down the connection.
pub(crate) fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic".to_string());

    ApiError::Internal(detail).into_response()
}
