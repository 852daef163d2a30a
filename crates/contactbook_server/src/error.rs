//! HTTP error mapping.
//!
//! # Responsibility
//! - Translate core errors into status codes and `{"error": ...}` bodies.
//! - Keep storage detail out of response bodies while still handing it to the
//!   request logger.
//!
//! # Invariants
//! - 5xx bodies only ever contain a fixed message from `messages`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contactbook_core::messages;
use contactbook_core::{ContactServiceError, FieldErrors};
use serde_json::json;

/// Server-side detail for a failed request, attached as a response extension
/// so the request logger can report it next to the method and path.
#[derive(Debug, Clone)]
pub struct FaultDetail(pub String);

#[derive(Debug)]
pub enum ApiError {
    BadRequest(&'static str),
    Validation(FieldErrors),
    NotFound(&'static str),
    /// Storage or runtime failure; `message` goes to the client, `detail` to logs.
    Internal {
        message: &'static str,
        detail: String,
    },
}

impl ApiError {
    /// Maps a service failure; `storage_message` is used for storage faults.
    pub fn from_service(err: ContactServiceError, storage_message: &'static str) -> Self {
        match err {
            ContactServiceError::Validation(errors) => Self::Validation(errors),
            ContactServiceError::Repo(err) => Self::Internal {
                message: storage_message,
                detail: err.to_string(),
            },
            other if other.client_status() == 404 => {
                Self::NotFound(other.client_message(storage_message))
            }
            other => Self::BadRequest(other.client_message(storage_message)),
        }
    }

    pub fn internal(message: &'static str, detail: impl Into<String>) -> Self {
        Self::Internal {
            message,
            detail: detail.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::BadRequest(message) | Self::NotFound(message) => {
                (status, Json(json!({ "error": message }))).into_response()
            }
            Self::Validation(errors) => (
                status,
                Json(json!({ "error": messages::VALIDATION_FAILED, "details": errors })),
            )
                .into_response(),
            Self::Internal { message, detail } => {
                let mut response = (status, Json(json!({ "error": message }))).into_response();
                response.extensions_mut().insert(FaultDetail(detail));
                response
            }
        }
    }
}
