// error.rs
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::static_files::ResolveError;
use crate::webhook::WebhookError;

pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Request-level failures. Response bodies are fixed strings: the cause
/// of an error is logged, never sent to the caller.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid JSON payload")]
    InvalidPayload,

    #[error("invalid JSON in payment request")]
    InvalidPaymentRequest,

    #[error("signature mismatch")]
    SignatureMismatch,

    #[error("not found")]
    NotFound,

    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidPayload
            | AppError::InvalidPaymentRequest
            | AppError::SignatureMismatch => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            AppError::InvalidPayload | AppError::InvalidPaymentRequest => "Invalid JSON",
            AppError::SignatureMismatch => "Invalid signature",
            AppError::NotFound => "Not found",
            AppError::Internal(_) => "Internal Server Error",
        }
    }
}

impl From<WebhookError> for AppError {
    fn from(err: WebhookError) -> Self {
        match err {
            WebhookError::InvalidPayload(_) => AppError::InvalidPayload,
            WebhookError::SignatureMismatch => AppError::SignatureMismatch,
        }
    }
}

impl From<ResolveError> for AppError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NotFound => AppError::NotFound,
            ResolveError::Io { .. } => AppError::Internal(anyhow::Error::new(err)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let AppError::Internal(ref cause) = self {
            error!("Server error: {:#}", cause);
        }

        match self {
            AppError::InvalidPaymentRequest => (
                status,
                [(header::CONTENT_TYPE, JSON_UTF8)],
                Json(json!({ "error": self.public_message() })),
            )
                .into_response(),
            _ => (
                status,
                [(header::CONTENT_TYPE, TEXT_PLAIN)],
                self.public_message(),
            )
                .into_response(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
