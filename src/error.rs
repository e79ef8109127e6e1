//! Error types for the docling-gateway library.
//!
//! Two error types reflect two layers:
//!
//! * [`GatewayError`]: what a caller of the HTTP surface sees. Every variant
//!   maps to exactly one status code via [`GatewayError::status`] and renders
//!   as `{"detail": "<message>"}`.
//!
//! * [`ConvertError`]: what the external document converter reports. The
//!   gateway wraps it into [`GatewayError::ParseFailed`] or
//!   [`GatewayError::TextExtractionFailed`] depending on the route.
//!
//! Transient-file cleanup failures never surface as either type; they are
//! logged and dropped in [`crate::pipeline::stage`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::path::PathBuf;
use thiserror::Error;

/// All errors surfaced by the gateway operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    // ── Client errors (400) ───────────────────────────────────────────────
    /// Declared or fetched content type is not on the allow-list.
    #[error("Unsupported file type: {content_type}")]
    UnsupportedFileType { content_type: String },

    /// The remote document could not be fetched.
    #[error("Error fetching file from URL: {reason}")]
    FetchFailed { url: String, reason: String },

    /// The remote fetch exceeded the configured timeout.
    #[error("Error fetching file from URL: request to '{url}' timed out after {secs}s")]
    FetchTimeout { url: String, secs: u64 },

    // ── Request-shape errors (413, 422) ───────────────────────────────────
    /// The request body exceeded the configured limit.
    #[error("Upload exceeds the {limit} byte limit")]
    UploadTooLarge { limit: usize },

    /// The request body is missing a required part or field.
    #[error("{0}")]
    InvalidRequest(String),

    // ── Server errors (500) ───────────────────────────────────────────────
    /// The converter failed on a `/parse` or `/parse-url` request.
    #[error("Error parsing document: {0}")]
    ParseFailed(#[source] ConvertError),

    /// The converter failed on a `/parse-text` request.
    #[error("Error extracting text: {0}")]
    TextExtractionFailed(#[source] ConvertError),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

}

impl GatewayError {
    /// HTTP status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::UnsupportedFileType { .. }
            | GatewayError::FetchFailed { .. }
            | GatewayError::FetchTimeout { .. } => StatusCode::BAD_REQUEST,
            GatewayError::UploadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GatewayError::ParseFailed(_)
            | GatewayError::TextExtractionFailed(_)
            | GatewayError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True for errors caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }
}

/// Body of every error response.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{self}");
        } else {
            tracing::warn!("{self}");
        }
        (
            status,
            Json(ErrorBody {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Failure reported by a [`crate::converter::DocumentConverter`].
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The converter executable could not be started.
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The converter ran but reported a failure.
    #[error("{0}")]
    Failed(String),

    /// Staging the document or reading converter scratch files failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The converter produced output that could not be interpreted.
    #[error("malformed converter output: {0}")]
    Malformed(String),
}
