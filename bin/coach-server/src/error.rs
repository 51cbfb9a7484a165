//! Unified server error type.
//!
//! Handlers return `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors become a JSON body of the form
//! `{"error": "<message>"}` with the matching status code. Server-side
//! failures keep their message text in the body so the chat page can show
//! what went wrong upstream.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use coach_core::{ChatError, UpstreamError};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};
use utoipa::ToSchema;

/// All errors that can occur in the coach-server request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The caller sent an empty or malformed request.
    #[error("{0}")]
    BadRequest(String),

    /// The completion API call failed.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// A page template failed to render.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// An unclassified internal server error.
    #[error("{0}")]
    Internal(String),
}

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<ChatError> for ServerError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::EmptyMessage => ServerError::BadRequest(ChatError::EmptyMessage.to_string()),
            ChatError::Upstream(inner) => ServerError::Upstream(inner),
        }
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(e: anyhow::Error) -> Self {
        error!(error = ?e, "converting anyhow error to ServerError::Internal");
        ServerError::Internal(e.to_string())
    }
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Upstream(_) | ServerError::Template(_) | ServerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ServerError::BadRequest(m) => warn!(message = %m, "rejected request"),
            ServerError::Upstream(e) => error!(error = %e, "completion API error"),
            ServerError::Template(e) => error!(error = %e, "template render failed"),
            ServerError::Internal(m) => error!(message = %m, "internal server error"),
        }
        let body = ErrorResponse { error: self.to_string() };
        (status, Json(body)).into_response()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
