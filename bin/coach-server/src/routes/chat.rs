//! Chat endpoint used by the chat page.
//!
//! The browser owns the conversation: every request carries the full history
//! and the response returns it with the new user/assistant pair appended.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use coach_core::{ChatTurn, PERSONA};
use tracing::info;
use utoipa::OpenApi;

use crate::error::{ErrorResponse, ServerError};
use crate::schemas::chat::{ChatApiRequest, ChatApiResponse};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(chat_api),
    components(schemas(ChatApiRequest, ChatApiResponse, ChatTurn, ErrorResponse))
)]
pub struct ChatApi;

/// Register chat routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/chat_api", post(chat_api))
}

/// Send one message to the coach (`POST /chat_api`).
///
/// The body is parsed as JSON whatever its content type.
#[utoipa::path(
    post,
    path = "/chat_api",
    tag = "chat",
    request_body = ChatApiRequest,
    responses(
        (status = 200, description = "Reply generated", body = ChatApiResponse),
        (status = 400, description = "Empty message or malformed body", body = ErrorResponse),
        (status = 500, description = "Completion API failure", body = ErrorResponse),
    )
)]
pub async fn chat_api(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ChatApiResponse>, ServerError> {
    let req: ChatApiRequest = serde_json::from_slice(&body)
        .map_err(|e| ServerError::BadRequest(format!("invalid JSON body: {e}")))?;

    let message = req.message.unwrap_or_default();
    let exchange =
        coach_core::exchange(state.completion.as_ref(), PERSONA, req.messages, &message).await?;

    info!(
        history_len = exchange.messages.len(),
        reply_len = exchange.reply.len(),
        "chat reply sent"
    );
    Ok(Json(exchange))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
