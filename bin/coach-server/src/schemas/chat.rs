use coach_core::ChatTurn;
use serde::Deserialize;
use utoipa::ToSchema;

pub use coach_core::ChatExchange as ChatApiResponse;

/// Request body for `POST /chat_api`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ChatApiRequest {
    /// The new user message; must contain non-whitespace text.
    #[serde(default)]
    pub message: Option<String>,
    /// Conversation so far, oldest first. Defaults to empty.
    #[serde(default)]
    pub messages: Vec<ChatTurn>,
}
