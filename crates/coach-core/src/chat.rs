//! One chat exchange: validate, prompt, complete, append.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::ToSchema;

use crate::completion::CompletionClient;
use crate::error::ChatError;
use crate::format::build_prompt;
use crate::types::{ChatTurn, ConversationHistory};

/// Reply used when the model answered with no text.
pub const FALLBACK_REPLY: &str = "Sorry—I didn't catch that. Could you try again?";

/// Result of a successful exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatExchange {
    /// The assistant's reply (or [`FALLBACK_REPLY`]).
    pub reply: String,
    /// The caller's history with the user message and the reply appended.
    pub messages: Vec<ChatTurn>,
}

/// Run one exchange against `client`.
///
/// `message` is trimmed; if nothing is left the call fails with
/// [`ChatError::EmptyMessage`] before the client is touched. An empty reply
/// from the client is replaced by [`FALLBACK_REPLY`].
pub async fn exchange(
    client: &dyn CompletionClient,
    persona: &str,
    history: ConversationHistory,
    message: &str,
) -> Result<ChatExchange, ChatError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(ChatError::EmptyMessage);
    }

    let prompt = build_prompt(persona, &history, message);
    debug!(history_len = history.len(), prompt_len = prompt.len(), "chat prompt built");

    let text = client.complete(&prompt).await?;
    let reply = if text.trim().is_empty() {
        info!("completion returned no text; using fallback reply");
        FALLBACK_REPLY.to_owned()
    } else {
        text
    };

    let mut messages = history;
    messages.push(ChatTurn::user(message));
    messages.push(ChatTurn::assistant(reply.clone()));

    Ok(ChatExchange { reply, messages })
}

// ── Tests ──────────────────────────────────────────────────────────────────────
