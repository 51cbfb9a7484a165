//! Conversation data model shared by the formatter, the chat exchange and the
//! HTTP layer.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Author of a [`ChatTurn`].
///
/// Unknown tags supplied by a client are kept in [`Role::Other`] so that the
/// history can be echoed back exactly as it was received.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    System,
    #[default]
    User,
    Assistant,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Other(tag) => tag,
        }
    }

    /// Tag written in front of a formatted prompt line.
    ///
    /// Anything that is neither `system` nor `assistant` is rendered as a
    /// user line.
    pub fn prompt_tag(&self) -> &'static str {
        match self {
            Role::System => "[system]",
            Role::Assistant => "[assistant]",
            Role::User | Role::Other(_) => "[user]",
        }
    }
}

impl From<String> for Role {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "system" => Role::System,
            "user" => Role::User,
            "assistant" => Role::Assistant,
            _ => Role::Other(tag),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(tag) => tag,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatTurn {
    /// `"system"`, `"user"` or `"assistant"`; defaults to `"user"`.
    #[serde(default)]
    #[schema(value_type = String, example = "user")]
    pub role: Role,
    /// Message text; defaults to the empty string.
    #[serde(default)]
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Ordered, append-only conversation supplied by the client on every request.
pub type ConversationHistory = Vec<ChatTurn>;

// ── Tests ──────────────────────────────────────────────────────────────────────
