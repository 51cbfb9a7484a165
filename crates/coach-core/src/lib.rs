//! coach-core: conversation formatting and the completion client behind the
//! Run.AI Coach chat endpoint.
//!
//! - [`types`]: chat turns and roles
//! - [`format`]: flattening a conversation into one prompt string
//! - [`completion`]: the [`CompletionClient`] trait and the OpenAI Responses client
//! - [`chat`]: one validated request/reply exchange

pub mod chat;
pub mod completion;
pub mod error;
pub mod format;
pub mod types;

pub use chat::{ChatExchange, FALLBACK_REPLY, exchange};
pub use completion::{CompletionClient, CompletionParams, OpenAiClient};
pub use error::{ChatError, UpstreamError};
pub use format::{PERSONA, build_prompt, format_history};
pub use types::{ChatTurn, ConversationHistory, Role};
