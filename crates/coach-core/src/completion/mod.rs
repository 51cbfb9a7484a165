//! Completion client abstraction.
//!
//! [`CompletionClient`] is the seam between the chat exchange and the remote
//! text-generation service. The production implementation is
//! [`openai::OpenAiClient`]; tests substitute in-memory fakes.

pub mod openai;

use async_trait::async_trait;

use crate::error::UpstreamError;

pub use openai::OpenAiClient;

/// Model parameters sent with every completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionParams {
    /// Model identifier, e.g. `"gpt-4o-mini"`.
    pub model: String,
    /// Upper bound on generated tokens.
    pub max_output_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            model: openai::DEFAULT_MODEL.to_owned(),
            max_output_tokens: 500,
            temperature: 0.7,
        }
    }
}

/// Turns one flat prompt into the model's reply text.
#[async_trait]
pub trait CompletionClient: Send + Sync + 'static {
    /// Send `prompt` and return the trimmed reply.
    ///
    /// Returns `Ok("")` when the call succeeded but no text could be
    /// extracted from the response.
    async fn complete(&self, prompt: &str) -> Result<String, UpstreamError>;
}
