//! Client for the OpenAI Responses API (`POST /v1/responses`).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{CompletionClient, CompletionParams};
use crate::error::UpstreamError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// [`CompletionClient`] backed by the Responses API.
///
/// The whole conversation is sent as a single `input` string. No timeout is
/// configured on the underlying client and failed calls are not retried.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    params: CompletionParams,
}

impl OpenAiClient {
    /// Create a client against [`DEFAULT_BASE_URL`].
    ///
    /// A missing `api_key` is accepted here; every call then fails with
    /// [`UpstreamError::MissingApiKey`].
    pub fn new(api_key: Option<String>, params: CompletionParams) -> Self {
        let client = Client::builder()
            .user_agent(concat!("coach-core/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key,
            params,
        }
    }

    /// Point the client at another API root (proxy, compatible server, test fake).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn params(&self) -> &CompletionParams {
        &self.params
    }

    /// Full URL of the Responses endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/responses", self.base_url)
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, UpstreamError> {
        let api_key = self.api_key.as_deref().ok_or(UpstreamError::MissingApiKey)?;

        let body = ResponsesRequest {
            model: &self.params.model,
            input: prompt,
            max_output_tokens: self.params.max_output_tokens,
            temperature: self.params.temperature,
        };
        debug!(model = %self.params.model, prompt_len = prompt.len(), "sending completion request");

        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            warn!(status = status.as_u16(), %message, "completion API returned an error");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let reply = match serde_json::from_str::<ResponseEnvelope>(&text) {
            Ok(envelope) => envelope.reply_text(),
            Err(e) => {
                warn!(error = %e, "completion response could not be decoded; treating as empty");
                String::new()
            }
        };
        debug!(reply_len = reply.len(), "completion received");
        Ok(reply)
    }
}

// ── Wire types ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a str,
    max_output_tokens: u32,
    temperature: f32,
}

/// Successful response body.
///
/// Only the fields needed for text extraction are modelled. `output_text`
/// is the aggregated reply some servers and SDKs provide; `output` is the
/// structured form every Responses API server returns.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResponseEnvelope {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    /// Absent or `null` on items that carry no text (e.g. reasoning).
    #[serde(default)]
    content: Option<Vec<ContentPart>>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl ResponseEnvelope {
    /// Reply text, trimmed: `output_text` when it is non-blank, otherwise
    /// every `output_text` content part joined in order, otherwise `""`.
    pub(crate) fn reply_text(&self) -> String {
        if let Some(text) = self.output_text.as_deref().map(str::trim) {
            if !text.is_empty() {
                return text.to_owned();
            }
        }

        self.output
            .iter()
            .flat_map(|item| item.content.iter().flatten())
            .filter(|part| part.kind == "output_text")
            .filter_map(|part| part.text.as_deref())
            .collect::<String>()
            .trim()
            .to_owned()
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

// ── Tests ──────────────────────────────────────────────────────────────────────
