//! Server configuration, loaded from environment variables at startup.

use coach_core::CompletionParams;
use coach_core::completion::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Signing secret used when `COACH_SECRET_KEY` is unset. Not safe outside
/// local development.
pub const DEFAULT_SECRET_KEY: &str = "dev_secret_change_me";

/// Runtime configuration for coach-server.
///
/// Every field has a default so the server starts without any environment
/// variables set; chat requests then fail until `OPENAI_API_KEY` is provided.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"127.0.0.1:5000"`).
    pub bind_address: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Credential for the completion API. Blank values count as unset.
    pub openai_api_key: Option<String>,

    /// Root URL of the completion API.
    pub openai_base_url: String,

    /// Model identifier sent with every completion.
    pub model: String,

    /// Token budget for each reply.
    pub max_output_tokens: u32,

    /// Sampling temperature.
    pub temperature: f32,

    /// Secret used to sign session cookies.
    pub secret_key: String,

    /// Lifetime of a login session in seconds.
    pub session_ttl_secs: u64,

    /// Comma-separated list of allowed CORS origins; `None` allows any.
    pub cors_allowed_origins: Option<String>,

    /// Serve the OpenAPI document at `/api-docs/openapi.json`.
    pub enable_openapi: bool,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build [`Config`] from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            bind_address: var("COACH_BIND", "127.0.0.1:5000"),
            log_level: var("COACH_LOG", "info"),
            log_json: parse_bool(lookup("COACH_LOG_JSON"), false),
            openai_api_key: non_blank("OPENAI_API_KEY"),
            openai_base_url: var("OPENAI_BASE_URL", DEFAULT_BASE_URL),
            model: var("COACH_MODEL", DEFAULT_MODEL),
            max_output_tokens: parse_or(lookup("COACH_MAX_OUTPUT_TOKENS"), 500),
            temperature: parse_or(lookup("COACH_TEMPERATURE"), 0.7),
            secret_key: non_blank("COACH_SECRET_KEY")
                .unwrap_or_else(|| DEFAULT_SECRET_KEY.to_owned()),
            session_ttl_secs: parse_or(lookup("COACH_SESSION_TTL_SECS"), 31 * 24 * 60 * 60),
            cors_allowed_origins: non_blank("COACH_CORS_ORIGINS"),
            enable_openapi: parse_bool(lookup("COACH_ENABLE_OPENAPI"), true),
        }
    }

    pub fn completion_params(&self) -> CompletionParams {
        CompletionParams {
            model: self.model.clone(),
            max_output_tokens: self.max_output_tokens,
            temperature: self.temperature,
        }
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    value
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
