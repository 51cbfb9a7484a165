use thiserror::Error;

/// The completion API could not produce a response.
///
/// An upstream call that succeeds but carries no usable text is *not* an
/// error; the client returns an empty string for that case.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connecting, sending or reading the body failed.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-2xx status (bad key, rate limit, ...).
    #[error("completion API returned {status}: {message}")]
    Status { status: u16, message: String },

    /// No credential was configured for the completion API.
    #[error("completion API key is not configured (set OPENAI_API_KEY)")]
    MissingApiKey,
}

/// Failure of a single chat exchange.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The user message was absent or only whitespace.
    #[error("Empty message")]
    EmptyMessage,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}
