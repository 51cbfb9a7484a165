//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use coach_core::CompletionClient;

use crate::config::Config;
use crate::session::SessionSigner;
use crate::templates::Templates;

/// State shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Issues and verifies login session cookies.
    pub sessions: Arc<SessionSigner>,
    /// Completion API used by the chat endpoint.
    pub completion: Arc<dyn CompletionClient>,
    /// Compiled page templates.
    pub templates: Arc<Templates>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}

/// Fakes and helpers shared by the route tests.
#[cfg(test)]
pub mod test_support {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::Router;
    use axum::body::Body;
    use axum::http::Response;
    use coach_core::UpstreamError;
    use http_body_util::BodyExt;

    use super::*;

    /// Completion client returning a fixed reply and recording prompts.
    pub struct Canned {
        reply: String,
        pub prompts: Mutex<Vec<String>>,
    }

    impl Canned {
        pub fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self { reply: reply.into(), prompts: Mutex::new(Vec::new()) })
        }

        pub fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionClient for Canned {
        async fn complete(&self, prompt: &str) -> Result<String, UpstreamError> {
            self.prompts.lock().unwrap().push(prompt.to_owned());
            Ok(self.reply.clone())
        }
    }

    /// Completion client that always fails with an upstream status error.
    pub struct Failing(pub &'static str);

    #[async_trait]
    impl CompletionClient for Failing {
        async fn complete(&self, _prompt: &str) -> Result<String, UpstreamError> {
            Err(UpstreamError::Status { status: 503, message: self.0.to_owned() })
        }
    }

    pub fn state_with(completion: Arc<dyn CompletionClient>) -> Arc<AppState> {
        let config = Config::from_lookup(|_| None);
        Arc::new(AppState {
            sessions: Arc::new(SessionSigner::new(
                config.secret_key.clone(),
                Duration::from_secs(config.session_ttl_secs),
            )),
            config: Arc::new(config),
            completion,
            templates: Arc::new(Templates::new().unwrap()),
        })
    }

    pub fn app_with(completion: Arc<dyn CompletionClient>) -> Router {
        crate::routes::build(state_with(completion))
    }

    pub async fn body_string(resp: Response<Body>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    pub async fn body_json(resp: Response<Body>) -> serde_json::Value {
        serde_json::from_str(&body_string(resp).await).unwrap()
    }
}
