use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::debug;

use crate::session::{self, SessionRecord};
use crate::state::AppState;

/// Live session for the request's cookie, if any.
pub fn current_session(state: &AppState, headers: &HeaderMap) -> Option<SessionRecord> {
    session::session_cookie(headers).and_then(|cookie| state.sessions.lookup(cookie))
}

/// Let the request through only with a live session; otherwise redirect to
/// the login page.
///
/// The resolved [`SessionRecord`] is inserted into the request extensions
/// for the handler.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match current_session(&state, req.headers()) {
        Some(record) => {
            req.extensions_mut().insert(record);
            next.run(req).await
        }
        None => {
            debug!(path = %req.uri().path(), "no session; redirecting to login");
            Redirect::to("/").into_response()
        }
    }
}
