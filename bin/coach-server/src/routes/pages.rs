//! Login, logout and the session-gated HTML pages.
//!
//! "Login" only records a display name: there is no password and any name
//! is accepted.

use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::{HeaderMap, header};
use axum::middleware;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Extension, Form, Router};
use minijinja::context;
use serde::Deserialize;
use tracing::info;

use crate::error::ServerError;
use crate::middleware::auth::{self, current_session};
use crate::session::{self, SessionRecord};
use crate::state::AppState;

/// Name used when the login form is submitted blank.
pub const DEFAULT_USER: &str = "Guest";

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: Option<String>,
}

/// Register page routes; `/home` and `/chat` require a session.
pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let protected = Router::new()
        .route("/home", get(home))
        .route("/chat", get(chat_page))
        .route_layer(middleware::from_fn_with_state(state, auth::require_session));

    Router::new()
        .route("/", get(login_page).post(login))
        .route("/logout", get(logout))
        .merge(protected)
}

async fn login_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    if current_session(&state, &headers).is_some() {
        return Ok(Redirect::to("/home").into_response());
    }
    let html = state.templates.render("login.html", context! {})?;
    Ok(Html(html).into_response())
}

async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Response {
    if current_session(&state, &headers).is_some() {
        return Redirect::to("/home").into_response();
    }

    let form = form.map(|Form(f)| f).unwrap_or_default();
    let user = display_name(form.username);
    let cookie = state.sessions.create(&user);
    info!(user = %user, "session started");

    (
        [(header::SET_COOKIE, session::set_cookie(&cookie, state.sessions.ttl()))],
        Redirect::to("/home"),
    )
        .into_response()
}

/// Expire the cookie. The session lives only in the cookie, so there is
/// nothing to remove on the server.
async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(record) = current_session(&state, &headers) {
        info!(user = %record.user, "session ended");
    }
    ([(header::SET_COOKIE, session::clear_cookie())], Redirect::to("/")).into_response()
}

async fn home(
    State(state): State<Arc<AppState>>,
    Extension(record): Extension<SessionRecord>,
) -> Result<Html<String>, ServerError> {
    let html = state.templates.render("index.html", context! { user => record.user })?;
    Ok(Html(html))
}

async fn chat_page(
    State(state): State<Arc<AppState>>,
    Extension(record): Extension<SessionRecord>,
) -> Result<Html<String>, ServerError> {
    let html = state.templates.render("chat.html", context! { user => record.user })?;
    Ok(Html(html))
}

fn display_name(username: Option<String>) -> String {
    username
        .map(|u| u.trim().to_owned())
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| DEFAULT_USER.to_owned())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::state::test_support::{Canned, app_with, body_string, state_with};

    fn app() -> Router {
        app_with(Canned::new("unused"))
    }

    async fn get_page(app: &Router, path: &str, cookie: Option<&str>) -> Response {
        let mut req = Request::get(path);
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        app.clone().oneshot(req.body(Body::empty()).unwrap()).await.unwrap()
    }

    /// Submit the login form and return the `name=value` cookie pair.
    async fn log_in(app: &Router, form: &'static str) -> String {
        let resp = app
            .clone()
            .oneshot(
                Request::post("/")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(form))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()[header::LOCATION], "/home");

        let set_cookie = resp.headers()[header::SET_COOKIE].to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_owned()
    }

    fn location(resp: &Response) -> &str {
        resp.headers()[header::LOCATION].to_str().unwrap()
    }

    #[test]
    fn blank_names_become_guest() {
        assert_eq!(display_name(None), "Guest");
        assert_eq!(display_name(Some("   ".into())), "Guest");
        assert_eq!(display_name(Some(" Ada ".into())), "Ada");
    }

    #[tokio::test]
    async fn login_page_renders_without_session() {
        let resp = get_page(&app(), "/", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_string(resp).await.contains("name=\"username\""));
    }

    #[tokio::test]
    async fn protected_pages_redirect_to_login() {
        let app = app();
        for path in ["/home", "/chat"] {
            let resp = get_page(&app, path, None).await;
            assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{path}");
            assert_eq!(location(&resp), "/");
        }
    }

    #[tokio::test]
    async fn login_grants_access_to_pages() {
        let app = app();
        let cookie = log_in(&app, "username=Ada").await;

        let home = get_page(&app, "/home", Some(&cookie)).await;
        assert_eq!(home.status(), StatusCode::OK);
        assert!(body_string(home).await.contains("Welcome, Ada!"));

        let chat = get_page(&app, "/chat", Some(&cookie)).await;
        assert_eq!(chat.status(), StatusCode::OK);
        assert!(body_string(chat).await.contains("/chat_api"));

        let login = get_page(&app, "/", Some(&cookie)).await;
        assert_eq!(login.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&login), "/home");
    }

    #[tokio::test]
    async fn empty_form_logs_in_as_guest() {
        let app = app();
        let cookie = log_in(&app, "username=").await;
        let home = get_page(&app, "/home", Some(&cookie)).await;
        assert!(body_string(home).await.contains("Welcome, Guest!"));
    }

    #[tokio::test]
    async fn tampered_cookie_is_ignored() {
        let app = app();
        let cookie = log_in(&app, "username=Ada").await;
        let forged = format!("{}0", cookie.trim_end_matches(|c: char| c.is_ascii_hexdigit()));

        let resp = get_page(&app, "/home", Some(&forged)).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn logout_ends_the_session() {
        let app = app();
        let cookie = log_in(&app, "username=Ada").await;

        let resp = get_page(&app, "/logout", Some(&cookie)).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/");
        let cleared = resp.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cleared.starts_with("coach_session=;"));
        assert!(cleared.contains("Max-Age=0"));

        let home = get_page(&app, "/home", None).await;
        assert_eq!(home.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn session_survives_a_server_restart() {
        let cookie = log_in(&app(), "username=Ada").await;

        let restarted = app();
        let home = get_page(&restarted, "/home", Some(&cookie)).await;
        assert_eq!(home.status(), StatusCode::OK);
        assert!(body_string(home).await.contains("Welcome, Ada!"));
    }

    #[tokio::test]
    async fn repeated_logins_share_one_signer_without_state() {
        let state = state_with(Canned::new("unused"));
        let app = crate::routes::build(state.clone());

        let mut cookies = Vec::new();
        for i in 0..500 {
            cookies.push(log_in(&app, if i % 2 == 0 { "username=x" } else { "username=y" }).await);
        }

        // Every cookie is self-contained: verifying needs only the signer.
        for cookie in &cookies {
            let value = cookie.trim_start_matches("coach_session=");
            assert!(state.sessions.lookup(value).is_some());
        }
        assert_eq!(format!("{:?}", state.sessions), "SessionSigner(ttl 2678400s)");
    }

    #[tokio::test]
    async fn cookie_signed_with_another_secret_is_ignored() {
        let other = crate::session::SessionSigner::new("not-the-secret", std::time::Duration::from_secs(60));
        let cookie = format!("coach_session={}", other.create("Ada"));

        let resp = get_page(&app(), "/home", Some(&cookie)).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    }
}
