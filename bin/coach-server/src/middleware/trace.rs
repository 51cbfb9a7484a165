use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::BodyExt;
use std::time::Instant;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::error::ServerError;

pub static X_TRACE_ID: &str = "x-trace-id";

/// Bodies larger than this are summarised instead of logged.
const MAX_LOGGED_BODY: usize = 1024;

/// Wrap every request in an `http_request` span carrying a trace ID.
///
/// The ID is taken from an incoming `x-trace-id` header when it is a valid
/// UUID, generated otherwise, and echoed on the response.
pub async fn trace_middleware(req: Request<Body>, next: Next) -> Response {
    let start_time = Instant::now();

    let trace_id = req
        .headers()
        .get(X_TRACE_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        info!("→ request started");
        let header_value = HeaderValue::from_str(&trace_id.to_string()).ok();

        let (parts, body) = req.into_parts();
        let response = match buffer_and_log("request", &parts.headers, body).await {
            Ok(req_bytes) => {
                let mut req = Request::from_parts(parts, Body::from(req_bytes));
                if let Some(v) = &header_value {
                    req.headers_mut().insert(X_TRACE_ID, v.clone());
                }
                next.run(req).await
            }
            Err(e) => {
                ServerError::BadRequest(format!("failed to read request body: {e}")).into_response()
            }
        };

        let (parts, body) = response.into_parts();
        let res_bytes = buffer_and_log("response", &parts.headers, body)
            .await
            .unwrap_or_default();
        let mut response = Response::from_parts(parts, Body::from(res_bytes));
        if let Some(v) = header_value {
            response.headers_mut().insert(X_TRACE_ID, v);
        }

        info!(
            status = response.status().as_u16(),
            latency_ms = start_time.elapsed().as_millis(),
            "← response finished"
        );
        response
    }
    .instrument(span)
    .await
}

/// Collect a body and log it at `debug` when it is small JSON.
///
/// A body that fails mid-stream is logged at `warn` and returned as the error.
async fn buffer_and_log(
    direction: &str,
    headers: &header::HeaderMap,
    body: Body,
) -> Result<Bytes, axum::Error> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let is_json = content_type.contains("application/json");

    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(error = %e, "failed to read {} body", direction);
            return Err(e);
        }
    };

    if is_json && bytes.len() < MAX_LOGGED_BODY {
        if let Ok(text) = std::str::from_utf8(&bytes) {
            debug!("{} body: {}", direction, text);
        }
    } else if !bytes.is_empty() {
        debug!("{} body: [skipped: type={}, size={}]", direction, content_type, bytes.len());
    }

    Ok(bytes)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use axum::Router;
    use axum::http::Request;
    use axum::http::StatusCode;
    use axum::routing::post;
    use http_body_util::Limited;
    use tower::ServiceExt;
    use tracing_test::traced_test;

    fn app() -> Router {
        Router::new()
            .route("/echo", post(|body: String| async move { body }))
            .layer(axum::middleware::from_fn(trace_middleware))
    }

    #[tokio::test]
    async fn generates_trace_id_and_keeps_body() {
        let resp = app()
            .oneshot(Request::post("/echo").body(Body::from("ping")).unwrap())
            .await
            .unwrap();

        let id = resp.headers().get(X_TRACE_ID).unwrap().to_str().unwrap().to_owned();
        assert!(Uuid::parse_str(&id).is_ok());
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ping");
    }

    #[tokio::test]
    async fn reuses_incoming_trace_id() {
        let id = Uuid::new_v4().to_string();
        let resp = app()
            .oneshot(
                Request::post("/echo")
                    .header(X_TRACE_ID, &id)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.headers().get(X_TRACE_ID).unwrap(), id.as_str());
    }

    #[tokio::test]
    #[traced_test]
    async fn unreadable_request_body_is_rejected_before_the_handler() {
        let failing = Body::new(Limited::new(Body::from("more than four bytes"), 4));
        let resp = app()
            .oneshot(Request::post("/echo").body(failing).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(resp.headers().contains_key(X_TRACE_ID));
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let text = std::str::from_utf8(&body).unwrap();
        assert!(text.contains("failed to read request body"), "got {text}");
        assert!(logs_contain("failed to read request body"));
    }
}
