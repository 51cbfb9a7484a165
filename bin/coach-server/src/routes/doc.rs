use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::routes::{chat, health};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(info(
    title = "coach-server",
    description = "Run.AI Coach HTTP API",
    version = "0.1.0"
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(chat::ChatApi::openapi());
    root.merge(health::HealthApi::openapi());
    root
}

/// Serve the OpenAPI document at `/api-docs/openapi.json`.
pub fn router() -> Router<Arc<AppState>> {
    let docs = get_docs();
    Router::new().route(
        "/api-docs/openapi.json",
        get(move || {
            let docs = docs.clone();
            async move { Json(docs) }
        }),
    )
}

#[cfg(test)]
mod test {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::state::test_support::{Canned, app_with, body_json};

    #[test]
    fn docs_cover_every_api_path() {
        let docs = get_docs();
        assert!(docs.paths.paths.contains_key("/chat_api"));
        assert!(docs.paths.paths.contains_key("/health"));
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let resp = app_with(Canned::new("unused"))
            .oneshot(Request::get("/api-docs/openapi.json").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["info"]["title"], "coach-server");
    }
}
