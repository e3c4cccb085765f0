//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let docs_routes = Router::new()
        .route("/api/docs/categories", get(handlers::docs::get_categories))
        .route("/api/docs/category", get(handlers::docs::get_category))
        .route("/api/docs/file", get(handlers::docs::get_file))
        .route(
            "/api/docs/cache/invalidate",
            post(handlers::docs::invalidate_cache),
        );

    Router::new()
        .merge(docs_routes)
        .route("/api/retrieve", get(handlers::retrieve::retrieve))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use axum::response::Response;
    use pretty_assertions::assert_eq;
    use serde_json::Value;
    use tower::ServiceExt;
    use ward_docs::{DocsLibrary, LibraryConfig};
    use ward_storage::{MockStorage, Storage};

    use super::*;
    use crate::state::RetrieveState;

    fn tagged(name: &str, category: &str, parent: bool, body: &str) -> String {
        format!(
            "<file><file:name val=\"{name}\"><file:category isParent=\"{parent}\" val=\"{category}\"></file><content>{body}</content>"
        )
    }

    fn docs_storage() -> MockStorage {
        MockStorage::new()
            .with_file(
                "commands/index.md",
                tagged("Commands", "commands", true, "# Commands\n\nAll commands."),
            )
            .with_file(
                "commands/auto mod.md",
                tagged("Auto Mod", "commands", false, "Filters **spam**."),
            )
            .with_file(
                "setup/intro.md",
                tagged("Intro", "setup", false, "See {{file.name}}."),
            )
    }

    fn router_with(storage: MockStorage, assets_dir: PathBuf) -> Router {
        let storage: Arc<dyn Storage> = Arc::new(storage);
        create_router(Arc::new(AppState {
            library: DocsLibrary::new(storage, LibraryConfig::default()),
            retrieve: RetrieveState {
                assets_dir,
                allowed: vec!["/legal/privacy.md".to_owned(), "/legal/terms.md".to_owned()],
            },
            version: "test".to_owned(),
        }))
    }

    fn router() -> Router {
        router_with(docs_storage(), PathBuf::from("/nonexistent"))
    }

    async fn send(router: Router, request: Request<Body>) -> Response {
        router.oneshot(request).await.unwrap()
    }

    async fn get(router: Router, uri: &str) -> Response {
        send(router, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_categories() {
        let response = get(router(), "/api/docs/categories").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "public, max-age=300, s-maxage=300"
        );
        let json = json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["count"], 2);
        assert_eq!(json["categories"][0]["name"], "commands");
        assert_eq!(json["categories"][0]["fileCount"], 2);
        assert_eq!(json["categories"][1]["title"], "Setup");
    }

    #[tokio::test]
    async fn test_security_headers() {
        let response = get(router(), "/api/docs/categories").await;

        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
        assert_eq!(response.headers()["x-frame-options"], "DENY");
        assert!(response.headers().contains_key("content-security-policy"));
    }

    #[tokio::test]
    async fn test_missing_root_is_not_found() {
        let response = get(
            router_with(MockStorage::new().without_root(), PathBuf::from("/nonexistent")),
            "/api/docs/categories",
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "No Categories found");
    }

    #[tokio::test]
    async fn test_category_renders_parent() {
        let response = get(router(), "/api/docs/category?category=commands").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["category"]["parentFile"]["name"], "Commands");
        assert_eq!(json["content"], "# Commands\n\nAll commands.");
        assert!(json["html"].as_str().unwrap().starts_with("<h1 "));
        assert_eq!(json["fragments"][0]["type"], "html");
    }

    #[tokio::test]
    async fn test_category_without_parent_has_empty_content() {
        let json = json_body(get(router(), "/api/docs/category?category=setup").await).await;

        assert_eq!(json["content"], "");
        assert_eq!(json["html"], "");
        assert!(json["category"]["parentFile"].is_null());
    }

    #[tokio::test]
    async fn test_unknown_category() {
        let response = get(router(), "/api/docs/category?category=nope").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "Category 'nope' not found");
    }

    #[tokio::test]
    async fn test_category_parameter_required() {
        let response = get(router(), "/api/docs/category").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_file_tolerant_lookup() {
        let response = get(router(), "/api/docs/file?category=commands&file=auto-mod").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(header::ETAG));
        let json = json_body(response).await;
        assert_eq!(json["file"]["name"], "Auto Mod");
        assert_eq!(json["file"]["filePath"], "commands/auto mod.md");
        assert_eq!(
            json["html"],
            r#"<p class="mb-4">Filters <strong class="font-bold">spam</strong>.</p>"#
        );
    }

    #[tokio::test]
    async fn test_file_placeholder_substituted() {
        let json = json_body(get(router(), "/api/docs/file?category=setup&file=intro.md").await).await;

        assert_eq!(json["file"]["content"], "See Intro.");
    }

    #[tokio::test]
    async fn test_file_etag_not_modified() {
        let first = get(router(), "/api/docs/file?category=commands&file=auto-mod").await;
        let etag = first.headers()[header::ETAG].clone();

        let request = Request::get("/api/docs/file?category=commands&file=auto-mod")
            .header(header::IF_NONE_MATCH, etag)
            .body(Body::empty())
            .unwrap();
        let response = send(router(), request).await;

        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_file_errors() {
        let missing = get(router(), "/api/docs/file?category=commands").await;
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

        let unknown = get(router(), "/api/docs/file?category=commands&file=kick").await;
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalidate_cache() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/docs/cache/invalidate")
            .body(Body::empty())
            .unwrap();
        let response = send(router(), request).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, serde_json::json!({"success": true}));
    }

    #[tokio::test]
    async fn test_retrieve_allowlisted_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("legal")).unwrap();
        std::fs::write(dir.path().join("legal/privacy.md"), "# Privacy").unwrap();
        let router = router_with(docs_storage(), dir.path().to_path_buf());

        let response = get(router, "/api/retrieve?file=/legal/privacy.md").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/")
        );
        assert!(response.headers().contains_key(header::LAST_MODIFIED));
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"# Privacy");
    }

    #[tokio::test]
    async fn test_retrieve_errors() {
        let dir = tempfile::tempdir().unwrap();
        let router = router_with(docs_storage(), dir.path().to_path_buf());

        let missing = get(router.clone(), "/api/retrieve").await;
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

        let forbidden = get(router.clone(), "/api/retrieve?file=/../Cargo.toml").await;
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

        let unreadable = get(router, "/api/retrieve?file=/legal/terms.md").await;
        assert_eq!(unreadable.status(), StatusCode::NOT_FOUND);
    }
}
