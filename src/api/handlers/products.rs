//! Products listing handlers.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header::{CACHE_CONTROL, ETAG};
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{ProductListParams, ProductListResponse};
use crate::app_state::AppState;
use crate::config::ParsePolicy;
use crate::error::{CatalogError, ErrorResponse};

/// Response header reporting whether the result cache served the listing.
pub const X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// `GET /products` — Paginated, filtered product listing.
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    summary = "List products",
    description = "Returns a page of warehouse products matching the filters. Responses are cached in-process and carry matching `Cache-Control` headers.",
    params(ProductListParams),
    responses(
        (status = 200, description = "Product page", body = ProductListResponse),
        (status = 400, description = "Malformed parameter (strict validation only)", body = ErrorResponse),
        (status = 500, description = "Warehouse query failed", body = ErrorResponse),
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
    let expose_details = state.run_mode.exposes_error_details();
    let catalog = &state.catalog_service;
    let config = catalog.config();

    let pairs = match (query, config.parse_policy) {
        (Ok(Query(pairs)), _) => pairs,
        (Err(rejection), ParsePolicy::Lenient) => {
            tracing::debug!(error = %rejection, "unreadable query string, using defaults");
            Vec::new()
        }
        (Err(rejection), ParsePolicy::Strict) => {
            return CatalogError::InvalidRequest(rejection.body_text())
                .into_response_with(expose_details);
        }
    };

    let filter = match ProductListParams::from_pairs(pairs, config.parse_policy)
        .and_then(|params| params.to_filter(config.parse_policy, config.max_limit))
    {
        Ok(filter) => filter,
        Err(err) => {
            tracing::debug!(error = %err, "rejected product listing parameters");
            return CatalogError::from(err).into_response_with(expose_details);
        }
    };

    match catalog.list_products(&filter).await {
        Ok(listing) => {
            let mut headers = HeaderMap::new();
            put_cache_headers(&mut headers, catalog.cache().ttl().as_secs());
            if let Ok(value) = HeaderValue::from_str(&listing.cache_status.to_string()) {
                headers.insert(X_CACHE, value);
            }
            (headers, Json(listing.payload.as_ref())).into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, page = filter.page, "product listing failed");
            err.into_response_with(expose_details)
        }
    }
}

/// `POST /products` — Always rejected; the dataset is read-only.
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    summary = "Create product (unsupported)",
    description = "The warehouse dataset is read-only. Every write is rejected with 405.",
    responses(
        (status = 405, description = "Writes are not supported", body = ErrorResponse),
    )
)]
pub async fn reject_write() -> Response {
    CatalogError::MethodNotAllowed.into_response()
}

/// Sets `Cache-Control` aligned with the in-process TTL and a fresh `ETag`.
pub fn put_cache_headers(headers: &mut HeaderMap, ttl_secs: u64) {
    if let Ok(value) =
        HeaderValue::from_str(&format!("public, max-age={ttl_secs}, s-maxage={ttl_secs}"))
    {
        headers.insert(CACHE_CONTROL, value);
    }
    let etag = format!("\"{}\"", uuid::Uuid::new_v4().simple());
    if let Ok(value) = HeaderValue::from_str(&etag) {
        headers.insert(ETAG, value);
    }
}

/// Product routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/products", get(list_products).post(reject_write))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode};
    use futures_util::future::BoxFuture;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::config::{CatalogConfig, RunMode};
    use crate::domain::{RawProductRow, TemplateLogoGenerator};
    use crate::query::{FetchOutcome, PageFetch, PageRequest, ProductSource};
    use crate::service::CatalogService;

    #[derive(Debug, Default)]
    struct StubSource {
        fail: bool,
        calls: AtomicU32,
    }

    impl ProductSource for StubSource {
        fn fetch_page<'a>(&'a self, _request: &'a PageRequest) -> BoxFuture<'a, FetchOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                if self.fail {
                    return FetchOutcome::Failed(CatalogError::Query(
                        "relation \"warehouse_products\" does not exist".into(),
                    ));
                }
                FetchOutcome::Complete(PageFetch {
                    rows: vec![RawProductRow {
                        id: Some("1".into()),
                        title: Some("Trail Boot".into()),
                        vendor: Some("Acme  Corp".into()),
                        image_urls: Some("a.jpg, b.jpg".into()),
                        price: Some("89.00".into()),
                        ..RawProductRow::default()
                    }],
                    total: 25,
                })
            })
        }
    }

    fn app(source: &Arc<StubSource>, run_mode: RunMode, policy: ParsePolicy) -> Router {
        let config = CatalogConfig {
            retry_base_delay: Duration::from_millis(1),
            query_timeout: Duration::from_secs(1),
            parse_policy: policy,
            ..CatalogConfig::default()
        };
        let service = CatalogService::new(
            config,
            Arc::clone(source) as Arc<dyn ProductSource>,
            Arc::new(TemplateLogoGenerator::new("/logos")),
        );
        let state = AppState {
            catalog_service: Arc::new(service),
            run_mode,
        };
        Router::new().nest("/api", routes()).with_state(state)
    }

    async fn send(app: Router, method: Method, uri: &str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from("{\"name\":\"new product\"}"));
        let Ok(request) = request else {
            panic!("request build failed");
        };
        let Ok(response) = app.oneshot(request).await else {
            panic!("router is infallible");
        };
        response
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let Ok(bytes) = to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body read failed");
        };
        let Ok(value) = serde_json::from_slice(&bytes) else {
            panic!("body is not JSON");
        };
        value
    }

    fn header<'r>(response: &'r Response, name: &str) -> Option<&'r str> {
        response.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[tokio::test]
    async fn listing_sets_cache_headers_and_payload() {
        let source = Arc::new(StubSource::default());
        let response = send(
            app(&source, RunMode::Development, ParsePolicy::Lenient),
            Method::GET,
            "/api/products?page=1&limit=10",
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            header(&response, "cache-control"),
            Some("public, max-age=300, s-maxage=300")
        );
        assert!(header(&response, "etag").is_some_and(|e| e.starts_with('"')));
        assert_eq!(header(&response, "x-cache"), Some("MISS"));

        let body = json_body(response).await;
        assert_eq!(body.pointer("/pagination/totalPages"), Some(&json!(3)));
        assert_eq!(body.pointer("/products/0/image"), Some(&json!("a.jpg")));
        assert_eq!(body.pointer("/products/0/brand/id"), Some(&json!("acme-corp")));
        assert_eq!(body.pointer("/products/0/_count/competitors"), Some(&json!(0)));
        assert_eq!(body.pointer("/filters/sortBy"), Some(&json!("createdAt")));
    }

    #[tokio::test]
    async fn repeated_request_is_served_from_cache_with_new_etag() {
        let source = Arc::new(StubSource::default());
        let router = app(&source, RunMode::Development, ParsePolicy::Lenient);

        let first = send(router.clone(), Method::GET, "/api/products?search=boot").await;
        let second = send(router, Method::GET, "/api/products?search=boot").await;

        assert_eq!(header(&second, "x-cache"), Some("HIT"));
        assert_ne!(header(&first, "etag"), header(&second, "etag"));
        assert!(header(&second, "cache-control").is_some());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn malformed_numbers_fall_back_when_lenient() {
        let source = Arc::new(StubSource::default());
        let response = send(
            app(&source, RunMode::Development, ParsePolicy::Lenient),
            Method::GET,
            "/api/products?page=abc&limit=-1&minPrice=cheap",
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body.pointer("/pagination/page"), Some(&json!(1)));
        assert_eq!(body.pointer("/pagination/limit"), Some(&json!(10)));
    }

    #[tokio::test]
    async fn malformed_numbers_rejected_when_strict() {
        let source = Arc::new(StubSource::default());
        let response = send(
            app(&source, RunMode::Development, ParsePolicy::Strict),
            Method::GET,
            "/api/products?minPrice=cheap",
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body.pointer("/error"), Some(&json!("Invalid request")));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn terminal_failure_includes_details_outside_production() {
        let source = Arc::new(StubSource {
            fail: true,
            ..StubSource::default()
        });
        let response = send(
            app(&source, RunMode::Development, ParsePolicy::Lenient),
            Method::GET,
            "/api/products",
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body.pointer("/error"), Some(&json!("Failed to fetch products")));
        assert!(
            body.pointer("/details")
                .and_then(serde_json::Value::as_str)
                .is_some_and(|d| d.contains("does not exist"))
        );
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn terminal_failure_hides_details_in_production() {
        let source = Arc::new(StubSource {
            fail: true,
            ..StubSource::default()
        });
        let response = send(
            app(&source, RunMode::Production, ParsePolicy::Lenient),
            Method::GET,
            "/api/products",
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert!(body.get("details").is_none());
        assert!(body.pointer("/message").is_some_and(serde_json::Value::is_string));
    }

    #[tokio::test]
    async fn post_is_always_method_not_allowed() {
        let source = Arc::new(StubSource::default());
        let response = send(
            app(&source, RunMode::Development, ParsePolicy::Lenient),
            Method::POST,
            "/api/products",
        )
        .await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(header(&response, "allow"), Some("GET"));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn repeated_key_uses_first_value_when_lenient() {
        let source = Arc::new(StubSource::default());
        let response = send(
            app(&source, RunMode::Development, ParsePolicy::Lenient),
            Method::GET,
            "/api/products?page=2&page=1&limit=5",
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body.pointer("/pagination/page"), Some(&json!(2)));
        assert_eq!(body.pointer("/pagination/limit"), Some(&json!(5)));
    }

    #[tokio::test]
    async fn repeated_key_is_a_structured_400_when_strict() {
        let source = Arc::new(StubSource::default());
        let response = send(
            app(&source, RunMode::Development, ParsePolicy::Strict),
            Method::GET,
            "/api/products?page=1&page=2",
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(header(&response, "content-type"), Some("application/json"));
        let body = json_body(response).await;
        assert_eq!(body.pointer("/error"), Some(&json!("Invalid request")));
        assert!(
            body.pointer("/message")
                .and_then(serde_json::Value::as_str)
                .is_some_and(|m| m.contains("page"))
        );
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }
}
