//! REST API layer: route handlers, DTOs, OpenAPI document and router
//! composition.
//!
//! Resource endpoints are mounted under `/api`; system endpoints at the root.

pub mod dto;
pub mod handlers;
pub mod openapi;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    with_swagger(
        Router::new()
            .nest("/api", handlers::routes())
            .merge(handlers::system::routes()),
    )
}

#[cfg(feature = "swagger-ui")]
fn with_swagger(router: Router<AppState>) -> Router<AppState> {
    use utoipa::OpenApi;

    router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
    )
}

#[cfg(not(feature = "swagger-ui"))]
fn with_swagger(router: Router<AppState>) -> Router<AppState> {
    router
}
