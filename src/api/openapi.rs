//! OpenAPI document for the service.

use utoipa::OpenApi;

use super::dto::{
    AppliedFilters, BrandDto, CategoryDto, PaginationMeta, ProductCounts, ProductDto,
    ProductListResponse,
};
use super::handlers::{products, system};
use crate::error::ErrorResponse;

/// Generated OpenAPI specification.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "pricewatch-catalog",
        description = "Read-only products listing API backed by the warehouse products table."
    ),
    paths(
        products::list_products,
        products::reject_write,
        system::health_handler,
    ),
    components(schemas(
        ProductListResponse,
        ProductDto,
        BrandDto,
        CategoryDto,
        ProductCounts,
        PaginationMeta,
        AppliedFilters,
        ErrorResponse,
        system::HealthResponse,
    )),
    tags(
        (name = "Products", description = "Product listing"),
        (name = "System", description = "Operational endpoints"),
    )
)]
pub struct ApiDoc;
