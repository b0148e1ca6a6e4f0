//! Product listing response DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use super::common_dto::PaginationMeta;
use crate::domain::QueryFilter;

/// Brand derived from the warehouse vendor name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BrandDto {
    /// Slug of the brand name.
    pub id: String,
    /// Raw brand name.
    pub name: String,
    /// Generated logo URL.
    pub logo: String,
}

/// Category derived from the warehouse product type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CategoryDto {
    /// Slug of the product type.
    pub id: String,
    /// Raw product type.
    pub name: String,
    /// Slug of the product type.
    pub slug: String,
}

/// Relationship counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
pub struct ProductCounts {
    /// Tracked competitor listings. Always zero for warehouse products.
    pub competitors: u32,
}

/// External product shape.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProductDto {
    /// Product identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Stock keeping unit.
    pub sku: String,
    /// Resolved image URL.
    pub image: Option<String>,
    /// Selling price.
    pub price: f64,
    /// ISO currency code.
    pub currency: String,
    /// Sales channel.
    pub channel: String,
    /// Brand, when the row carries a vendor.
    pub brand: Option<BrandDto>,
    /// Category, when the row carries a product type.
    pub category: Option<CategoryDto>,
    /// Competitor listings. Always empty for warehouse products.
    #[schema(value_type = Vec<Object>)]
    pub competitors: Vec<serde_json::Value>,
    /// Relationship counters.
    #[serde(rename = "_count")]
    pub count: ProductCounts,
}

/// Echo of the filters applied to a listing.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFilters {
    /// Search term.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Status filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Channel filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// Category filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    /// Brand filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<String>,
    /// Lower price bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    /// Upper price bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    /// Logical sort field.
    pub sort_by: String,
    /// Sort direction.
    pub sort_order: String,
}

impl From<&QueryFilter> for AppliedFilters {
    fn from(filter: &QueryFilter) -> Self {
        Self {
            search: filter.search.clone(),
            status: filter.status.clone(),
            channel: filter.channel.clone(),
            category_id: filter.category_id.clone(),
            brand_id: filter.brand_id.clone(),
            min_price: filter.min_price,
            max_price: filter.max_price,
            sort_by: filter.sort_by.as_str().to_string(),
            sort_order: filter.sort_order.to_string(),
        }
    }
}

/// Response body for `GET /api/products`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProductListResponse {
    /// Mapped products for the requested page.
    pub products: Vec<ProductDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
    /// Applied filters.
    pub filters: AppliedFilters,
}
