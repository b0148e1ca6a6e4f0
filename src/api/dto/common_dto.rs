//! Shared DTO types used across list endpoints.

use serde::Serialize;
use utoipa::ToSchema;

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Current page number (1-indexed).
    pub page: u32,
    /// Items per page.
    pub limit: u32,
    /// Total number of matching items.
    pub total: u64,
    /// Total number of pages, `ceil(total / limit)`.
    pub total_pages: u64,
}

impl PaginationMeta {
    /// Builds pagination metadata. A zero `limit` is treated as one.
    #[must_use]
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let per_page = u64::from(limit.max(1));
        Self {
            page,
            limit,
            total,
            total_pages: total.div_ceil(per_page),
        }
    }
}
