//! Service layer: listing orchestration, result cache and row mapping.
//!
//! [`CatalogService`] checks the [`ResultCache`], runs the retrying fetch
//! on a miss, maps rows with [`RowMapper`] and stores the assembled payload.

pub mod catalog_service;
pub mod result_cache;
pub mod row_mapper;

pub use catalog_service::{CacheStatus, CatalogService, Listing};
pub use result_cache::{CacheEntry, ResultCache};
pub use row_mapper::RowMapper;
