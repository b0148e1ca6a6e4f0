//! Catalog service: cache lookup, fetch, mapping and payload assembly.

use std::fmt;
use std::sync::Arc;

use crate::api::dto::{AppliedFilters, PaginationMeta, ProductListResponse};
use crate::config::CatalogConfig;
use crate::domain::{LogoGenerator, QueryFilter};
use crate::error::CatalogError;
use crate::query::{PageRequest, ProductSource, RetryPolicy, RetryingExecutor, compile};

use super::result_cache::ResultCache;
use super::row_mapper::RowMapper;

/// Whether a listing was served from the result cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Served from the cache.
    Hit,
    /// Fetched from the warehouse.
    Miss,
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hit => write!(f, "HIT"),
            Self::Miss => write!(f, "MISS"),
        }
    }
}

/// A listing payload plus how it was obtained.
#[derive(Debug, Clone)]
pub struct Listing {
    /// Response payload, shared with the cache.
    pub payload: Arc<ProductListResponse>,
    /// Cache outcome.
    pub cache_status: CacheStatus,
}

/// Orchestrates one products listing request.
///
/// The only component that writes the result cache. The executor and
/// mapper below it are side-effect free.
#[derive(Debug)]
pub struct CatalogService {
    config: CatalogConfig,
    cache: ResultCache,
    executor: RetryingExecutor,
    mapper: RowMapper,
}

impl CatalogService {
    /// Wires a service over `source` using `config`.
    #[must_use]
    pub fn new(
        config: CatalogConfig,
        source: Arc<dyn ProductSource>,
        logos: Arc<dyn LogoGenerator>,
    ) -> Self {
        let cache = ResultCache::new(config.cache_ttl, config.cache_max_entries);
        let executor = RetryingExecutor::new(source, RetryPolicy::from(&config));
        let mapper = RowMapper::new(logos, config.image_base_url.clone());
        Self {
            config,
            cache,
            executor,
            mapper,
        }
    }

    /// Returns the catalog configuration.
    #[must_use]
    pub const fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Returns the result cache.
    #[must_use]
    pub const fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Row cap for a fetch: the requested limit bounded by the batch cap,
    /// which is tighter when a search term is present.
    #[must_use]
    pub fn fetch_limit(&self, filter: &QueryFilter) -> u32 {
        let cap = if filter.has_search() {
            self.config.search_batch_cap
        } else {
            self.config.batch_cap
        };
        filter.limit.min(cap)
    }

    /// Returns the listing for `filter`, from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::QueryFailed`] when every fetch attempt fails.
    /// Nothing is cached in that case.
    pub async fn list_products(&self, filter: &QueryFilter) -> Result<Listing, CatalogError> {
        let key = filter.cache_key();
        if let Some(payload) = self.cache.get(&key).await {
            tracing::debug!(%key, "product listing cache hit");
            return Ok(Listing {
                payload,
                cache_status: CacheStatus::Hit,
            });
        }

        let request = PageRequest {
            predicate: compile(filter),
            limit: self.fetch_limit(filter),
            offset: filter.offset(),
        };
        let page = self.executor.fetch(&request).await?;

        let products = page.rows.iter().map(|row| self.mapper.map(row)).collect();
        let payload = Arc::new(ProductListResponse {
            products,
            pagination: PaginationMeta::new(filter.page, filter.limit, page.total),
            filters: AppliedFilters::from(filter),
        });

        self.cache.put(key, Arc::clone(&payload)).await;
        tracing::debug!(
            total = page.total,
            returned = page.rows.len(),
            "product listing fetched"
        );

        Ok(Listing {
            payload,
            cache_status: CacheStatus::Miss,
        })
    }
}
