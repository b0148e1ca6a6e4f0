//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::RunMode;
use crate::service::CatalogService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Products listing service, including the process-wide result cache.
    pub catalog_service: Arc<CatalogService>,
    /// Deployment mode; decides whether error details reach clients.
    pub run_mode: RunMode,
}
