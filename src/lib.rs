//! # pricewatch-catalog
//!
//! Read-only products listing API for the pricewatch competitor
//! price-monitoring service.
//!
//! A listing request is compiled into parameterized SQL, answered from a
//! process-local result cache when fresh, and otherwise fetched from the
//! external warehouse table with joint retry of the row and count queries.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── CatalogService (service/)
//!     │     ├── ResultCache
//!     │     └── RowMapper
//!     │
//!     ├── Filter Compiler + RetryingExecutor (query/)
//!     │
//!     └── PostgreSQL warehouse connector (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod query;
pub mod service;
