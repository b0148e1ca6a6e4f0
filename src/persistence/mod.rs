//! Persistence layer: the PostgreSQL warehouse connector.
//!
//! The products table is an external foreign table this service only
//! reads. [`postgres::PostgresProductSource`] implements
//! [`crate::query::ProductSource`] over a `sqlx::PgPool`.

pub mod postgres;

pub use postgres::PostgresProductSource;
