//! Data Transfer Objects for REST request/response serialization.

pub mod common_dto;
pub mod product_dto;
pub mod query_dto;

pub use common_dto::*;
pub use product_dto::*;
pub use query_dto::*;
