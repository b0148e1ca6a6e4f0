//! Domain layer: request model, warehouse row shape, and the pure helpers
//! used to derive brand and category identities.

pub mod logo;
pub mod query_filter;
pub mod raw_product;
pub mod slug;

pub use logo::{LogoFormat, LogoGenerator, LogoOptions, TemplateLogoGenerator};
pub use query_filter::{QueryFilter, SortField, SortOrder};
pub use raw_product::RawProductRow;
