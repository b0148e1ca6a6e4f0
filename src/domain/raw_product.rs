//! Warehouse row shape as returned by the foreign products table.

use sqlx::FromRow;

/// One row of the external products table.
///
/// The table is owned by the warehouse, not by this service. Identifier
/// and price columns are cast to text in the projection so numeric and
/// string-typed sources decode the same way. The casts are projected under
/// `*_text` aliases: an output alias equal to a column name would shadow
/// that column in `ORDER BY`.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow)]
pub struct RawProductRow {
    /// Primary identifier.
    #[sqlx(rename = "id_text")]
    pub id: Option<String>,
    /// Secondary identifier used when `id` is null.
    #[sqlx(rename = "product_id_text")]
    pub product_id: Option<String>,
    /// Variant or listing title.
    pub title: Option<String>,
    /// Parent product title, used when `title` is null.
    pub product_title: Option<String>,
    /// Stock keeping unit.
    pub sku: Option<String>,
    /// Price as text.
    #[sqlx(rename = "price_text")]
    pub price: Option<String>,
    /// Compare-at price as text.
    #[sqlx(rename = "compare_at_price_text")]
    pub compare_at_price: Option<String>,
    /// Brand name.
    pub vendor: Option<String>,
    /// Product type, used as the category.
    pub product_type: Option<String>,
    /// URL of the featured image.
    pub featured_image: Option<String>,
    /// Comma-separated image URLs.
    pub image_urls: Option<String>,
    /// URL handle of the product page.
    pub handle: Option<String>,
    /// Availability flag.
    pub available: Option<bool>,
}
