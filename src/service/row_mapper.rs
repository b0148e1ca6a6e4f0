//! Row mapper: warehouse rows → [`ProductDto`].
//!
//! Mapping is pure and total. Missing fields resolve through fixed
//! fallbacks, never errors.

use std::sync::Arc;

use crate::api::dto::{BrandDto, CategoryDto, ProductCounts, ProductDto};
use crate::domain::slug::slugify;
use crate::domain::{LogoGenerator, LogoOptions, RawProductRow};

/// Currency reported for every warehouse product.
pub const CURRENCY: &str = "USD";
/// Channel reported for every warehouse product.
pub const CHANNEL: &str = "online";
/// Name used when a row carries no title.
pub const UNTITLED_NAME: &str = "Untitled Product";
/// SKU used when a row carries none.
pub const MISSING_SKU: &str = "N/A";

/// Maps raw rows using a logo generator and an image base URL.
#[derive(Debug, Clone)]
pub struct RowMapper {
    logos: Arc<dyn LogoGenerator>,
    logo_options: LogoOptions,
    image_base_url: String,
}

impl RowMapper {
    /// Creates a mapper. A trailing slash on `image_base_url` is ignored.
    #[must_use]
    pub fn new(logos: Arc<dyn LogoGenerator>, image_base_url: impl Into<String>) -> Self {
        Self {
            logos,
            logo_options: LogoOptions::default(),
            image_base_url: image_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Maps one row.
    #[must_use]
    pub fn map(&self, row: &RawProductRow) -> ProductDto {
        let id = first_present(&[&row.id, &row.product_id]).unwrap_or_default();
        let name = first_present(&[&row.title, &row.product_title])
            .unwrap_or_else(|| UNTITLED_NAME.to_string());
        let sku = first_present(&[&row.sku]).unwrap_or_else(|| MISSING_SKU.to_string());
        let image = self.resolve_image(row, &id);

        ProductDto {
            id,
            name,
            sku,
            image,
            price: parse_price(row.price.as_deref()),
            currency: CURRENCY.to_string(),
            channel: CHANNEL.to_string(),
            brand: row.vendor.as_deref().map(|vendor| BrandDto {
                id: slugify(vendor),
                name: vendor.to_string(),
                logo: self.logos.logo_url(vendor, self.logo_options),
            }),
            category: row.product_type.as_deref().map(|product_type| {
                let slug = slugify(product_type);
                CategoryDto {
                    id: slug.clone(),
                    name: product_type.to_string(),
                    slug,
                }
            }),
            competitors: Vec::new(),
            count: ProductCounts::default(),
        }
    }

    /// Featured image, then the first listed image, then a handle-based
    /// URL, then nothing.
    fn resolve_image(&self, row: &RawProductRow, id: &str) -> Option<String> {
        if let Some(featured) = row.featured_image.as_deref().filter(|s| !s.trim().is_empty()) {
            return Some(featured.to_string());
        }
        if let Some(first) = row
            .image_urls
            .as_deref()
            .and_then(|list| list.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            return Some(first.to_string());
        }
        row.handle
            .as_deref()
            .filter(|h| !h.is_empty())
            .map(|handle| format!("{}/{handle}/{id}.jpg", self.image_base_url))
    }
}

/// First non-null value, as an owned string.
fn first_present(candidates: &[&Option<String>]) -> Option<String> {
    candidates.iter().find_map(|c| Option::clone(c))
}

/// Parses a textual price. Unparsable or missing prices map to zero.
fn parse_price(raw: Option<&str>) -> f64 {
    raw.and_then(|p| p.trim().parse::<f64>().ok())
        .filter(|p| p.is_finite())
        .unwrap_or(0.0)
}
