//! Query-string parameters for `GET /api/products` and their validation.
//!
//! The handler extracts the query string as plain key/value pairs, so
//! neither a malformed number nor a repeated key fails extraction.
//! [`ProductListParams::from_pairs`] collects the known keys and
//! [`ProductListParams::to_filter`] is the single parsing
//! stage; the [`ParsePolicy`] decides whether a malformed value falls back
//! to its default or rejects the request.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::config::ParsePolicy;
use crate::domain::{QueryFilter, SortField, SortOrder};
use crate::error::CatalogError;

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIMIT: u32 = 10;

/// A query-string value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value {value:?} for parameter `{param}`: {reason}")]
pub struct ValidationError {
    /// Parameter name as it appears in the query string.
    pub param: &'static str,
    /// Raw value.
    pub value: String,
    /// What was expected.
    pub reason: &'static str,
}

impl From<ValidationError> for CatalogError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

/// Raw query parameters for the products listing.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductListParams {
    /// Page number (1-indexed). Defaults to 1.
    pub page: Option<String>,
    /// Items per page. Defaults to 10, capped by configuration.
    pub limit: Option<String>,
    /// Case-insensitive substring matched against title, SKU and brand.
    pub search: Option<String>,
    /// `active` selects available products, anything else unavailable ones.
    pub status: Option<String>,
    /// Exact display-mode match.
    pub channel: Option<String>,
    /// Exact product-type match.
    pub category_id: Option<String>,
    /// Exact brand-name match.
    pub brand_id: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<String>,
    /// Inclusive upper price bound.
    pub max_price: Option<String>,
    /// One of `name`, `price`, `cost`, `createdAt`, `updatedAt`.
    pub sort_by: Option<String>,
    /// `asc` or `desc`. Defaults to `desc`.
    pub sort_order: Option<String>,
}

impl ProductListParams {
    /// Collects parameters from decoded query-string pairs.
    ///
    /// Unknown keys are ignored. A repeated key keeps its first value under
    /// [`ParsePolicy::Lenient`].
    ///
    /// # Errors
    ///
    /// Under [`ParsePolicy::Strict`], returns a [`ValidationError`] for the
    /// first repeated key.
    pub fn from_pairs<K, V>(
        pairs: impl IntoIterator<Item = (K, V)>,
        policy: ParsePolicy,
    ) -> Result<Self, ValidationError>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let (param, slot) = match key.as_ref() {
                "page" => ("page", &mut params.page),
                "limit" => ("limit", &mut params.limit),
                "search" => ("search", &mut params.search),
                "status" => ("status", &mut params.status),
                "channel" => ("channel", &mut params.channel),
                "categoryId" => ("categoryId", &mut params.category_id),
                "brandId" => ("brandId", &mut params.brand_id),
                "minPrice" => ("minPrice", &mut params.min_price),
                "maxPrice" => ("maxPrice", &mut params.max_price),
                "sortBy" => ("sortBy", &mut params.sort_by),
                "sortOrder" => ("sortOrder", &mut params.sort_order),
                _ => continue,
            };
            match (slot.is_some(), policy) {
                (false, _) => *slot = Some(value.into()),
                (true, ParsePolicy::Lenient) => {}
                (true, ParsePolicy::Strict) => {
                    return Err(ValidationError {
                        param,
                        value: value.into(),
                        reason: "expected a single value",
                    });
                }
            }
        }
        Ok(params)
    }

    /// Parses and normalizes the raw parameters.
    ///
    /// `limit` is always clamped to `max_limit`; clamping is not an error.
    ///
    /// # Errors
    ///
    /// Under [`ParsePolicy::Strict`], returns the first [`ValidationError`]
    /// encountered. [`ParsePolicy::Lenient`] never fails.
    pub fn to_filter(
        &self,
        policy: ParsePolicy,
        max_limit: u32,
    ) -> Result<QueryFilter, ValidationError> {
        let page = parse_field(self.page.as_deref(), "page", policy, parse_positive)?
            .unwrap_or(DEFAULT_PAGE);
        let limit = parse_field(self.limit.as_deref(), "limit", policy, parse_positive)?
            .unwrap_or(DEFAULT_LIMIT)
            .min(max_limit.max(1));
        let min_price = parse_field(self.min_price.as_deref(), "minPrice", policy, parse_price)?;
        let max_price = parse_field(self.max_price.as_deref(), "maxPrice", policy, parse_price)?;
        let sort_order = parse_field(
            self.sort_order.as_deref(),
            "sortOrder",
            policy,
            |raw| SortOrder::from_param(raw).ok_or("expected `asc` or `desc`"),
        )?
        .unwrap_or_default();
        let sort_by = non_empty(self.sort_by.as_deref())
            .map(SortField::from_param)
            .unwrap_or_default();

        Ok(QueryFilter {
            page,
            limit,
            search: non_empty(self.search.as_deref()).map(str::to_string),
            status: non_empty(self.status.as_deref()).map(str::to_string),
            channel: non_empty(self.channel.as_deref()).map(str::to_string),
            category_id: non_empty(self.category_id.as_deref()).map(str::to_string),
            brand_id: non_empty(self.brand_id.as_deref()).map(str::to_string),
            min_price,
            max_price,
            sort_by,
            sort_order,
        })
    }
}

/// Empty query-string values (`?search=`) count as absent.
fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.is_empty())
}

fn parse_field<T>(
    raw: Option<&str>,
    param: &'static str,
    policy: ParsePolicy,
    parse: impl FnOnce(&str) -> Result<T, &'static str>,
) -> Result<Option<T>, ValidationError> {
    let Some(raw) = non_empty(raw) else {
        return Ok(None);
    };
    match (parse(raw.trim()), policy) {
        (Ok(value), _) => Ok(Some(value)),
        (Err(_), ParsePolicy::Lenient) => Ok(None),
        (Err(reason), ParsePolicy::Strict) => Err(ValidationError {
            param,
            value: raw.to_string(),
            reason,
        }),
    }
}

fn parse_positive(raw: &str) -> Result<u32, &'static str> {
    match raw.parse::<u32>() {
        Ok(0) | Err(_) => Err("expected a positive integer"),
        Ok(n) => Ok(n),
    }
}

fn parse_price(raw: &str) -> Result<f64, &'static str> {
    match raw.parse::<f64>() {
        // `+ 0.0` folds `-0` into `0` so both share a cache key.
        Ok(n) if n.is_finite() && n >= 0.0 => Ok(n + 0.0),
        _ => Err("expected a non-negative number"),
    }
}
