//! Normalized products listing request.
//!
//! A [`QueryFilter`] is built once per inbound request by the query-string
//! parsing stage and is immutable afterwards. Its [`QueryFilter::cache_key`]
//! is the identity used by the result cache.

use std::fmt;

use serde::Serialize;

/// Logical sort field requested by the client.
///
/// Unrecognized names are kept verbatim so they still yield distinct
/// cache keys; the compiler resolves them to the stable id column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SortField {
    /// `name`
    Name,
    /// `price`
    Price,
    /// `cost`
    Cost,
    /// `createdAt` (default)
    #[default]
    CreatedAt,
    /// `updatedAt`
    UpdatedAt,
    /// Any other value.
    Other(String),
}

impl SortField {
    /// Maps a query-string value onto a sort field.
    #[must_use]
    pub fn from_param(value: &str) -> Self {
        match value {
            "name" => Self::Name,
            "price" => Self::Price,
            "cost" => Self::Cost,
            "createdAt" => Self::CreatedAt,
            "updatedAt" => Self::UpdatedAt,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the logical name as supplied by the client.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Name => "name",
            Self::Price => "price",
            Self::Cost => "cost",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
            Self::Other(raw) => raw,
        }
    }
}

impl Serialize for SortField {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending (default).
    #[default]
    Desc,
}

impl SortOrder {
    /// Parses `asc` / `desc` (case-insensitive).
    #[must_use]
    pub fn from_param(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }

    /// SQL keyword for this direction.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// Validated products listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryFilter {
    /// 1-based page number.
    pub page: u32,
    /// Page size, already capped.
    pub limit: u32,
    /// Case-insensitive substring matched against title, SKU and brand.
    pub search: Option<String>,
    /// `"active"` selects available products, anything else unavailable.
    pub status: Option<String>,
    /// Exact display-mode match.
    pub channel: Option<String>,
    /// Exact product-type match.
    pub category_id: Option<String>,
    /// Exact brand-name match.
    pub brand_id: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    pub max_price: Option<f64>,
    /// Logical sort field.
    pub sort_by: SortField,
    /// Sort direction.
    pub sort_order: SortOrder,
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            search: None,
            status: None,
            channel: None,
            category_id: None,
            brand_id: None,
            min_price: None,
            max_price: None,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl QueryFilter {
    /// Canonical cache key covering every filter, sort and pagination field.
    ///
    /// String fields are rendered with `Debug` so quoting and escaping keep
    /// distinct values distinct (`Some("a;b")` cannot collide with a
    /// neighbouring field).
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!(
            "products:page={};limit={};search={:?};status={:?};channel={:?};category={:?};brand={:?};min={:?};max={:?};sort={:?}:{}",
            self.page,
            self.limit,
            self.search,
            self.status,
            self.channel,
            self.category_id,
            self.brand_id,
            self.min_price,
            self.max_price,
            self.sort_by.as_str(),
            self.sort_order,
        )
    }

    /// Row offset of the first item on the requested page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// Returns `true` when a non-empty search term is present.
    #[must_use]
    pub fn has_search(&self) -> bool {
        self.search.as_deref().is_some_and(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_filters_share_a_key() {
        let a = QueryFilter {
            search: Some("shoe".into()),
            min_price: Some(10.0),
            ..QueryFilter::default()
        };
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn every_field_changes_the_key() {
        let base = QueryFilter::default();
        let variants = vec![
            QueryFilter { page: 2, ..base.clone() },
            QueryFilter { limit: 20, ..base.clone() },
            QueryFilter { search: Some("x".into()), ..base.clone() },
            QueryFilter { status: Some("active".into()), ..base.clone() },
            QueryFilter { channel: Some("web".into()), ..base.clone() },
            QueryFilter { category_id: Some("shoes".into()), ..base.clone() },
            QueryFilter { brand_id: Some("Acme".into()), ..base.clone() },
            QueryFilter { min_price: Some(1.0), ..base.clone() },
            QueryFilter { max_price: Some(1.0), ..base.clone() },
            QueryFilter { sort_by: SortField::Price, ..base.clone() },
            QueryFilter { sort_by: SortField::Other("weird".into()), ..base.clone() },
            QueryFilter { sort_order: SortOrder::Asc, ..base.clone() },
        ];
        let base_key = base.cache_key();
        let mut seen = std::collections::HashSet::new();
        for variant in &variants {
            let key = variant.cache_key();
            assert_ne!(key, base_key, "{variant:?}");
            assert!(seen.insert(key), "duplicate key for {variant:?}");
        }
    }

    #[test]
    fn values_cannot_bleed_across_fields() {
        let a = QueryFilter {
            search: Some("a\";status=Some(\"b".into()),
            ..QueryFilter::default()
        };
        let b = QueryFilter {
            search: Some("a".into()),
            status: Some("b".into()),
            ..QueryFilter::default()
        };
        assert_ne!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn min_and_max_price_are_distinguished() {
        let a = QueryFilter { min_price: Some(5.0), ..QueryFilter::default() };
        let b = QueryFilter { max_price: Some(5.0), ..QueryFilter::default() };
        assert_ne!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn offset_is_zero_based() {
        let f = QueryFilter { page: 3, limit: 10, ..QueryFilter::default() };
        assert_eq!(f.offset(), 20);
        assert_eq!(QueryFilter::default().offset(), 0);
    }

    #[test]
    fn sort_field_round_trips_logical_names() {
        for name in ["name", "price", "cost", "createdAt", "updatedAt", "rank"] {
            assert_eq!(SortField::from_param(name).as_str(), name);
        }
        assert_eq!(SortOrder::from_param("ASC"), Some(SortOrder::Asc));
        assert_eq!(SortOrder::from_param("sideways"), None);
    }
}
