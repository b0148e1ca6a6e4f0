//! Filter compiler: [`QueryFilter`] → parameterized SQL fragments.
//!
//! Only identifiers from the fixed column table are ever interpolated into
//! fragment text. Every client-supplied value is bound as a `$n` parameter.

use crate::domain::{QueryFilter, SortField, SortOrder};

/// Physical columns of the warehouse products table.
pub mod columns {
    /// Stable identifier; fallback sort column.
    pub const ID: &str = "id";
    /// Listing title.
    pub const TITLE: &str = "title";
    /// Stock keeping unit.
    pub const SKU: &str = "sku";
    /// Brand name.
    pub const VENDOR: &str = "vendor";
    /// Product type (category).
    pub const PRODUCT_TYPE: &str = "product_type";
    /// Display mode (channel).
    pub const DISPLAY_MODE: &str = "display_mode";
    /// Availability flag.
    pub const AVAILABLE: &str = "available";
    /// Selling price.
    pub const PRICE: &str = "price";
    /// Compare-at price, exposed to clients as `cost`.
    pub const COMPARE_AT_PRICE: &str = "compare_at_price";
    /// Row creation time.
    pub const CREATED_AT: &str = "created_at";
    /// Row update time.
    pub const UPDATED_AT: &str = "updated_at";
}

/// A value bound to a `$n` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// Text value.
    Text(String),
    /// Boolean value.
    Bool(bool),
    /// Double-precision value.
    Float(f64),
}

/// Compiled WHERE/ORDER BY fragments with positionally matched parameters.
///
/// Placeholders run `$1..=$n` in order of appearance, with `n == params.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPredicate {
    /// Condition fragments, joined with `AND`.
    pub conditions: Vec<String>,
    /// Bound parameters.
    pub params: Vec<SqlParam>,
    /// Resolved physical sort column.
    pub sort_column: &'static str,
    /// Sort direction.
    pub sort_order: SortOrder,
}

impl CompiledPredicate {
    /// Renders `WHERE a AND b`, or an empty string when unfiltered.
    #[must_use]
    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Renders the ORDER BY clause. `id` is appended as a tiebreaker so
    /// pagination is stable across equal sort keys.
    #[must_use]
    pub fn order_by_clause(&self) -> String {
        let direction = self.sort_order.as_sql();
        if self.sort_column == columns::ID {
            format!("ORDER BY {} {direction}", columns::ID)
        } else {
            format!(
                "ORDER BY {} {direction} NULLS LAST, {} ASC",
                sort_expression(self.sort_column),
                columns::ID
            )
        }
    }

    /// Index the next appended parameter will occupy (1-based).
    #[must_use]
    pub fn next_placeholder(&self) -> usize {
        self.params.len() + 1
    }
}

/// Resolves a logical sort field to its physical column.
#[must_use]
pub fn sort_column(field: &SortField) -> &'static str {
    match field {
        SortField::Name => columns::TITLE,
        SortField::Price => columns::PRICE,
        SortField::Cost => columns::COMPARE_AT_PRICE,
        SortField::CreatedAt => columns::CREATED_AT,
        SortField::UpdatedAt => columns::UPDATED_AT,
        SortField::Other(_) => columns::ID,
    }
}

/// Sort key for a column. Price columns may be stored as text, so they are
/// ordered by their numeric value.
fn sort_expression(column: &'static str) -> String {
    if column == columns::PRICE || column == columns::COMPARE_AT_PRICE {
        format!("CAST({column} AS DOUBLE PRECISION)")
    } else {
        column.to_string()
    }
}

/// Compiles a filter. Never fails: absent fields contribute nothing.
#[must_use]
pub fn compile(filter: &QueryFilter) -> CompiledPredicate {
    let mut builder = PredicateBuilder::default();

    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        let n = builder.bind(SqlParam::Text(format!("%{}%", escape_like(search))));
        builder.push(format!(
            "({t} ILIKE ${n} OR {s} ILIKE ${n} OR {v} ILIKE ${n})",
            t = columns::TITLE,
            s = columns::SKU,
            v = columns::VENDOR,
        ));
    }

    if let Some(status) = filter.status.as_deref() {
        let n = builder.bind(SqlParam::Bool(status == "active"));
        builder.push(format!("{} = ${n}", columns::AVAILABLE));
    }

    if let Some(channel) = &filter.channel {
        let n = builder.bind(SqlParam::Text(channel.clone()));
        builder.push(format!("{} = ${n}", columns::DISPLAY_MODE));
    }

    if let Some(category_id) = &filter.category_id {
        let n = builder.bind(SqlParam::Text(category_id.clone()));
        builder.push(format!("{} = ${n}", columns::PRODUCT_TYPE));
    }

    if let Some(brand_id) = &filter.brand_id {
        let n = builder.bind(SqlParam::Text(brand_id.clone()));
        builder.push(format!("{} = ${n}", columns::VENDOR));
    }

    if let Some(min_price) = filter.min_price {
        let n = builder.bind(SqlParam::Float(min_price));
        builder.push(format!("CAST({} AS DOUBLE PRECISION) >= ${n}", columns::PRICE));
    }

    if let Some(max_price) = filter.max_price {
        let n = builder.bind(SqlParam::Float(max_price));
        builder.push(format!("CAST({} AS DOUBLE PRECISION) <= ${n}", columns::PRICE));
    }

    CompiledPredicate {
        conditions: builder.conditions,
        params: builder.params,
        sort_column: sort_column(&filter.sort_by),
        sort_order: filter.sort_order,
    }
}

/// Escapes `LIKE` metacharacters so the term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Default)]
struct PredicateBuilder {
    conditions: Vec<String>,
    params: Vec<SqlParam>,
}

impl PredicateBuilder {
    /// Binds a parameter and returns its placeholder index.
    fn bind(&mut self, param: SqlParam) -> usize {
        self.params.push(param);
        self.params.len()
    }

    fn push(&mut self, condition: String) {
        self.conditions.push(condition);
    }
}
