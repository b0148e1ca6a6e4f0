//! PostgreSQL implementation of [`ProductSource`].
//!
//! Reads the foreign-data-wrapped warehouse table through a `sqlx::PgPool`.
//! The table name comes from configuration and column names from the
//! compiler's fixed column table; every filter value is bound.

use futures_util::future::BoxFuture;
use sqlx::postgres::PgArguments;
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::{PgPool, Postgres};

use crate::domain::RawProductRow;
use crate::error::CatalogError;
use crate::query::{CompiledPredicate, FetchOutcome, PageRequest, ProductSource, SqlParam};

/// Projection shared by every row query. Identifier and price columns are
/// cast to text so numeric and string-typed warehouse columns decode alike.
/// Cast columns use `*_text` aliases so `ORDER BY` still sees the source
/// columns with their native types.
const ROW_PROJECTION: &str = "CAST(id AS TEXT) AS id_text, \
     CAST(product_id AS TEXT) AS product_id_text, \
     title, product_title, sku, \
     CAST(price AS TEXT) AS price_text, \
     CAST(compare_at_price AS TEXT) AS compare_at_price_text, \
     vendor, product_type, featured_image, image_urls, handle, available";

/// PostgreSQL-backed product source using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresProductSource {
    pool: PgPool,
    table: String,
}

impl PostgresProductSource {
    /// Creates a source reading `table` through `pool`.
    ///
    /// `table` must already be validated as a plain identifier; see
    /// [`crate::config::CatalogConfig::from_env`].
    #[must_use]
    pub fn new(pool: PgPool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }

    async fn fetch_rows(&self, request: &PageRequest) -> Result<Vec<RawProductRow>, CatalogError> {
        let sql = rows_sql(&self.table, &request.predicate);
        let query = bind_all_as(
            sqlx::query_as::<_, RawProductRow>(&sql),
            &request.predicate.params,
        )
        .bind(i64::from(request.limit))
        .bind(i64::try_from(request.offset).unwrap_or(i64::MAX));
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn fetch_count(&self, request: &PageRequest) -> Result<u64, CatalogError> {
        let sql = count_sql(&self.table, &request.predicate);
        let query = bind_all_scalar(
            sqlx::query_scalar::<_, i64>(&sql),
            &request.predicate.params,
        );
        let count = query.fetch_one(&self.pool).await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}

impl ProductSource for PostgresProductSource {
    fn fetch_page<'a>(&'a self, request: &'a PageRequest) -> BoxFuture<'a, FetchOutcome> {
        Box::pin(async move {
            let (rows, total) = tokio::join!(self.fetch_rows(request), self.fetch_count(request));
            FetchOutcome::from_pair(rows, total)
        })
    }
}

/// SQL for the page row query. `LIMIT`/`OFFSET` take the two placeholders
/// after the filter parameters.
#[must_use]
pub fn rows_sql(table: &str, predicate: &CompiledPredicate) -> String {
    let limit_idx = predicate.next_placeholder();
    let offset_idx = limit_idx + 1;
    format!(
        "SELECT {ROW_PROJECTION} FROM {table} {} {} LIMIT ${limit_idx} OFFSET ${offset_idx}",
        predicate.where_clause(),
        predicate.order_by_clause(),
    )
}

/// SQL for the unsorted count query sharing the row query's filter.
#[must_use]
pub fn count_sql(table: &str, predicate: &CompiledPredicate) -> String {
    format!("SELECT COUNT(*) FROM {table} {}", predicate.where_clause())
}

fn bind_all_as<'q>(
    mut query: QueryAs<'q, Postgres, RawProductRow, PgArguments>,
    params: &'q [SqlParam],
) -> QueryAs<'q, Postgres, RawProductRow, PgArguments> {
    for param in params {
        query = match param {
            SqlParam::Text(value) => query.bind(value.as_str()),
            SqlParam::Bool(value) => query.bind(*value),
            SqlParam::Float(value) => query.bind(*value),
        };
    }
    query
}

fn bind_all_scalar<'q>(
    mut query: QueryScalar<'q, Postgres, i64, PgArguments>,
    params: &'q [SqlParam],
) -> QueryScalar<'q, Postgres, i64, PgArguments> {
    for param in params {
        query = match param {
            SqlParam::Text(value) => query.bind(value.as_str()),
            SqlParam::Bool(value) => query.bind(*value),
            SqlParam::Float(value) => query.bind(*value),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{QueryFilter, SortField, SortOrder};
    use crate::query::compiler::{columns, sort_column};
    use crate::query::compile;

    #[test]
    fn unfiltered_sql() {
        let predicate = compile(&QueryFilter::default());
        assert_eq!(
            rows_sql("fdw.products", &predicate),
            format!(
                "SELECT {ROW_PROJECTION} FROM fdw.products  ORDER BY created_at DESC NULLS LAST, id ASC LIMIT $1 OFFSET $2"
            )
        );
        assert_eq!(
            count_sql("fdw.products", &predicate),
            "SELECT COUNT(*) FROM fdw.products "
        );
    }

    #[test]
    fn filtered_sql_numbers_limit_after_params() {
        let predicate = compile(&QueryFilter {
            search: Some("boot".into()),
            brand_id: Some("Acme".into()),
            sort_by: SortField::Name,
            sort_order: SortOrder::Asc,
            ..QueryFilter::default()
        });
        let sql = rows_sql("fdw.products", &predicate);
        assert!(sql.contains(
            "WHERE (title ILIKE $1 OR sku ILIKE $1 OR vendor ILIKE $1) AND vendor = $2"
        ));
        assert!(sql.contains("ORDER BY title ASC NULLS LAST, id ASC"));
        assert!(sql.ends_with("LIMIT $3 OFFSET $4"));

        let count = count_sql("fdw.products", &predicate);
        assert!(count.contains("vendor = $2"));
        assert!(!count.contains("ORDER BY"));
        assert!(!count.contains("LIMIT"));
    }

    /// Output aliases of the row projection (`expr AS alias`).
    fn projection_aliases() -> Vec<&'static str> {
        ROW_PROJECTION
            .split(',')
            .filter_map(|item| item.trim().rsplit_once(" AS ").map(|(_, alias)| alias.trim()))
            .collect()
    }

    #[test]
    fn sort_columns_are_not_shadowed_by_projection_aliases() {
        let aliases = projection_aliases();
        assert_eq!(
            aliases,
            vec!["id_text", "product_id_text", "price_text", "compare_at_price_text"]
        );
        for field in [
            SortField::Name,
            SortField::Price,
            SortField::Cost,
            SortField::CreatedAt,
            SortField::UpdatedAt,
            SortField::Other("unknown".into()),
        ] {
            let column = sort_column(&field);
            assert!(!aliases.contains(&column), "{column} is shadowed by an alias");
        }
        assert!(!aliases.contains(&columns::ID));
    }

    #[test]
    fn price_sort_orders_by_numeric_source_column() {
        let predicate = compile(&QueryFilter {
            sort_by: SortField::Price,
            sort_order: SortOrder::Asc,
            ..QueryFilter::default()
        });
        let sql = rows_sql("fdw.products", &predicate);
        assert!(sql.contains("AS price_text"));
        assert!(sql.contains(
            "ORDER BY CAST(price AS DOUBLE PRECISION) ASC NULLS LAST, id ASC LIMIT $1 OFFSET $2"
        ));
    }
}
