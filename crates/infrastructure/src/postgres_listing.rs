//! SQL fragments shared by the paged, searchable list queries.

use masterhub_application::ListQuery;
use masterhub_core::{AppError, AppResult};
use masterhub_domain::Ordering;
use sqlx::{PgPool, Postgres, QueryBuilder};

/// Appends the soft-delete and search conditions of a list query.
///
/// The builder must already hold a `WHERE` clause.
pub(crate) fn push_list_filters(
    builder: &mut QueryBuilder<'_, Postgres>,
    table: &str,
    query: &ListQuery,
    search_columns: &[&str],
) {
    if !query.include_deleted {
        builder.push(format!(" AND {table}.is_deleted = FALSE"));
    }

    let Some(term) = query.search_term() else {
        return;
    };
    let pattern = format!("%{}%", escape_like(term));

    builder.push(" AND (");
    for (index, column) in search_columns.iter().enumerate() {
        if index > 0 {
            builder.push(" OR ");
        }
        builder.push(format!("{table}.{column} ILIKE "));
        builder.push_bind(pattern.clone());
    }
    builder.push(")");
}

/// Appends `ORDER BY` for an allow-listed field, with the id as tie breaker.
pub(crate) fn push_ordering(
    builder: &mut QueryBuilder<'_, Postgres>,
    table: &str,
    ordering: Ordering,
) {
    builder.push(format!(
        " ORDER BY {table}.{} {}, {table}.id ASC",
        ordering.field(),
        ordering.direction().as_sql()
    ));
}

/// Appends `LIMIT` and `OFFSET` of a list query.
pub(crate) fn push_page(builder: &mut QueryBuilder<'_, Postgres>, query: &ListQuery) {
    builder.push(" LIMIT ");
    builder.push_bind(i64::from(query.page_size()));
    builder.push(" OFFSET ");
    builder.push_bind(i64::from(query.page_offset()));
}

/// Runs a `SELECT COUNT(*)` query built with the same filters as the page.
pub(crate) async fn fetch_count(
    mut builder: QueryBuilder<'_, Postgres>,
    pool: &PgPool,
    entity: &str,
) -> AppResult<u64> {
    let count = builder
        .build_query_scalar::<i64>()
        .fetch_one(pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count {entity}: {error}")))?;

    u64::try_from(count)
        .map_err(|error| AppError::Internal(format!("invalid {entity} count: {error}")))
}

/// Returns whether a database error is a unique constraint violation.
pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return true;
    }

    false
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for character in term.chars() {
        if matches!(character, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(character);
    }
    escaped
}
