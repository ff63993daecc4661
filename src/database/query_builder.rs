use serde_json::Value;
use sqlx::{postgres::PgArguments, FromRow, PgPool, Postgres};

use crate::database::manager::DatabaseError;
use crate::sql::SqlFragment;

type QueryAs<'q, O> = sqlx::query::QueryAs<'q, Postgres, O, PgArguments>;

/// Runs `sql` with the fragment's values bound in order.
pub async fn fetch_all<O>(pool: &PgPool, sql: &str, fragment: &SqlFragment) -> Result<Vec<O>, DatabaseError>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
{
    tracing::debug!(sql, params = fragment.values.len(), "fetch_all");
    let mut q = sqlx::query_as::<_, O>(sql);
    for v in fragment.values.iter() {
        q = bind_param(q, v);
    }
    Ok(q.fetch_all(pool).await?)
}

/// Like [`fetch_all`], with `extra` bound after the fragment's values.
///
/// `extra` carries the caller's own trailing parameters, such as the key in
/// `WHERE handle = $N` after a `SET` list.
pub async fn fetch_optional<O>(
    pool: &PgPool,
    sql: &str,
    fragment: &SqlFragment,
    extra: &[Value],
) -> Result<Option<O>, DatabaseError>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
{
    tracing::debug!(sql, params = fragment.values.len() + extra.len(), "fetch_optional");
    let mut q = sqlx::query_as::<_, O>(sql);
    for v in fragment.values.iter().chain(extra.iter()) {
        q = bind_param(q, v);
    }
    Ok(q.fetch_optional(pool).await?)
}

fn bind_param<'q, O>(q: QueryAs<'q, O>, v: &'q Value) -> QueryAs<'q, O>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.as_str()),
        Value::Array(_) | Value::Object(_) => q.bind(sqlx::types::Json(v)),
    }
}
