use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::{FromRow, PgPool};

use crate::database::manager::DatabaseError;
use crate::database::query_builder;
use crate::schemas::NewJob;
use crate::sql::{sql_for_partial_update, sql_for_where, ColumnMap, Comparison, FilterSpec};

// NUMERIC comes back as text so it keeps its exact decimal form
const COLUMNS: &str = "id, title, salary, equity::TEXT AS equity, company_handle";

static JOB_FILTERS: Lazy<FilterSpec> = Lazy::new(|| {
    FilterSpec::new()
        .key("title", "title", Comparison::SubstringMatch)
        .key("minSalary", "salary", Comparison::GreaterOrEqual)
        .key("hasEquity", "equity", Comparison::PositiveExistence)
});

// title, salary and equity are already column names
static JOB_COLUMNS: Lazy<ColumnMap> = Lazy::new(ColumnMap::new);

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<String>,
    pub company_handle: String,
}

/// A job as listed under its company
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JobSummary {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<String>,
}

impl JobSummary {
    pub async fn for_company(pool: &PgPool, handle: &str) -> Result<Vec<JobSummary>, DatabaseError> {
        Ok(sqlx::query_as::<_, JobSummary>(
            "SELECT id, title, salary, equity::TEXT AS equity
             FROM jobs
             WHERE company_handle = $1
             ORDER BY id",
        )
        .bind(handle)
        .fetch_all(pool)
        .await?)
    }
}

impl Job {
    pub async fn create(pool: &PgPool, data: NewJob) -> Result<Job, DatabaseError> {
        let company = sqlx::query_scalar::<_, String>("SELECT handle FROM companies WHERE handle = $1")
            .bind(&data.company_handle)
            .fetch_optional(pool)
            .await?;
        if company.is_none() {
            return Err(DatabaseError::InvalidReference(format!(
                "No company: {}",
                data.company_handle
            )));
        }

        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            COLUMNS
        );
        Ok(sqlx::query_as::<_, Job>(&sql)
            .bind(&data.title)
            .bind(data.salary)
            .bind(data.equity)
            .bind(&data.company_handle)
            .fetch_one(pool)
            .await?)
    }

    /// All jobs matching `filters`, ordered by company then title
    pub async fn find_all(pool: &PgPool, filters: &Map<String, Value>) -> Result<Vec<Job>, DatabaseError> {
        let fragment = sql_for_where(filters, &JOB_FILTERS)?;
        let sql = format!(
            "SELECT {} FROM jobs {} ORDER BY company_handle, title",
            COLUMNS, fragment.clause
        );
        query_builder::fetch_all(pool, &sql, &fragment).await
    }

    pub async fn get(pool: &PgPool, id: i32) -> Result<Job, DatabaseError> {
        let sql = format!("SELECT {} FROM jobs WHERE id = $1", COLUMNS);
        sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn update(pool: &PgPool, id: i32, data: &Map<String, Value>) -> Result<Job, DatabaseError> {
        let fragment = sql_for_partial_update(data, &JOB_COLUMNS)?;
        let sql = format!(
            "UPDATE jobs SET {} WHERE id = {} RETURNING {}",
            fragment.clause,
            fragment.next_placeholder(),
            COLUMNS
        );
        query_builder::fetch_optional(pool, &sql, &fragment, &[Value::from(id)])
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn remove(pool: &PgPool, id: i32) -> Result<(), DatabaseError> {
        let removed = sqlx::query_scalar::<_, i32>("DELETE FROM jobs WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        removed.map(|_| ()).ok_or_else(|| not_found(id))
    }
}

pub(crate) fn not_found(id: impl std::fmt::Display) -> DatabaseError {
    DatabaseError::NotFound(format!("No job: {}", id))
}
