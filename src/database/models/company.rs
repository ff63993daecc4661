use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::{FromRow, PgPool};

use super::{duplicate_or, JobSummary};
use crate::database::manager::DatabaseError;
use crate::database::query_builder;
use crate::schemas::NewCompany;
use crate::sql::{sql_for_partial_update, sql_for_where, ColumnMap, Comparison, FilterSpec, SqlError};

const COLUMNS: &str = "handle, name, description, num_employees, logo_url";

static COMPANY_FILTERS: Lazy<FilterSpec> = Lazy::new(|| {
    FilterSpec::new()
        .key("minEmployees", "num_employees", Comparison::GreaterOrEqual)
        .key("maxEmployees", "num_employees", Comparison::LessOrEqual)
        .key("nameLike", "name", Comparison::SubstringMatch)
});

static COMPANY_COLUMNS: Lazy<ColumnMap> = Lazy::new(|| {
    ColumnMap::new()
        .map("numEmployees", "num_employees")
        .map("logoUrl", "logo_url")
});

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// A company together with its open jobs
#[derive(Debug, Clone, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<JobSummary>,
}

impl Company {
    pub async fn create(pool: &PgPool, data: NewCompany) -> Result<Company, DatabaseError> {
        let existing = sqlx::query_scalar::<_, String>("SELECT handle FROM companies WHERE handle = $1")
            .bind(&data.handle)
            .fetch_optional(pool)
            .await?;
        if existing.is_some() {
            return Err(DatabaseError::Duplicate(format!("Duplicate company: {}", data.handle)));
        }

        let sql = format!(
            "INSERT INTO companies (handle, name, description, num_employees, logo_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            COLUMNS
        );
        sqlx::query_as::<_, Company>(&sql)
            .bind(&data.handle)
            .bind(&data.name)
            .bind(&data.description)
            .bind(data.num_employees)
            .bind(&data.logo_url)
            .fetch_one(pool)
            .await
            .map_err(|e| duplicate_or(e, || format!("Duplicate company: {}", data.handle)))
    }

    /// All companies matching `filters`, ordered by name
    pub async fn find_all(pool: &PgPool, filters: &Map<String, Value>) -> Result<Vec<Company>, DatabaseError> {
        check_employee_range(filters)?;
        let fragment = sql_for_where(filters, &COMPANY_FILTERS)?;
        let sql = format!("SELECT {} FROM companies {} ORDER BY name", COLUMNS, fragment.clause);
        query_builder::fetch_all(pool, &sql, &fragment).await
    }

    pub async fn get(pool: &PgPool, handle: &str) -> Result<CompanyDetail, DatabaseError> {
        let sql = format!("SELECT {} FROM companies WHERE handle = $1", COLUMNS);
        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(handle)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| not_found(handle))?;

        let jobs = JobSummary::for_company(pool, handle).await?;
        Ok(CompanyDetail { company, jobs })
    }

    pub async fn update(pool: &PgPool, handle: &str, data: &Map<String, Value>) -> Result<Company, DatabaseError> {
        let fragment = sql_for_partial_update(data, &COMPANY_COLUMNS)?;
        let sql = format!(
            "UPDATE companies SET {} WHERE handle = {} RETURNING {}",
            fragment.clause,
            fragment.next_placeholder(),
            COLUMNS
        );
        query_builder::fetch_optional(pool, &sql, &fragment, &[Value::from(handle)])
            .await
            .map_err(|e| match e {
                DatabaseError::Sqlx(err) => duplicate_or(err, || "Duplicate company name".to_string()),
                other => other,
            })?
            .ok_or_else(|| not_found(handle))
    }

    pub async fn remove(pool: &PgPool, handle: &str) -> Result<(), DatabaseError> {
        let removed = sqlx::query_scalar::<_, String>("DELETE FROM companies WHERE handle = $1 RETURNING handle")
            .bind(handle)
            .fetch_optional(pool)
            .await?;
        removed.map(|_| ()).ok_or_else(|| not_found(handle))
    }
}

fn not_found(handle: &str) -> DatabaseError {
    DatabaseError::NotFound(format!("No company: {}", handle))
}

/// `minEmployees` may not exceed `maxEmployees`
fn check_employee_range(filters: &Map<String, Value>) -> Result<(), SqlError> {
    let min = filters.get("minEmployees").and_then(Value::as_i64);
    let max = filters.get("maxEmployees").and_then(Value::as_i64);
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(SqlError::BadRange {
            min_key: "minEmployees",
            max_key: "maxEmployees",
            min,
            max,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filters(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn range_rejects_min_above_max() {
        let err = check_employee_range(&filters(json!({ "minEmployees": 10, "maxEmployees": 2 }))).unwrap_err();
        assert!(matches!(err, SqlError::BadRange { min: 10, max: 2, .. }));
    }

    #[test]
    fn range_allows_equal_or_one_sided() {
        assert!(check_employee_range(&filters(json!({ "minEmployees": 2, "maxEmployees": 2 }))).is_ok());
        assert!(check_employee_range(&filters(json!({ "minEmployees": 200 }))).is_ok());
        assert!(check_employee_range(&filters(json!({}))).is_ok());
    }

    #[test]
    fn company_filters_build_where() {
        let fragment = sql_for_where(
            &filters(json!({ "nameLike": "net", "minEmployees": 10 })),
            &COMPANY_FILTERS,
        )
        .unwrap();
        assert_eq!(fragment.clause, "WHERE name ILIKE $1 AND num_employees >= $2");
        assert_eq!(fragment.values, vec![json!("%net%"), json!(10)]);
    }

    #[test]
    fn company_columns_map_fields() {
        let fragment = sql_for_partial_update(
            &filters(json!({ "numEmployees": 5, "logoUrl": "http://c1.img" })),
            &COMPANY_COLUMNS,
        )
        .unwrap();
        assert_eq!(fragment.clause, "\"num_employees\"=$1, \"logo_url\"=$2");
        assert_eq!(fragment.next_placeholder(), "$3");
    }

    #[test]
    fn detail_flattens_company() {
        let detail = CompanyDetail {
            company: Company {
                handle: "c1".into(),
                name: "C1".into(),
                description: "Desc1".into(),
                num_employees: Some(1),
                logo_url: None,
            },
            jobs: vec![],
        };
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["handle"], "c1");
        assert_eq!(value["numEmployees"], 1);
        assert!(value["logoUrl"].is_null());
        assert_eq!(value["jobs"], json!([]));
    }
}
