use serde::Deserialize;
use serde_json::{Map, Value};

use super::{coerce_query, into_object, parse_body, FieldCheck, QueryKind};
use crate::error::ApiError;

const MAX_SALARY: i64 = i32::MAX as i64;

/// POST /jobs body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJob {
    pub title: String,
    pub salary: Option<i64>,
    pub equity: Option<f64>,
    pub company_handle: String,
}

impl NewJob {
    pub fn from_body(body: Value) -> Result<Self, ApiError> {
        let job: Self = parse_body(body, "job")?;
        FieldCheck::new()
            .length("title", Some(&job.title), 1, 200)
            .int_range("salary", job.salary, 0, MAX_SALARY)
            .float_range("equity", job.equity, 0.0, 1.0)
            .length("companyHandle", Some(&job.company_handle), 1, 25)
            .finish("Invalid job")?;
        Ok(job)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct JobUpdate {
    title: Option<String>,
    salary: Option<i64>,
    equity: Option<f64>,
}

/// PATCH /jobs/:id body. Neither the id nor the owning company can change.
pub fn job_update(body: Value) -> Result<Map<String, Value>, ApiError> {
    let data = into_object(body, "job update")?;
    let update: JobUpdate = parse_body(Value::Object(data.clone()), "job update")?;
    FieldCheck::new()
        .not_null(&data, &["title", "salary", "equity"])
        .length("title", update.title.as_deref(), 1, 200)
        .int_range("salary", update.salary, 0, MAX_SALARY)
        .float_range("equity", update.equity, 0.0, 1.0)
        .finish("Invalid job update")?;
    Ok(data)
}

/// GET /jobs query string
pub fn job_search(raw_query: Option<&str>) -> Result<Map<String, Value>, ApiError> {
    coerce_query(
        raw_query,
        &[
            ("title", QueryKind::Text),
            ("minSalary", QueryKind::NonNegativeInt),
            ("hasEquity", QueryKind::Bool),
        ],
    )
}
