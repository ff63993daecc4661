use serde::Deserialize;
use serde_json::{Map, Value};

use super::{coerce_query, into_object, parse_body, FieldCheck, QueryKind};
use crate::error::ApiError;

const MAX_EMPLOYEES: i64 = i32::MAX as i64;

/// POST /companies body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i64>,
    pub logo_url: Option<String>,
}

impl NewCompany {
    pub fn from_body(body: Value) -> Result<Self, ApiError> {
        let company: Self = parse_body(body, "company")?;
        FieldCheck::new()
            .length("handle", Some(&company.handle), 1, 25)
            .length("name", Some(&company.name), 1, 100)
            .int_range("numEmployees", company.num_employees, 0, MAX_EMPLOYEES)
            .url("logoUrl", company.logo_url.as_deref())
            .finish("Invalid company")?;
        Ok(company)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct CompanyUpdate {
    name: Option<String>,
    #[allow(dead_code)]
    description: Option<String>,
    num_employees: Option<i64>,
    logo_url: Option<String>,
}

/// PATCH /companies/:handle body, validated and kept in client order.
/// The handle itself cannot be changed.
pub fn company_update(body: Value) -> Result<Map<String, Value>, ApiError> {
    let data = into_object(body, "company update")?;
    let update: CompanyUpdate = parse_body(Value::Object(data.clone()), "company update")?;
    FieldCheck::new()
        .not_null(&data, &["name", "description", "numEmployees", "logoUrl"])
        .length("name", update.name.as_deref(), 1, 100)
        .int_range("numEmployees", update.num_employees, 0, MAX_EMPLOYEES)
        .url("logoUrl", update.logo_url.as_deref())
        .finish("Invalid company update")?;
    Ok(data)
}

/// GET /companies query string
pub fn company_search(raw_query: Option<&str>) -> Result<Map<String, Value>, ApiError> {
    coerce_query(
        raw_query,
        &[
            ("minEmployees", QueryKind::NonNegativeInt),
            ("maxEmployees", QueryKind::NonNegativeInt),
            ("nameLike", QueryKind::Text),
        ],
    )
}
