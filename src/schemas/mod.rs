//! Request schemas: typed bodies with closed field sets, plus the checks a
//! JSON schema would carry (lengths, ranges, formats).
//!
//! Update bodies stay as insertion-ordered JSON maps after validation so the
//! partial-update builder sees fields in the order the client sent them.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{ApiError, FieldErrors};

pub mod company;
pub mod job;
pub mod user;

pub use company::{company_search, company_update, NewCompany};
pub use job::{job_search, job_update, NewJob};
pub use user::{user_update, NewUser, UserAuth};

/// Unwrap an axum JSON body, turning rejections into our error shape
pub fn read_json(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(ApiError::invalid_json(rejection.body_text())),
    }
}

/// Deserialize a body into its typed schema; unknown or mistyped fields fail
pub fn parse_body<T: DeserializeOwned>(body: Value, what: &str) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|e| ApiError::validation_error(format!("Invalid {}: {}", what, e), None))
}

pub fn into_object(body: Value, what: &str) -> Result<Map<String, Value>, ApiError> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::validation_error(format!("Invalid {}: expected a JSON object", what), None)),
    }
}

/// Collects per-field problems and reports them together
#[derive(Debug, Default)]
pub struct FieldCheck {
    errors: FieldErrors,
}

impl FieldCheck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&mut self, field: &str, problem: impl Into<String>) -> &mut Self {
        self.errors.entry(field.to_string()).or_insert_with(|| problem.into());
        self
    }

    pub fn length(&mut self, field: &str, value: Option<&str>, min: usize, max: usize) -> &mut Self {
        if let Some(value) = value {
            let len = value.chars().count();
            if len < min || len > max {
                self.fail(field, format!("must be between {} and {} characters", min, max));
            }
        }
        self
    }

    pub fn int_range(&mut self, field: &str, value: Option<i64>, min: i64, max: i64) -> &mut Self {
        if let Some(value) = value {
            if value < min || value > max {
                self.fail(field, format!("must be between {} and {}", min, max));
            }
        }
        self
    }

    pub fn float_range(&mut self, field: &str, value: Option<f64>, min: f64, max: f64) -> &mut Self {
        if let Some(value) = value {
            if !(min..=max).contains(&value) {
                self.fail(field, format!("must be between {} and {}", min, max));
            }
        }
        self
    }

    pub fn url(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            if url::Url::parse(value).is_err() {
                self.fail(field, "must be a valid URL");
            }
        }
        self
    }

    pub fn email(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            let valid = match value.split_once('@') {
                Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.contains('@'),
                None => false,
            };
            if !valid {
                self.fail(field, "must be a valid email address");
            }
        }
        self
    }

    /// `null` is never a valid update value for the listed fields
    pub fn not_null(&mut self, map: &Map<String, Value>, fields: &[&str]) -> &mut Self {
        for field in fields {
            if matches!(map.get(*field), Some(Value::Null)) {
                self.fail(field, "must not be null");
            }
        }
        self
    }

    pub fn finish(&mut self, message: &str) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            return Ok(());
        }
        Err(ApiError::validation_error(message, Some(std::mem::take(&mut self.errors))))
    }
}

/// How a query-string filter value is coerced before reaching the builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    NonNegativeInt,
    Bool,
    Text,
}

/// Parse a raw query string into an ordered filter map.
///
/// Known keys are coerced per `kinds`; unknown keys are kept as strings so
/// the filter builder can reject them by name.
pub fn coerce_query(raw: Option<&str>, kinds: &[(&str, QueryKind)]) -> Result<Map<String, Value>, ApiError> {
    let mut filters = Map::new();
    let mut check = FieldCheck::new();

    for (key, value) in url::form_urlencoded::parse(raw.unwrap_or("").as_bytes()) {
        let kind = kinds.iter().find(|(name, _)| *name == &*key).map(|(_, kind)| *kind);
        let coerced = match kind {
            Some(QueryKind::NonNegativeInt) => match value.trim().parse::<i64>() {
                Ok(n) if n >= 0 => Value::from(n),
                _ => {
                    check.fail(&key, "must be a non-negative integer");
                    continue;
                }
            },
            Some(QueryKind::Bool) => match &*value {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => {
                    check.fail(&key, "must be true or false");
                    continue;
                }
            },
            Some(QueryKind::Text) => {
                if value.is_empty() {
                    check.fail(&key, "must not be empty");
                    continue;
                }
                Value::String(value.into_owned())
            }
            None => Value::String(value.into_owned()),
        };
        filters.insert(key.into_owned(), coerced);
    }

    check.finish("Invalid search filters")?;
    Ok(filters)
}
