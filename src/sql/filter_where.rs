use serde_json::{Map, Value};

use super::error::SqlError;
use super::types::{Comparison, FilterKey, FilterSpec, SqlFragment};

/// Turns a filter map into a `WHERE` clause using the keys `spec` recognizes.
///
/// Keys are processed in the map's iteration order. An empty map, or one whose
/// keys all emit nothing, yields an empty clause so callers can splice it
/// after `FROM` unconditionally.
pub fn sql_for_where(filters: &Map<String, Value>, spec: &FilterSpec) -> Result<SqlFragment, SqlError> {
    FilterWhere::new().build(filters, spec)
}

struct FilterWhere {
    param_values: Vec<Value>,
    param_index: usize,
    conditions: Vec<String>,
}

impl FilterWhere {
    fn new() -> Self {
        Self {
            param_values: vec![],
            param_index: 0,
            conditions: vec![],
        }
    }

    fn build(mut self, filters: &Map<String, Value>, spec: &FilterSpec) -> Result<SqlFragment, SqlError> {
        for (name, value) in filters {
            let key = spec
                .get(name)
                .ok_or_else(|| SqlError::UnrecognizedFilterKey(name.clone()))?;
            if let Some(sql) = self.build_condition(key, value) {
                self.conditions.push(sql);
            }
        }

        if self.conditions.is_empty() {
            return Ok(SqlFragment::default());
        }

        Ok(SqlFragment {
            clause: format!("WHERE {}", self.conditions.join(" AND ")),
            values: self.param_values,
        })
    }

    fn build_condition(&mut self, key: &FilterKey, value: &Value) -> Option<String> {
        let op = key.comparison.operator();
        match key.comparison {
            Comparison::GreaterOrEqual | Comparison::LessOrEqual => {
                Some(format!("{} {} {}", key.column, op, self.param(value.clone())))
            }
            Comparison::SubstringMatch => {
                let pattern = match value {
                    Value::String(s) => format!("%{}%", s),
                    other => format!("%{}%", other),
                };
                Some(format!("{} {} {}", key.column, op, self.param(Value::String(pattern))))
            }
            Comparison::PositiveExistence => match value {
                Value::Bool(true) => Some(format!("{} {} 0", key.column, op)),
                _ => None,
            },
        }
    }

    fn param(&mut self, value: Value) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}
