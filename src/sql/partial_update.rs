use serde_json::{Map, Value};

use super::error::SqlError;
use super::types::{ColumnMap, SqlFragment};

/// Builds the `SET` list of a partial update.
///
/// Every field in `data` becomes `"<column>"=$n`, numbered in iteration order,
/// and its value is appended to the fragment values in the same order:
///
/// ```text
/// { firstName: "Aliya", age: 32 }  =>  "first_name"=$1, "age"=$2   ["Aliya", 32]
/// ```
///
/// Column names come from `columns` and are never taken from request input.
pub fn sql_for_partial_update(data: &Map<String, Value>, columns: &ColumnMap) -> Result<SqlFragment, SqlError> {
    if data.is_empty() {
        return Err(SqlError::NoData);
    }

    let mut cols = Vec::with_capacity(data.len());
    let mut values = Vec::with_capacity(data.len());
    for (idx, (field, value)) in data.iter().enumerate() {
        cols.push(format!("\"{}\"=${}", columns.column_for(field), idx + 1));
        values.push(value.clone());
    }

    Ok(SqlFragment {
        clause: cols.join(", "),
        values,
    })
}
