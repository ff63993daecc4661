use std::collections::HashMap;

use serde_json::Value;

/// How a recognized filter key is compared against its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// `column >= $n`
    GreaterOrEqual,
    /// `column <= $n`
    LessOrEqual,
    /// `column ILIKE $n`, bound as `%value%`
    SubstringMatch,
    /// `column > 0` when the value is boolean `true`; binds nothing
    PositiveExistence,
}

impl Comparison {
    pub fn operator(&self) -> &'static str {
        match self {
            Comparison::GreaterOrEqual => ">=",
            Comparison::LessOrEqual => "<=",
            Comparison::SubstringMatch => "ILIKE",
            Comparison::PositiveExistence => ">",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterKey {
    pub column: String,
    pub comparison: Comparison,
}

/// The closed set of filter keys a resource accepts.
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    keys: HashMap<String, FilterKey>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, name: impl Into<String>, column: impl Into<String>, comparison: Comparison) -> Self {
        self.keys.insert(
            name.into(),
            FilterKey {
                column: column.into(),
                comparison,
            },
        );
        self
    }

    pub fn get(&self, name: &str) -> Option<&FilterKey> {
        self.keys.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.keys.contains_key(name)
    }
}

/// Maps API field names to storage columns. Unmapped fields are their own column.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    columns: HashMap<String, String>,
}

impl ColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map(mut self, field: impl Into<String>, column: impl Into<String>) -> Self {
        self.columns.insert(field.into(), column.into());
        self
    }

    pub fn column_for<'a>(&'a self, field: &'a str) -> &'a str {
        self.columns.get(field).map(String::as_str).unwrap_or(field)
    }
}

impl<F, C> FromIterator<(F, C)> for ColumnMap
where
    F: Into<String>,
    C: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (F, C)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().map(|(f, c)| (f.into(), c.into())).collect(),
        }
    }
}

/// A generated SQL fragment and the values for its `$n` placeholders, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFragment {
    pub clause: String,
    pub values: Vec<Value>,
}

impl SqlFragment {
    pub fn is_empty(&self) -> bool {
        self.clause.is_empty()
    }

    /// Placeholder for the first parameter a caller appends after these values.
    pub fn next_placeholder(&self) -> String {
        format!("${}", self.values.len() + 1)
    }
}
