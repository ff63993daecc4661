use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SqlError {
    #[error("No data")]
    NoData,

    #[error("Wrong key for filter: {0}")]
    UnrecognizedFilterKey(String),

    #[error("{min_key} ({min}) must not be greater than {max_key} ({max})")]
    BadRange {
        min_key: &'static str,
        max_key: &'static str,
        min: i64,
        max: i64,
    },
}
