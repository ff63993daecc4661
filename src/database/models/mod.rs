pub mod company;
pub mod job;
pub mod user;

pub use company::{Company, CompanyDetail};
pub use job::{Job, JobSummary};
pub use user::User;

use crate::database::manager::DatabaseError;

/// Map a unique-constraint failure to `Duplicate`, anything else to `Sqlx`
pub(crate) fn duplicate_or(err: sqlx::Error, message: impl FnOnce() -> String) -> DatabaseError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => DatabaseError::Duplicate(message()),
        _ => DatabaseError::Sqlx(err),
    }
}
