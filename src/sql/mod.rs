pub mod types;
pub mod partial_update;
pub mod filter_where;
pub mod error;

pub use error::SqlError;
pub use filter_where::sql_for_where;
pub use partial_update::sql_for_partial_update;
pub use types::*;
