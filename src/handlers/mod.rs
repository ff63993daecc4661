// handlers/mod.rs - route handlers, one module per resource
//
// Guards are applied in the router (see app.rs), so a handler only runs once
// its caller has been authorized.

pub mod auth;
pub mod companies;
pub mod health;
pub mod jobs;
pub mod users;

use crate::error::ApiError;

/// Fallback for unmatched routes
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not Found")
}
