// handlers/auth.rs - POST /auth/token and POST /auth/register

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;

use crate::app::AppState;
use crate::auth::create_token;
use crate::database::User;
use crate::middleware::{ApiResponse, ApiResult};
use crate::schemas::{read_json, NewUser, UserAuth};

/// POST /auth/token - exchange `{ username, password }` for a JWT
pub async fn token_post(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<String> {
    let credentials = UserAuth::from_body(read_json(body)?)?;
    let user = User::authenticate(&state.pool, &credentials.username, &credentials.password).await?;
    let token = create_token(&user.username, user.is_admin)?;
    Ok(ApiResponse::success("token", token))
}

/// POST /auth/register - create a regular account and log it in
pub async fn register_post(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<String> {
    let new_user = NewUser::from_register_body(read_json(body)?)?;
    let user = User::register(&state.pool, new_user).await?;
    tracing::info!("Registered user: {}", user.username);
    let token = create_token(&user.username, user.is_admin)?;
    Ok(ApiResponse::created("token", token))
}
