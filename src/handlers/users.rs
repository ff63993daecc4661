// handlers/users.rs - /users handlers
//
// The collection routes are admin only. Per-user routes allow the user
// named in the path or an admin.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::app::AppState;
use crate::auth::create_token;
use crate::database::User;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::schemas::{read_json, user_update, NewUser};

#[derive(Debug, Serialize)]
pub struct UserWithToken {
    pub user: User,
    pub token: String,
}

/// POST /users - admin creates an account, optionally another admin
pub async fn user_post(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<UserWithToken> {
    let new_user = NewUser::from_admin_body(read_json(body)?)?;
    let user = User::register(&state.pool, new_user).await?;
    let token = create_token(&user.username, user.is_admin)?;
    Ok(ApiResponse::body(UserWithToken { user, token }).with_status(StatusCode::CREATED))
}

/// GET /users
pub async fn users_get(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let users = User::find_all(&state.pool).await?;
    Ok(ApiResponse::success("users", users))
}

/// GET /users/:username
pub async fn user_get(State(state): State<AppState>, Path(username): Path<String>) -> ApiResult<User> {
    let user = User::get(&state.pool, &username).await?;
    Ok(ApiResponse::success("user", user))
}

/// PATCH /users/:username
pub async fn user_patch(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(caller): Extension<AuthUser>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<User> {
    let data = user_update(read_json(body)?, caller.is_admin)?;
    let user = User::update(&state.pool, &username, &data).await?;
    Ok(ApiResponse::success("user", user))
}

/// DELETE /users/:username
pub async fn user_delete(State(state): State<AppState>, Path(username): Path<String>) -> ApiResult<String> {
    User::remove(&state.pool, &username).await?;
    Ok(ApiResponse::success("deleted", username))
}
