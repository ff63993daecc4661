use axum::{
    extract::{Path, Request},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::{self, Claims};
use crate::error::ApiError;

/// Authenticated user context extracted from JWT
#[derive(Clone, Debug, PartialEq)]
pub struct AuthUser {
    pub username: String,
    pub is_admin: bool,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.username,
            is_admin: claims.is_admin,
        }
    }
}

/// Stores the token's user in the request extensions when a valid bearer
/// token is present. A missing or bad token is not an error here; the guards
/// below decide what a route requires.
pub async fn authenticate_jwt(mut request: Request, next: Next) -> Response {
    if let Some(user) = user_from_headers(request.headers()) {
        request.extensions_mut().insert(user);
    }
    next.run(request).await
}

/// Route guard: any logged-in user
pub async fn ensure_logged_in(request: Request, next: Next) -> Result<Response, ApiError> {
    require_logged_in(request.extensions().get::<AuthUser>())?;
    Ok(next.run(request).await)
}

/// Route guard: admins only
pub async fn ensure_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    require_admin(request.extensions().get::<AuthUser>())?;
    Ok(next.run(request).await)
}

/// Route guard: the user named in the path, or an admin
pub async fn ensure_correct_user_or_admin(
    Path(username): Path<String>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    require_correct_user_or_admin(request.extensions().get::<AuthUser>(), &username)?;
    Ok(next.run(request).await)
}

pub fn user_from_headers(headers: &HeaderMap) -> Option<AuthUser> {
    let token = extract_bearer_token(headers)?;
    match auth::decode_token(&token) {
        Ok(claims) => Some(claims.into()),
        Err(e) => {
            tracing::debug!("Ignoring invalid token: {}", e);
            None
        }
    }
}

/// `Bearer <jwt>` or `bearer <jwt>`
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_str = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth_str
        .strip_prefix("Bearer ")
        .or_else(|| auth_str.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

pub fn require_logged_in(user: Option<&AuthUser>) -> Result<&AuthUser, ApiError> {
    match user {
        Some(user) if !user.username.is_empty() => Ok(user),
        _ => Err(ApiError::unauthorized("Unauthorized")),
    }
}

pub fn require_admin(user: Option<&AuthUser>) -> Result<&AuthUser, ApiError> {
    match user {
        Some(user) if user.is_admin => Ok(user),
        Some(user) => {
            tracing::warn!("Admin route refused for user '{}'", user.username);
            Err(ApiError::unauthorized("Unauthorized"))
        }
        None => Err(ApiError::unauthorized("Unauthorized")),
    }
}

pub fn require_correct_user_or_admin<'a>(user: Option<&'a AuthUser>, username: &str) -> Result<&'a AuthUser, ApiError> {
    match user {
        Some(user) if user.is_admin || user.username == username => Ok(user),
        _ => Err(ApiError::unauthorized("Must be a valid user")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::AUTHORIZATION, HeaderValue, StatusCode};

    fn user(username: &str, is_admin: bool) -> AuthUser {
        AuthUser {
            username: username.to_string(),
            is_admin,
        }
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn reads_user_from_bearer_header() {
        let token = auth::create_token("test", false).unwrap();
        let found = user_from_headers(&headers_with(&format!("Bearer {}", token)));
        assert_eq!(found, Some(user("test", false)));

        let found = user_from_headers(&headers_with(&format!("bearer {}", token)));
        assert_eq!(found, Some(user("test", false)));
    }

    #[test]
    fn no_header_means_no_user() {
        assert_eq!(user_from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn invalid_token_means_no_user() {
        assert_eq!(user_from_headers(&headers_with("Bearer not.a.jwt")), None);
        assert_eq!(user_from_headers(&headers_with("Basic dXNlcjpwYXNz")), None);
        assert_eq!(user_from_headers(&headers_with("Bearer   ")), None);
    }

    #[test]
    fn logged_in() {
        assert!(require_logged_in(Some(&user("test", false))).is_ok());

        let err = require_logged_in(None).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        assert!(require_logged_in(Some(&user("", false))).is_err());
    }

    #[test]
    fn admin() {
        assert!(require_admin(Some(&user("test", true))).is_ok());
        assert!(require_admin(Some(&user("test", false))).is_err());
        assert!(require_admin(None).is_err());
    }

    #[test]
    fn correct_user_or_admin() {
        assert!(require_correct_user_or_admin(Some(&user("test", false)), "test").is_ok());
        assert!(require_correct_user_or_admin(Some(&user("test2", true)), "test").is_ok());

        let err = require_correct_user_or_admin(Some(&user("test2", false)), "test").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), "Must be a valid user");

        assert!(require_correct_user_or_admin(None, "test").is_err());
    }
}
