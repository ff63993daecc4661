use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::{FromRow, PgPool};
use tracing::warn;

use super::duplicate_or;
use crate::auth::password::{hash_password, verify_password};
use crate::database::manager::DatabaseError;
use crate::database::query_builder;
use crate::schemas::NewUser;
use crate::sql::{sql_for_partial_update, ColumnMap, SqlFragment};

const COLUMNS: &str = "username, first_name, last_name, email, is_admin";

static USER_COLUMNS: Lazy<ColumnMap> = Lazy::new(|| {
    ColumnMap::new()
        .map("firstName", "first_name")
        .map("lastName", "last_name")
        .map("isAdmin", "is_admin")
});

/// Public view of an account. The password hash is never part of it.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

#[derive(FromRow)]
struct StoredUser {
    #[sqlx(flatten)]
    user: User,
    password: String,
}

impl User {
    /// Check a username/password pair, returning the account on success
    pub async fn authenticate(pool: &PgPool, username: &str, password: &str) -> Result<User, DatabaseError> {
        let sql = format!("SELECT {}, password FROM users WHERE username = $1", COLUMNS);
        let stored = sqlx::query_as::<_, StoredUser>(&sql)
            .bind(username)
            .fetch_optional(pool)
            .await?;

        match stored {
            Some(stored) if verify_password(&stored.password, password) => Ok(stored.user),
            _ => {
                warn!("Failed login for user: {}", username);
                Err(DatabaseError::InvalidCredentials)
            }
        }
    }

    pub async fn register(pool: &PgPool, data: NewUser) -> Result<User, DatabaseError> {
        let existing = sqlx::query_scalar::<_, String>("SELECT username FROM users WHERE username = $1")
            .bind(&data.username)
            .fetch_optional(pool)
            .await?;
        if existing.is_some() {
            return Err(duplicate(&data.username));
        }

        let hashed = hash_password(&data.password).map_err(|e| DatabaseError::PasswordHash(e.to_string()))?;
        let sql = format!(
            "INSERT INTO users (username, password, first_name, last_name, email, is_admin)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&data.username)
            .bind(&hashed)
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(&data.email)
            .bind(data.is_admin)
            .fetch_one(pool)
            .await
            .map_err(|e| duplicate_or(e, || duplicate(&data.username).to_string()))
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users ORDER BY username", COLUMNS);
        query_builder::fetch_all(pool, &sql, &SqlFragment::default()).await
    }

    pub async fn get(pool: &PgPool, username: &str) -> Result<User, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| not_found(username))
    }

    /// Partial update; a new password is hashed before it is stored
    pub async fn update(pool: &PgPool, username: &str, data: &Map<String, Value>) -> Result<User, DatabaseError> {
        let data = with_hashed_password(data)?;
        let fragment = sql_for_partial_update(&data, &USER_COLUMNS)?;
        let sql = format!(
            "UPDATE users SET {} WHERE username = {} RETURNING {}",
            fragment.clause,
            fragment.next_placeholder(),
            COLUMNS
        );
        query_builder::fetch_optional(pool, &sql, &fragment, &[Value::from(username)])
            .await?
            .ok_or_else(|| not_found(username))
    }

    pub async fn remove(pool: &PgPool, username: &str) -> Result<(), DatabaseError> {
        let removed = sqlx::query_scalar::<_, String>("DELETE FROM users WHERE username = $1 RETURNING username")
            .bind(username)
            .fetch_optional(pool)
            .await?;
        removed.map(|_| ()).ok_or_else(|| not_found(username))
    }
}

fn with_hashed_password(data: &Map<String, Value>) -> Result<Map<String, Value>, DatabaseError> {
    let mut data = data.clone();
    if let Some(Value::String(plain)) = data.get("password") {
        let hashed = hash_password(plain).map_err(|e| DatabaseError::PasswordHash(e.to_string()))?;
        data.insert("password".to_string(), Value::String(hashed));
    }
    Ok(data)
}

fn duplicate(username: &str) -> DatabaseError {
    DatabaseError::Duplicate(format!("Duplicate username: {}", username))
}

fn not_found(username: &str) -> DatabaseError {
    DatabaseError::NotFound(format!("No user: {}", username))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn password_is_hashed_in_place() {
        let data = json!({ "firstName": "New", "password": "new-password", "email": "u1@email.com" });
        let hashed = with_hashed_password(data.as_object().unwrap()).unwrap();

        let keys: Vec<&String> = hashed.keys().collect();
        assert_eq!(keys, vec!["firstName", "password", "email"]);
        let stored = hashed["password"].as_str().unwrap();
        assert_ne!(stored, "new-password");
        assert!(verify_password(stored, "new-password"));
    }

    #[test]
    fn update_without_password_is_unchanged() {
        let data = json!({ "lastName": "L" });
        let same = with_hashed_password(data.as_object().unwrap()).unwrap();
        assert_eq!(Value::Object(same), data);
    }

    #[test]
    fn user_columns_map_fields() {
        let data = json!({ "firstName": "Aliya", "isAdmin": true });
        let fragment = sql_for_partial_update(data.as_object().unwrap(), &USER_COLUMNS).unwrap();
        assert_eq!(fragment.clause, "\"first_name\"=$1, \"is_admin\"=$2");
    }

    #[test]
    fn serialized_user_has_no_password() {
        let user = User {
            username: "u1".into(),
            first_name: "U1F".into(),
            last_name: "U1L".into(),
            email: "user1@user.com".into(),
            is_admin: false,
        };
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["firstName"], "U1F");
        assert_eq!(value["isAdmin"], false);
    }
}
