use serde::Deserialize;
use serde_json::{Map, Value};

use super::{into_object, parse_body, FieldCheck};
use crate::error::ApiError;

/// POST /auth/token body
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserAuth {
    pub username: String,
    pub password: String,
}

impl UserAuth {
    pub fn from_body(body: Value) -> Result<Self, ApiError> {
        let auth: Self = parse_body(body, "credentials")?;
        FieldCheck::new()
            .length("username", Some(&auth.username), 1, 25)
            .length("password", Some(&auth.password), 1, 100)
            .finish("Invalid credentials")?;
        Ok(auth)
    }
}

/// New account, from POST /auth/register or POST /users
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl NewUser {
    /// Self-registration; `isAdmin` is not accepted
    pub fn from_register_body(body: Value) -> Result<Self, ApiError> {
        if body.get("isAdmin").is_some() {
            let mut check = FieldCheck::new();
            check.fail("isAdmin", "cannot be set when registering");
            check.finish("Invalid user")?;
        }
        Self::from_body(body)
    }

    /// Admin-created account; `isAdmin` is allowed
    pub fn from_admin_body(body: Value) -> Result<Self, ApiError> {
        Self::from_body(body)
    }

    fn from_body(body: Value) -> Result<Self, ApiError> {
        let user: Self = parse_body(body, "user")?;
        FieldCheck::new()
            .length("username", Some(&user.username), 1, 25)
            .length("password", Some(&user.password), 5, 20)
            .length("firstName", Some(&user.first_name), 1, 30)
            .length("lastName", Some(&user.last_name), 1, 30)
            .length("email", Some(&user.email), 6, 60)
            .email("email", Some(&user.email))
            .finish("Invalid user")?;
        Ok(user)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct UserUpdate {
    first_name: Option<String>,
    last_name: Option<String>,
    password: Option<String>,
    email: Option<String>,
    #[allow(dead_code)]
    is_admin: Option<bool>,
}

/// PATCH /users/:username body. Only admins may change `isAdmin`.
pub fn user_update(body: Value, allow_admin_flag: bool) -> Result<Map<String, Value>, ApiError> {
    let data = into_object(body, "user update")?;
    let update: UserUpdate = parse_body(Value::Object(data.clone()), "user update")?;

    let mut check = FieldCheck::new();
    if !allow_admin_flag && data.contains_key("isAdmin") {
        check.fail("isAdmin", "only admins may change this");
    }
    check
        .not_null(&data, &["firstName", "lastName", "password", "email", "isAdmin"])
        .length("firstName", update.first_name.as_deref(), 1, 30)
        .length("lastName", update.last_name.as_deref(), 1, 30)
        .length("password", update.password.as_deref(), 5, 20)
        .length("email", update.email.as_deref(), 6, 60)
        .email("email", update.email.as_deref())
        .finish("Invalid user update")?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_user() -> Value {
        json!({
            "username": "new",
            "firstName": "first",
            "lastName": "last",
            "password": "password",
            "email": "new@email.com"
        })
    }

    #[test]
    fn register_defaults_to_non_admin() {
        let user = NewUser::from_register_body(new_user()).unwrap();
        assert!(!user.is_admin);
    }

    #[test]
    fn register_refuses_admin_flag() {
        let mut body = new_user();
        body["isAdmin"] = json!(true);
        assert!(NewUser::from_register_body(body.clone()).is_err());
        assert!(NewUser::from_admin_body(body).unwrap().is_admin);
    }

    #[test]
    fn rejects_bad_email_and_short_password() {
        let mut body = new_user();
        body["email"] = json!("not-an-email");
        assert!(NewUser::from_register_body(body).is_err());

        let mut body = new_user();
        body["password"] = json!("pw");
        assert!(NewUser::from_register_body(body).is_err());
    }

    #[test]
    fn credentials_need_both_fields() {
        assert!(UserAuth::from_body(json!({ "username": "u1" })).is_err());
        assert!(UserAuth::from_body(json!({ "username": "u1", "password": "password1" })).is_ok());
        assert!(UserAuth::from_body(json!({ "username": 42, "password": "password1" })).is_err());
    }

    #[test]
    fn update_admin_flag_needs_admin() {
        assert!(user_update(json!({ "isAdmin": true }), false).is_err());
        assert!(user_update(json!({ "isAdmin": true }), true).is_ok());
    }

    #[test]
    fn update_cannot_rename() {
        assert!(user_update(json!({ "username": "other" }), true).is_err());
    }

    #[test]
    fn update_keeps_order() {
        let data = user_update(json!({ "lastName": "L", "firstName": "F" }), false).unwrap();
        let keys: Vec<&String> = data.keys().collect();
        assert_eq!(keys, vec!["lastName", "firstName"]);
    }
}
