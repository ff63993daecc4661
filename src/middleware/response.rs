use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};

/// Successful response. With a key the body is `{ "<key>": data }`,
/// otherwise `data` is the whole body.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub key: Option<&'static str>,
    pub data: T,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK with `{ key: data }`
    pub fn success(key: &'static str, data: T) -> Self {
        Self {
            key: Some(key),
            data,
            status_code: None, // Default to 200 OK
        }
    }

    /// 201 Created with `{ key: data }`
    pub fn created(key: &'static str, data: T) -> Self {
        Self::success(key, data).with_status(StatusCode::CREATED)
    }

    /// `data` serialized as the full body
    pub fn body(data: T) -> Self {
        Self {
            key: None,
            data,
            status_code: None,
        }
    }

    pub fn with_status(mut self, status_code: StatusCode) -> Self {
        self.status_code = Some(status_code);
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                let error = crate::error::ApiError::internal_server_error("Failed to serialize response data");
                return error.into_response();
            }
        };

        let body: Value = match self.key {
            Some(key) => {
                let mut envelope = Map::new();
                envelope.insert(key.to_string(), data_value);
                Value::Object(envelope)
            }
            None => data_value,
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
