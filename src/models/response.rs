// src/models/response.rs

use axum::http::StatusCode;
use serde::Serialize;

/// Envelope wrapping every API response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub code: u16,
    pub msg: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(status: StatusCode, msg: impl Into<String>, data: Option<T>) -> Self {
        Self {
            code: status.as_u16(),
            msg: msg.into(),
            data,
        }
    }

    pub fn ok(data: T) -> Self {
        Self::success(StatusCode::OK, "", Some(data))
    }
}

impl ApiResponse<()> {
    pub fn failure(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            code: status.as_u16(),
            msg: msg.into(),
            data: None,
        }
    }
}
