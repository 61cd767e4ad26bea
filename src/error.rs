// src/error.rs

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use crate::models::response::ApiResponse;

/// Failure kinds surfaced by the store and report layers.
///
/// These are the integration contract with the transport: the core never
/// produces user-facing text, only one of these variants.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// Malformed or missing caller input, rejected before touching the store.
    #[error("validation error: {0}")]
    Validation(String),

    /// Task, question, or student/task pair absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// An answer for the same (student, task, question) already exists.
    #[error("duplicate submission by {student_id} for task {task_id}")]
    DuplicateSubmission { student_id: String, task_id: String },

    /// Answers were pushed for a task the student never fetched.
    #[error("no fetch recorded for {student_id} on task {task_id}")]
    NoSuchFetch { student_id: String, task_id: String },

    /// A stored timestamp could not be parsed or is out of order.
    #[error("invalid timing: {0}")]
    InvalidTiming(String),

    /// Every identifier candidate collided.
    #[error("identifier allocation exhausted after {0} attempts")]
    AllocationExhausted(u32),

    #[error("store error: {0}")]
    Store(sqlx::Error),
}

impl From<sqlx::Error> for TaskError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => TaskError::NotFound("row not found".to_string()),
            other => TaskError::Store(other),
        }
    }
}

/// Returns true when the error is a violation of a UNIQUE or PRIMARY KEY constraint.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

/// Transport error. Renders the `{code, msg, data}` envelope.
#[derive(Debug)]
pub enum AppError {
    // 422 Unprocessable Entity
    Validation(String),

    // 500 Internal Server Error, with a message naming the failed operation
    Operation {
        message: &'static str,
        source: TaskError,
    },
}

impl AppError {
    /// Wraps a core failure with the message shown when the operation fails.
    pub fn operation(message: &'static str) -> impl FnOnce(TaskError) -> AppError {
        move |source| AppError::Operation { message, source }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "validation failed: {}", msg),
            AppError::Operation { message, source } => write!(f, "{}: {}", message, source),
        }
    }
}

impl std::error::Error for AppError {}

pub const INVALID_REQUEST_MESSAGE: &str = "malformed request or missing required parameters";
pub const DUPLICATE_SUBMISSION_MESSAGE: &str = "duplicate submission is not allowed";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => {
                tracing::debug!("Rejected request: {}", msg);
                (StatusCode::UNPROCESSABLE_ENTITY, INVALID_REQUEST_MESSAGE)
            }
            AppError::Operation {
                source: TaskError::Validation(msg),
                ..
            } => {
                tracing::debug!("Rejected request: {}", msg);
                (StatusCode::UNPROCESSABLE_ENTITY, INVALID_REQUEST_MESSAGE)
            }
            AppError::Operation {
                source: source @ TaskError::DuplicateSubmission { .. },
                ..
            } => {
                tracing::warn!("{}", source);
                (StatusCode::INTERNAL_SERVER_ERROR, DUPLICATE_SUBMISSION_MESSAGE)
            }
            AppError::Operation { message, source } => {
                tracing::error!("{}: {}", message, source);
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        let body = Json(ApiResponse::<()>::failure(status, message));
        (status, body).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::Validation(err.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(err: QueryRejection) -> Self {
        AppError::Validation(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_becomes_not_found() {
        let err: TaskError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, TaskError::NotFound(_)));
    }

    #[test]
    fn other_sqlx_errors_are_store_errors() {
        let err: TaskError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, TaskError::Store(_)));
        assert!(!is_unique_violation(&sqlx::Error::PoolTimedOut));
    }

    #[test]
    fn duplicate_submission_is_distinguishable_on_the_wire() {
        let response = AppError::operation("failed to submit answers")(
            TaskError::DuplicateSubmission {
                student_id: "s1".to_string(),
                task_id: "t1".to_string(),
            },
        )
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn core_validation_maps_to_unprocessable() {
        let response = AppError::operation("failed to create task")(TaskError::Validation(
            "empty".to_string(),
        ))
        .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
