// src/models/timing.rs

use serde::Serialize;
use sqlx::FromRow;

/// Represents the 'task_timings' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, PartialEq, Eq)]
pub struct TaskTiming {
    pub student_id: String,
    pub task_id: String,
    /// When the student first fetched the questions.
    pub fetched_at: String,
    /// When the student last pushed answers, if ever.
    pub submitted_at: Option<String>,
}
