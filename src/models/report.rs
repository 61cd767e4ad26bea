// src/models/report.rs

use serde::Serialize;
use sqlx::FromRow;

/// Authoritative (question, answer, position) entry of a task.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct AnswerKey {
    pub qa_id: String,
    pub qa_number: i64,
    pub choice: String,
}

/// One compared question in a student report.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReportRow {
    pub qa_id: String,
    pub qa_number: i64,
    pub tea_answer: String,
    pub stu_answer: String,
    /// Literal comparison of `tea_answer` and `stu_answer`.
    pub is_correct: bool,
}

/// Per-student report for one task.
#[derive(Debug, Clone, Serialize)]
pub struct StudentReport {
    pub task_title: String,
    /// Empty until the student has pushed answers.
    pub finish_time: String,
    /// Whole seconds between fetch and submission, if both are recorded.
    pub spend_time: Option<i64>,
    pub correct_count: usize,
    pub task_data: Vec<ReportRow>,
}

/// Answer of one question, used for both the key and student answers.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AnswerItem {
    pub qa_id: String,
    pub qa_number: i64,
    pub answer: String,
}

/// Answers of one student, in the order they were stored.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StudentAnswers {
    pub user_id: String,
    pub answers: Vec<AnswerItem>,
}

/// Task-wide status report.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub task_title: String,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: Vec<AnswerItem>,
    #[serde(rename = "studentAnswer")]
    pub student_answer: Vec<StudentAnswers>,
}
