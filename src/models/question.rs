// src/models/question.rs

use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::FromRow;

/// Represents the 'task_questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Question {
    pub qa_id: String,
    pub title: Option<String>,
    /// 1-based position of the question within its task.
    pub qa_number: i64,
    /// The accepted correct answer.
    pub choice: String,
}

/// DTO for sending a question to a student (excludes the correct answer).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub qa_id: String,
    pub q_title: String,
    pub qa_number: i64,
    pub q_choice: BTreeMap<String, String>,
}

impl PublicQuestion {
    pub fn from_question(question: Question, options: BTreeMap<String, String>) -> Self {
        Self {
            qa_id: question.qa_id,
            q_title: question.title.unwrap_or_default(),
            qa_number: question.qa_number,
            q_choice: options,
        }
    }
}
