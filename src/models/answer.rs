// src/models/answer.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// One answered question of a student, in submission order.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct AnsweredQuestion {
    pub qa_id: String,
    pub answer: String,
}

/// One submitted answer row of a task, across all students.
///
/// `qa_number` comes from the question catalogue and is `None` when the
/// question row is missing.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct TaskAnswer {
    pub student_id: String,
    pub qa_id: String,
    pub qa_number: Option<i64>,
    pub answer: String,
}

/// Input of `submit_answers`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerInput {
    pub qa_id: String,
    pub answer: String,
}

/// DTO for pushing a student's answers.
#[derive(Debug, Deserialize, Validate)]
pub struct PushAnswerRequest {
    #[validate(length(min = 1))]
    pub student_id: String,
    #[validate(length(min = 1))]
    pub task_id: String,
    #[validate(length(min = 1), nested)]
    pub task_data: Vec<AnswerItemRequest>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct AnswerItemRequest {
    #[validate(length(min = 1))]
    pub qa_id: String,
    #[validate(length(max = 500))]
    pub q_answer: String,
}

impl From<AnswerItemRequest> for AnswerInput {
    fn from(item: AnswerItemRequest) -> Self {
        Self {
            qa_id: item.qa_id,
            answer: item.q_answer,
        }
    }
}
