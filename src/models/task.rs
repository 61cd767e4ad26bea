// src/models/task.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::utils::html::clean_html;

/// Public task metadata returned by `get_info`.
#[derive(Debug, Clone, FromRow, Serialize, PartialEq, Eq)]
pub struct TaskInfo {
    pub task_title: String,
    pub task_description: String,
    pub publish_time: String,
    pub deadline: String,
}

/// A question to be created together with its task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub title: String,
    /// Accepted correct answer.
    pub answer: String,
}

/// Input of `create_task`. Questions are numbered by their position.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub deadline: String,
    pub questions: Vec<NewQuestion>,
}

/// DTO for creating a task.
#[derive(Debug, Deserialize, Validate)]
pub struct NewTaskRequest {
    #[validate(length(min = 1, max = 200))]
    pub task_title: String,
    #[validate(length(min = 1, max = 5000))]
    pub task_description: String,
    #[validate(length(min = 1, max = 64))]
    pub deadline: String,
    #[validate(length(min = 1), nested)]
    pub answers: Vec<NewQuestionRequest>,
}

/// One question of a `NewTaskRequest`.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct NewQuestionRequest {
    #[validate(length(max = 1000))]
    pub qa_title: String,
    #[validate(length(min = 1, max = 500))]
    pub qa_answer: String,
}

impl From<NewTaskRequest> for NewTask {
    fn from(req: NewTaskRequest) -> Self {
        Self {
            title: req.task_title,
            description: clean_html(&req.task_description),
            deadline: req.deadline,
            questions: req
                .answers
                .into_iter()
                .map(|q| NewQuestion {
                    title: q.qa_title,
                    answer: q.qa_answer,
                })
                .collect(),
        }
    }
}

/// Query parameters of `get_info` and `get_status`.
#[derive(Debug, Deserialize, Validate)]
pub struct TaskQuery {
    #[validate(length(min = 1))]
    pub task_id: String,
}

/// Query parameters of endpoints scoped to one student.
#[derive(Debug, Deserialize, Validate)]
pub struct StudentTaskQuery {
    #[validate(length(min = 1))]
    pub student_id: String,
    #[validate(length(min = 1))]
    pub task_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(answers: Vec<NewQuestionRequest>) -> NewTaskRequest {
        NewTaskRequest {
            task_title: "Quiz 1".to_string(),
            task_description: "<p>Read <b>carefully</b></p><script>alert(1)</script>".to_string(),
            deadline: "2026-12-01 00:00:00".to_string(),
            answers,
        }
    }

    #[test]
    fn request_without_questions_is_rejected() {
        assert!(request(vec![]).validate().is_err());
    }

    #[test]
    fn question_without_answer_is_rejected() {
        let req = request(vec![NewQuestionRequest {
            qa_title: "Q1".to_string(),
            qa_answer: String::new(),
        }]);
        assert!(req.validate().is_err());
    }

    #[test]
    fn conversion_sanitises_description_and_keeps_order() {
        let req = request(vec![
            NewQuestionRequest {
                qa_title: "Q1".to_string(),
                qa_answer: "A".to_string(),
            },
            NewQuestionRequest {
                qa_title: "Q2".to_string(),
                qa_answer: "B".to_string(),
            },
        ]);
        assert!(req.validate().is_ok());

        let task = NewTask::from(req);
        assert_eq!(task.description, "<p>Read <b>carefully</b></p>");
        assert_eq!(task.questions[0].answer, "A");
        assert_eq!(task.questions[1].answer, "B");
    }
}
