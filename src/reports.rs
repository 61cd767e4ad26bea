// src/reports.rs

//! Read-only reports assembled from the task, answer and timing tables.

use std::collections::HashMap;

use sqlx::SqlitePool;

use crate::{
    db::{answers, tasks, timing},
    error::TaskError,
    models::{
        answer::{AnsweredQuestion, TaskAnswer},
        report::{AnswerItem, AnswerKey, ReportRow, StatusReport, StudentAnswers, StudentReport},
    },
};

/// Compares one student's answers of a task with the answer key.
///
/// * `finish_time` is empty and `spend_time` absent until answers are pushed.
/// * Rows follow the student's submission order.
/// * Answers to questions outside the task's key are skipped.
pub async fn build_student_report(
    pool: &SqlitePool,
    student_id: &str,
    task_id: &str,
) -> Result<StudentReport, TaskError> {
    let info = tasks::get_task_info(pool, task_id).await?;

    let (finish_time, spend_time) = match timing::get_timing(pool, student_id, task_id).await? {
        Some(record) => match record.submitted_at {
            Some(submitted_at) => {
                let spent = timing::elapsed_seconds(&record.fetched_at, &submitted_at)?;
                (submitted_at, Some(spent))
            }
            None => (String::new(), None),
        },
        None => (String::new(), None),
    };

    let key = tasks::answer_key(pool, task_id).await?;
    if key.is_empty() {
        return Err(TaskError::NotFound(format!("answer key of task {}", task_id)));
    }

    let submitted = answers::get_answers_for(pool, student_id, task_id).await?;
    let rows = compare_answers(&key, &submitted);
    if rows.is_empty() {
        return Err(TaskError::NotFound(format!(
            "answers of student {} for task {}",
            student_id, task_id
        )));
    }

    let correct_count = rows.iter().filter(|row| row.is_correct).count();

    Ok(StudentReport {
        task_title: info.task_title,
        finish_time,
        spend_time,
        correct_count,
        task_data: rows,
    })
}

/// Lists the answer key and every student's answers for a task.
///
/// Students appear in the order of their first stored answer; each
/// student's answers keep their stored order. Every answer's `qa_number`
/// comes from the question catalogue, joined in the same query.
pub async fn build_task_status_report(
    pool: &SqlitePool,
    task_id: &str,
) -> Result<StatusReport, TaskError> {
    let info = tasks::get_task_info(pool, task_id).await?;

    let correct_answer = tasks::answer_key(pool, task_id)
        .await?
        .into_iter()
        .map(|key| AnswerItem {
            qa_id: key.qa_id,
            qa_number: key.qa_number,
            answer: key.choice,
        })
        .collect();

    let submitted = answers::get_answers_for_task(pool, task_id).await?;
    let student_answer = group_by_student(submitted)?;

    Ok(StatusReport {
        task_title: info.task_title,
        correct_answer,
        student_answer,
    })
}

fn compare_answers(key: &[AnswerKey], submitted: &[AnsweredQuestion]) -> Vec<ReportRow> {
    let by_id: HashMap<&str, &AnswerKey> = key.iter().map(|k| (k.qa_id.as_str(), k)).collect();

    submitted
        .iter()
        .filter_map(|answer| {
            let Some(expected) = by_id.get(answer.qa_id.as_str()) else {
                tracing::debug!("Skipping answer to unknown question {}", answer.qa_id);
                return None;
            };
            Some(ReportRow {
                qa_id: answer.qa_id.clone(),
                qa_number: expected.qa_number,
                tea_answer: expected.choice.clone(),
                stu_answer: answer.answer.clone(),
                is_correct: expected.choice == answer.answer,
            })
        })
        .collect()
}

fn group_by_student(submitted: Vec<TaskAnswer>) -> Result<Vec<StudentAnswers>, TaskError> {
    let mut groups: Vec<StudentAnswers> = Vec::new();
    let mut position: HashMap<String, usize> = HashMap::new();

    for row in submitted {
        let qa_number = row
            .qa_number
            .ok_or_else(|| TaskError::NotFound(format!("question {}", row.qa_id)))?;

        let item = AnswerItem {
            qa_id: row.qa_id,
            qa_number,
            answer: row.answer,
        };

        match position.get(&row.student_id) {
            Some(&index) => groups[index].answers.push(item),
            None => {
                position.insert(row.student_id.clone(), groups.len());
                groups.push(StudentAnswers {
                    user_id: row.student_id,
                    answers: vec![item],
                });
            }
        }
    }

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(entries: &[(&str, i64, &str)]) -> Vec<AnswerKey> {
        entries
            .iter()
            .map(|(qa_id, qa_number, choice)| AnswerKey {
                qa_id: qa_id.to_string(),
                qa_number: *qa_number,
                choice: choice.to_string(),
            })
            .collect()
    }

    fn answered(qa_id: &str, answer: &str) -> AnsweredQuestion {
        AnsweredQuestion {
            qa_id: qa_id.to_string(),
            answer: answer.to_string(),
        }
    }

    fn task_answer(
        student_id: &str,
        qa_id: &str,
        qa_number: Option<i64>,
        answer: &str,
    ) -> TaskAnswer {
        TaskAnswer {
            student_id: student_id.to_string(),
            qa_id: qa_id.to_string(),
            qa_number,
            answer: answer.to_string(),
        }
    }

    #[test]
    fn compare_marks_matches_and_mismatches() {
        let rows = compare_answers(
            &key(&[("q1", 1, "A"), ("q2", 2, "B")]),
            &[answered("q1", "A"), answered("q2", "C")],
        );

        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_correct);
        assert_eq!((rows[1].tea_answer.as_str(), rows[1].stu_answer.as_str()), ("B", "C"));
        assert!(!rows[1].is_correct);
        assert_eq!(rows[1].qa_number, 2);
    }

    #[test]
    fn compare_skips_questions_outside_the_key() {
        let rows = compare_answers(
            &key(&[("q1", 1, "A")]),
            &[answered("stray", "X"), answered("q1", "B")],
        );

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].qa_id, "q1");
    }

    #[test]
    fn compare_is_literal() {
        let rows = compare_answers(&key(&[("q1", 1, "A")]), &[answered("q1", "a")]);
        assert!(!rows[0].is_correct);
    }

    #[test]
    fn grouping_keeps_first_seen_student_order() {
        let groups = group_by_student(vec![
            task_answer("bob", "q2", Some(2), "B"),
            task_answer("amy", "q1", Some(1), "A"),
            task_answer("bob", "q1", Some(1), "C"),
        ])
        .unwrap();

        let users: Vec<&str> = groups.iter().map(|g| g.user_id.as_str()).collect();
        assert_eq!(users, vec!["bob", "amy"]);

        let bob: Vec<(i64, &str)> = groups[0]
            .answers
            .iter()
            .map(|a| (a.qa_number, a.answer.as_str()))
            .collect();
        assert_eq!(bob, vec![(2, "B"), (1, "C")]);
        assert_eq!(groups[1].answers.len(), 1);
    }

    #[test]
    fn grouping_fails_for_uncatalogued_question() {
        let err = group_by_student(vec![task_answer("amy", "ghost", None, "A")]);
        assert!(matches!(err, Err(TaskError::NotFound(_))));
    }
}
