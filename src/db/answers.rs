// src/db/answers.rs

use std::collections::HashSet;

use sqlx::{SqliteConnection, SqlitePool};

use crate::{
    db::timing,
    error::{TaskError, is_unique_violation},
    models::answer::{AnswerInput, AnsweredQuestion, TaskAnswer},
};

/// Stores a batch of answers, all or nothing.
///
/// A question the student already answered fails the whole batch with
/// `DuplicateSubmission` and leaves the earlier answer untouched.
pub async fn submit_answers(
    pool: &SqlitePool,
    student_id: &str,
    task_id: &str,
    answers: &[AnswerInput],
) -> Result<(), TaskError> {
    let mut tx = pool.begin().await?;
    insert_answers(&mut tx, student_id, task_id, answers).await?;
    tx.commit().await?;

    tracing::info!(
        "Stored {} answers of student {} for task {}",
        answers.len(),
        student_id,
        task_id
    );
    Ok(())
}

/// Stores the answers and the submission time in one transaction.
///
/// Every answered question must belong to the task, otherwise the push is a
/// `Validation` error. Fails with `NoSuchFetch`, persisting nothing, if the
/// student never fetched the task.
pub async fn push_answers(
    pool: &SqlitePool,
    student_id: &str,
    task_id: &str,
    answers: &[AnswerInput],
    submitted_at: &str,
) -> Result<(), TaskError> {
    let mut tx = pool.begin().await?;
    ensure_linked(&mut tx, task_id, answers).await?;
    insert_answers(&mut tx, student_id, task_id, answers).await?;
    timing::mark_submitted(&mut *tx, student_id, task_id, submitted_at).await?;
    tx.commit().await?;

    tracing::info!(
        "Student {} pushed {} answers for task {}",
        student_id,
        answers.len(),
        task_id
    );
    Ok(())
}

async fn ensure_linked(
    conn: &mut SqliteConnection,
    task_id: &str,
    answers: &[AnswerInput],
) -> Result<(), TaskError> {
    let linked: HashSet<String> =
        sqlx::query_scalar::<_, String>("SELECT qa_id FROM task_question_links WHERE task_id = ?")
            .bind(task_id)
            .fetch_all(&mut *conn)
            .await?
            .into_iter()
            .collect();

    if let Some(stray) = answers.iter().find(|a| !linked.contains(&a.qa_id)) {
        tracing::warn!("Rejected answer to question {} outside task {}", stray.qa_id, task_id);
        return Err(TaskError::Validation(format!(
            "question {} does not belong to task {}",
            stray.qa_id, task_id
        )));
    }

    Ok(())
}

async fn insert_answers(
    conn: &mut SqliteConnection,
    student_id: &str,
    task_id: &str,
    answers: &[AnswerInput],
) -> Result<(), TaskError> {
    if answers.is_empty() {
        return Err(TaskError::Validation("no answers submitted".to_string()));
    }

    for item in answers {
        sqlx::query(
            "INSERT INTO student_answers (student_id, task_id, qa_id, answer) VALUES (?, ?, ?, ?)",
        )
        .bind(student_id)
        .bind(task_id)
        .bind(&item.qa_id)
        .bind(&item.answer)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                TaskError::DuplicateSubmission {
                    student_id: student_id.to_string(),
                    task_id: task_id.to_string(),
                }
            } else {
                tracing::error!("Failed to insert answer: {:?}", e);
                TaskError::from(e)
            }
        })?;
    }

    Ok(())
}

/// Answers of one student for one task, in submission order.
pub async fn get_answers_for(
    pool: &SqlitePool,
    student_id: &str,
    task_id: &str,
) -> Result<Vec<AnsweredQuestion>, TaskError> {
    let answers = sqlx::query_as::<_, AnsweredQuestion>(
        r#"
        SELECT qa_id, answer
        FROM student_answers
        WHERE student_id = ? AND task_id = ?
        ORDER BY rowid
        "#,
    )
    .bind(student_id)
    .bind(task_id)
    .fetch_all(pool)
    .await?;

    Ok(answers)
}

/// Every stored answer of a task across all students, in submission order,
/// with each question's number looked up in the catalogue.
pub async fn get_answers_for_task(
    pool: &SqlitePool,
    task_id: &str,
) -> Result<Vec<TaskAnswer>, TaskError> {
    let answers = sqlx::query_as::<_, TaskAnswer>(
        r#"
        SELECT a.student_id, a.qa_id, q.qa_number, a.answer
        FROM student_answers a
        LEFT JOIN task_questions q ON q.qa_id = a.qa_id
        WHERE a.task_id = ?
        ORDER BY a.rowid
        "#,
    )
    .bind(task_id)
    .fetch_all(pool)
    .await?;

    Ok(answers)
}
