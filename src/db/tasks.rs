// src/db/tasks.rs

use sqlx::SqlitePool;

use crate::{
    db::ids::{IdAllocator, claim_insert},
    error::TaskError,
    models::{
        question::Question,
        report::AnswerKey,
        task::{NewTask, TaskInfo},
    },
    utils::time::now_timestamp,
};

/// Creates a task and its questions in one transaction.
///
/// Questions are numbered 1..=N in the order given. If any insert fails the
/// transaction is dropped and nothing is persisted.
pub async fn create_task(
    pool: &SqlitePool,
    ids: &IdAllocator,
    task: &NewTask,
) -> Result<String, TaskError> {
    if task.questions.is_empty() {
        return Err(TaskError::Validation(
            "a task needs at least one question".to_string(),
        ));
    }

    let publish_time = now_timestamp();
    let mut tx = pool.begin().await?;

    let (task_id, ()) = ids
        .allocate("task", &mut *tx, |conn, candidate| {
            let title = task.title.clone();
            let description = task.description.clone();
            let deadline = task.deadline.clone();
            let publish_time = publish_time.clone();
            Box::pin(async move {
                let result = sqlx::query(
                    r#"
                    INSERT INTO tasks (task_id, title, description, publish_time, deadline)
                    VALUES (?, ?, ?, ?, ?)
                    "#,
                )
                .bind(candidate)
                .bind(title)
                .bind(description)
                .bind(publish_time)
                .bind(deadline)
                .execute(conn)
                .await;
                claim_insert(result.map(|_| ()))
            })
        })
        .await?;

    for (index, question) in task.questions.iter().enumerate() {
        let qa_number = index as i64 + 1;

        let (qa_id, ()) = ids
            .allocate("question", &mut *tx, |conn, candidate| {
                let title = question.title.clone();
                let answer = question.answer.clone();
                Box::pin(async move {
                    let result = sqlx::query(
                        "INSERT INTO task_questions (qa_id, title, qa_number, choice) VALUES (?, ?, ?, ?)",
                    )
                    .bind(candidate)
                    .bind(title)
                    .bind(qa_number)
                    .bind(answer)
                    .execute(conn)
                    .await;
                    claim_insert(result.map(|_| ()))
                })
            })
            .await?;

        sqlx::query("INSERT INTO task_question_links (task_id, qa_id) VALUES (?, ?)")
            .bind(&task_id)
            .bind(&qa_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    tracing::info!(
        "Created task {} with {} questions",
        task_id,
        task.questions.len()
    );
    Ok(task_id)
}

/// Title, description, publish time and deadline of a task.
pub async fn get_task_info(pool: &SqlitePool, task_id: &str) -> Result<TaskInfo, TaskError> {
    sqlx::query_as::<_, TaskInfo>(
        r#"
        SELECT
            title AS task_title,
            description AS task_description,
            publish_time,
            deadline
        FROM tasks
        WHERE task_id = ?
        "#,
    )
    .bind(task_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| TaskError::NotFound(format!("task {}", task_id)))
}

/// Questions of a task ordered by position. An empty set is `NotFound`.
pub async fn get_task_questions(
    pool: &SqlitePool,
    task_id: &str,
) -> Result<Vec<Question>, TaskError> {
    let questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT q.qa_id, q.title, q.qa_number, q.choice
        FROM task_questions q
        INNER JOIN task_question_links l ON q.qa_id = l.qa_id
        WHERE l.task_id = ?
        ORDER BY q.qa_number, q.rowid
        "#,
    )
    .bind(task_id)
    .fetch_all(pool)
    .await?;

    if questions.is_empty() {
        return Err(TaskError::NotFound(format!("questions of task {}", task_id)));
    }

    Ok(questions)
}

/// Correct answer and position of every question linked to the task.
pub async fn answer_key(pool: &SqlitePool, task_id: &str) -> Result<Vec<AnswerKey>, TaskError> {
    let key = sqlx::query_as::<_, AnswerKey>(
        r#"
        SELECT q.qa_id, q.qa_number, q.choice
        FROM task_questions q
        INNER JOIN task_question_links l ON q.qa_id = l.qa_id
        WHERE l.task_id = ?
        ORDER BY q.qa_number, q.rowid
        "#,
    )
    .bind(task_id)
    .fetch_all(pool)
    .await?;

    Ok(key)
}
