// src/db/timing.rs

use sqlx::{SqliteExecutor, SqlitePool};

use crate::{
    error::TaskError,
    models::timing::TaskTiming,
    utils::time::{now_timestamp, parse_timestamp},
};

/// Records the first time a student fetched a task.
///
/// Later calls leave the stored time untouched. Returns whether a new
/// record was written.
pub async fn mark_fetched(
    pool: &SqlitePool,
    student_id: &str,
    task_id: &str,
) -> Result<bool, TaskError> {
    let result = sqlx::query(
        r#"
        INSERT INTO task_timings (student_id, task_id, fetched_at, submitted_at)
        VALUES (?, ?, ?, NULL)
        ON CONFLICT (student_id, task_id) DO NOTHING
        "#,
    )
    .bind(student_id)
    .bind(task_id)
    .bind(now_timestamp())
    .execute(pool)
    .await?;

    let created = result.rows_affected() == 1;
    if created {
        tracing::info!("Student {} fetched task {}", student_id, task_id);
    } else {
        tracing::debug!(
            "Fetch time of student {} on task {} already recorded",
            student_id,
            task_id
        );
    }
    Ok(created)
}

/// Sets the submission time of an existing fetch record.
///
/// A student without a fetch record cannot submit: zero updated rows is
/// `NoSuchFetch`.
pub async fn mark_submitted<'e>(
    executor: impl SqliteExecutor<'e>,
    student_id: &str,
    task_id: &str,
    submitted_at: &str,
) -> Result<(), TaskError> {
    let result = sqlx::query(
        "UPDATE task_timings SET submitted_at = ? WHERE student_id = ? AND task_id = ?",
    )
    .bind(submitted_at)
    .bind(student_id)
    .bind(task_id)
    .execute(executor)
    .await?;

    if result.rows_affected() == 0 {
        return Err(TaskError::NoSuchFetch {
            student_id: student_id.to_string(),
            task_id: task_id.to_string(),
        });
    }

    tracing::info!("Student {} submitted task {}", student_id, task_id);
    Ok(())
}

pub async fn get_timing(
    pool: &SqlitePool,
    student_id: &str,
    task_id: &str,
) -> Result<Option<TaskTiming>, TaskError> {
    let timing = sqlx::query_as::<_, TaskTiming>(
        r#"
        SELECT student_id, task_id, fetched_at, submitted_at
        FROM task_timings
        WHERE student_id = ? AND task_id = ?
        "#,
    )
    .bind(student_id)
    .bind(task_id)
    .fetch_optional(pool)
    .await?;

    Ok(timing)
}

/// Whole seconds from `fetched_at` to `submitted_at`, rounded down.
///
/// Unparseable timestamps and a submission before the fetch are errors.
pub fn elapsed_seconds(fetched_at: &str, submitted_at: &str) -> Result<i64, TaskError> {
    let start = parse_timestamp(fetched_at)
        .map_err(|e| TaskError::InvalidTiming(format!("fetched_at {:?}: {}", fetched_at, e)))?;
    let end = parse_timestamp(submitted_at).map_err(|e| {
        TaskError::InvalidTiming(format!("submitted_at {:?}: {}", submitted_at, e))
    })?;

    let elapsed = end - start;
    if elapsed < chrono::TimeDelta::zero() {
        return Err(TaskError::InvalidTiming(format!(
            "submitted_at {} precedes fetched_at {}",
            submitted_at, fetched_at
        )));
    }

    Ok(elapsed.num_seconds())
}
