// src/handlers/tasks.rs

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::answer_sheet,
    db::{answers, ids::IdAllocator, tasks, timing},
    error::{AppError, TaskError},
    models::{
        answer::{AnswerInput, PushAnswerRequest},
        question::PublicQuestion,
        response::ApiResponse,
        task::{NewTask, NewTaskRequest, StudentTaskQuery, TaskQuery},
    },
    reports,
    utils::time::now_timestamp,
};

const CREATE_FAILED: &str = "failed to create task";
const FETCH_FAILED: &str = "failed to fetch task";
const MARK_FETCHED_FAILED: &str = "failed to record start time";
const SUBMIT_FAILED: &str = "failed to submit answers";
const MARK_SUBMITTED_FAILED: &str = "failed to record submission time";
const REPORT_FAILED: &str = "failed to fetch report";

/// Creates a task with its questions.
///
/// The task id is allocated server-side and returned as `data.task_id`.
pub async fn new_task(
    State(pool): State<SqlitePool>,
    State(ids): State<IdAllocator>,
    payload: Result<Json<NewTaskRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let task = NewTask::from(req);
    let task_id = tasks::create_task(&pool, &ids, &task)
        .await
        .map_err(AppError::operation(CREATE_FAILED))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            StatusCode::CREATED,
            "task created",
            Some(serde_json::json!({ "task_id": task_id })),
        )),
    ))
}

/// Returns title, description, publish time and deadline of a task.
pub async fn get_info(
    State(pool): State<SqlitePool>,
    query: Result<Query<TaskQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(query) = query?;
    query.validate()?;

    let info = tasks::get_task_info(&pool, &query.task_id)
        .await
        .map_err(AppError::operation(FETCH_FAILED))?;

    Ok(Json(ApiResponse::ok(info)))
}

/// Hands a student the questions of a task and records when they started.
///
/// Correct answers are never included; every question carries the fixed
/// answer-sheet options.
pub async fn get_task_data(
    State(pool): State<SqlitePool>,
    query: Result<Query<StudentTaskQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(query) = query?;
    query.validate()?;

    let questions = tasks::get_task_questions(&pool, &query.task_id)
        .await
        .map_err(AppError::operation(FETCH_FAILED))?;

    timing::mark_fetched(&pool, &query.student_id, &query.task_id)
        .await
        .map_err(AppError::operation(MARK_FETCHED_FAILED))?;

    let public_questions: Vec<PublicQuestion> = questions
        .into_iter()
        .map(|q| PublicQuestion::from_question(q, answer_sheet()))
        .collect();

    Ok(Json(ApiResponse::ok(public_questions)))
}

/// Stores a student's answers and the submission time.
///
/// Each question can be answered once; a second push fails with a
/// distinguishable duplicate-submission message.
pub async fn push_answer(
    State(pool): State<SqlitePool>,
    payload: Result<Json<PushAnswerRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let items: Vec<AnswerInput> = req.task_data.into_iter().map(AnswerInput::from).collect();

    answers::push_answers(
        &pool,
        &req.student_id,
        &req.task_id,
        &items,
        &now_timestamp(),
    )
    .await
    .map_err(|e| match e {
        TaskError::NoSuchFetch { .. } => AppError::operation(MARK_SUBMITTED_FAILED)(e),
        other => AppError::operation(SUBMIT_FAILED)(other),
    })?;

    Ok(Json(ApiResponse::<()>::success(
        StatusCode::OK,
        "answers submitted",
        None,
    )))
}

/// Per-student report: correct vs. submitted answer for each question.
pub async fn get_report(
    State(pool): State<SqlitePool>,
    query: Result<Query<StudentTaskQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(query) = query?;
    query.validate()?;

    let report = reports::build_student_report(&pool, &query.student_id, &query.task_id)
        .await
        .map_err(AppError::operation(REPORT_FAILED))?;

    Ok(Json(ApiResponse::ok(report)))
}

/// Task-wide report: answer key plus every student's answers.
pub async fn get_status(
    State(pool): State<SqlitePool>,
    query: Result<Query<TaskQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(query) = query?;
    query.validate()?;

    let report = reports::build_task_status_report(&pool, &query.task_id)
        .await
        .map_err(AppError::operation(REPORT_FAILED))?;

    Ok(Json(ApiResponse::ok(report)))
}
