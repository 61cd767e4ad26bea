// tests/common/mod.rs

#![allow(dead_code)]

use serde_json::{Value, json};
use sqlx::SqlitePool;
use taskhub::{
    config::Config,
    db::{self, ids::IdAllocator},
    routes,
    state::AppState,
};

pub struct TestApp {
    /// Server root, e.g. `http://127.0.0.1:12345`.
    pub root: String,
    /// Base of the task API.
    pub address: String,
    pub pool: SqlitePool,
    pub client: reqwest::Client,
}

/// Spawns the app on a random port with a fresh in-memory database.
pub async fn spawn_app() -> TestApp {
    let database_url = "sqlite::memory:";

    // 1. Create a pool and the schema
    let pool = db::connect(database_url, 1)
        .await
        .expect("Failed to open in-memory SQLite");
    db::migrate(&pool).await.expect("Failed to migrate database");

    // 2. Create test configuration and state
    let config = Config {
        database_url: database_url.to_string(),
        rust_log: "error".to_string(),
        port: 0,
        front_dir: "./tests/no_front".to_string(),
        cors_origins: vec![],
    };

    let state = AppState {
        pool: pool.clone(),
        config,
        ids: IdAllocator::default(),
    };

    let app = routes::create_router(state);

    // 3. Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let root = format!("http://127.0.0.1:{}", port);
    let address = format!("{}/zsyx/api/v1/tasks", root);

    // 4. Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        root,
        address,
        pool,
        client: reqwest::Client::new(),
    }
}

impl TestApp {
    pub async fn get(&self, path: &str) -> (u16, Value) {
        let response = self
            .client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request");
        let status = response.status().as_u16();
        (status, response.json().await.expect("Response is not JSON"))
    }

    pub async fn post(&self, path: &str, body: &Value) -> (u16, Value) {
        let response = self
            .client
            .post(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request");
        let status = response.status().as_u16();
        (status, response.json().await.expect("Response is not JSON"))
    }

    /// Creates a task whose questions have the given correct answers.
    pub async fn create_task(&self, title: &str, answers: &[&str]) -> String {
        let questions: Vec<Value> = answers
            .iter()
            .enumerate()
            .map(|(i, answer)| json!({ "qa_title": format!("Question {}", i + 1), "qa_answer": answer }))
            .collect();

        let (status, body) = self
            .post(
                "/new_task",
                &json!({
                    "task_title": title,
                    "task_description": "Answer every question.",
                    "deadline": "2026-12-31 23:59:59",
                    "answers": questions,
                }),
            )
            .await;
        assert_eq!(status, 201, "create failed: {}", body);

        body["data"]["task_id"]
            .as_str()
            .expect("task_id missing")
            .to_string()
    }

    /// Fetches the questions as `student_id` and returns their ids in order.
    pub async fn fetch_questions(&self, student_id: &str, task_id: &str) -> Vec<String> {
        let (status, body) = self
            .get(&format!(
                "/get_task_data?student_id={}&task_id={}",
                student_id, task_id
            ))
            .await;
        assert_eq!(status, 200, "fetch failed: {}", body);

        body["data"]
            .as_array()
            .expect("questions missing")
            .iter()
            .map(|q| q["qa_id"].as_str().unwrap().to_string())
            .collect()
    }

    pub async fn push(&self, student_id: &str, task_id: &str, answers: &[(&str, &str)]) -> (u16, Value) {
        let task_data: Vec<Value> = answers
            .iter()
            .map(|(qa_id, answer)| json!({ "qa_id": qa_id, "q_answer": answer }))
            .collect();

        self.post(
            "/push_answer",
            &json!({
                "student_id": student_id,
                "task_id": task_id,
                "task_data": task_data,
            }),
        )
        .await
    }
}
