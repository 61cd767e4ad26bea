// src/routes.rs

use std::path::Path;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::{
    config::{API_PREFIX, API_VERSION},
    handlers::tasks,
    state::AppState,
};

/// Assembles the main application router.
///
/// * Task API under `/zsyx/api/v1/tasks`.
/// * Any other path is served from the front-end directory, falling back to
///   its `index.html`.
/// * Global middleware: Trace, CORS.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let front_dir = Path::new(&state.config.front_dir);
    let front = ServeDir::new(front_dir).fallback(ServeFile::new(front_dir.join("index.html")));

    let task_routes = Router::new()
        .route("/new_task", post(tasks::new_task))
        .route("/get_info", get(tasks::get_info))
        .route("/get_task_data", get(tasks::get_task_data))
        .route("/push_answer", post(tasks::push_answer))
        .route("/get_report", get(tasks::get_report))
        .route("/get_status", get(tasks::get_status));

    Router::new()
        .nest(&format!("{}/{}/tasks", API_PREFIX, API_VERSION), task_routes)
        .fallback_service(front)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
                None
            }
        })
        .collect();

    cors.allow_origin(allowed)
}
