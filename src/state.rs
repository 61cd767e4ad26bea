use crate::{config::Config, db::ids::IdAllocator};
use axum::extract::FromRef;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub ids: IdAllocator,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for IdAllocator {
    fn from_ref(state: &AppState) -> Self {
        state.ids.clone()
    }
}
