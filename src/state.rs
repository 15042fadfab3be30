// src/state.rs
use crate::config::AppConfig;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Everything handlers need, built once in `main` and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, config: AppConfig) -> Self {
        AppState {
            db_pool,
            config: Arc::new(config),
        }
    }
}

// Lets handlers extract the pool directly
impl axum::extract::FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> SqlitePool {
        state.db_pool.clone()
    }
}
