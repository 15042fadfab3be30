// src/web/dashboard_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::subject::SubjectWithStats,
    services::{schedule_service, strategy_service, subject_service},
    state::AppState,
    templates::DashboardPage,
};
use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse},
};
use chrono::Utc;

/// Handler for GET / - server-rendered overview of subjects and upcoming events.
pub async fn dashboard_handler(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    tracing::debug!("GET /: rendering dashboard");

    let subjects: Vec<SubjectWithStats> = subject_service::find_all_subjects(&state.db_pool)
        .await?
        .into_iter()
        .map(strategy_service::annotate)
        .collect();
    let upcoming = schedule_service::find_upcoming_events(
        &state.db_pool,
        Utc::now(),
        schedule_service::DEFAULT_UPCOMING_LIMIT,
    )
    .await?;

    let template = DashboardPage::new(&subjects, &upcoming);

    match template.render() {
        Ok(html) => Ok(Html(html)),
        Err(e) => {
            tracing::error!("Failed to render DashboardPage template: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}
