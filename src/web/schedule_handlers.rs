// src/web/schedule_handlers.rs
use crate::{
    error::AppResult,
    models::schedule::{NewScheduleEvent, ScheduleEvent, ScheduleQuery},
    services::schedule_service,
    state::AppState,
    web::extract::{AppJson, AppQuery},
};
use axum::{extract::State, http::StatusCode, response::Json};
use chrono::Utc;

/// GET /api/schedule, or only what is coming up with `?upcoming=true`.
pub async fn list_schedule(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ScheduleQuery>,
) -> AppResult<Json<Vec<ScheduleEvent>>> {
    let events = if query.upcoming {
        let limit = query.limit.unwrap_or(schedule_service::DEFAULT_UPCOMING_LIMIT);
        schedule_service::find_upcoming_events(&state.db_pool, Utc::now(), limit).await?
    } else {
        schedule_service::find_all_events(&state.db_pool).await?
    };
    Ok(Json(events))
}

/// POST /api/schedule
pub async fn create_schedule_event(
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewScheduleEvent>,
) -> AppResult<(StatusCode, Json<ScheduleEvent>)> {
    let event = schedule_service::create_event(&state.db_pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(event)))
}
