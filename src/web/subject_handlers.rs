// src/web/subject_handlers.rs
use crate::{
    error::AppResult,
    models::subject::{AttendanceOverride, NewSubject, SubjectWithStats},
    services::{strategy_service, subject_service},
    state::AppState,
    web::extract::AppJson,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

/// GET /api/subjects - every subject with its derived attendance fields.
pub async fn list_subjects(State(state): State<AppState>) -> AppResult<Json<Vec<SubjectWithStats>>> {
    let subjects = subject_service::find_all_subjects(&state.db_pool).await?;

    let annotated: Vec<SubjectWithStats> = subjects
        .into_iter()
        .map(strategy_service::annotate)
        .inspect(|s| {
            if !s.inconsistencies.is_empty() {
                tracing::warn!(
                    "Subject {} has inconsistent counters: {:?}",
                    s.subject.id,
                    s.inconsistencies
                );
            }
        })
        .collect();

    Ok(Json(annotated))
}

/// GET /api/subjects/{id}
pub async fn get_subject(
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
) -> AppResult<Json<SubjectWithStats>> {
    let subject = subject_service::get_subject(&state.db_pool, &subject_id).await?;
    Ok(Json(strategy_service::annotate(subject)))
}

/// POST /api/subjects
pub async fn create_subject(
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewSubject>,
) -> AppResult<(StatusCode, Json<SubjectWithStats>)> {
    let subject = subject_service::create_subject(&state.db_pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(strategy_service::annotate(subject))))
}

/// PATCH /api/subjects/{id}/attendance - administrative override.
pub async fn update_attendance(
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
    AppJson(payload): AppJson<AttendanceOverride>,
) -> AppResult<Json<SubjectWithStats>> {
    let subject =
        subject_service::update_attended_classes(&state.db_pool, &subject_id, &payload).await?;
    Ok(Json(strategy_service::annotate(subject)))
}
