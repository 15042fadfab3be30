// src/web/attendance_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        attendance::{AttendanceQuery, AttendanceRecord, NewAttendanceRecord},
        strategy::StrategyReport,
    },
    services::{attendance_service, strategy_service, subject_service},
    state::AppState,
    web::extract::{AppJson, AppQuery},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;

/// GET /api/attendance?subjectId=...
pub async fn list_attendance(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<AttendanceQuery>,
) -> AppResult<Json<Vec<AttendanceRecord>>> {
    let records =
        attendance_service::find_attendance_records(&state.db_pool, query.subject_id.as_deref())
            .await?;
    Ok(Json(records))
}

/// POST /api/attendance - appends the record and bumps the subject counter.
pub async fn create_attendance(
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewAttendanceRecord>,
) -> AppResult<(StatusCode, Json<AttendanceRecord>)> {
    let record = attendance_service::record_attendance(&state.db_pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[derive(Debug, Default, Deserialize)]
pub struct SkipCalculatorQuery {
    /// Fail with 409 instead of returning a report built from clamped counters.
    #[serde(default)]
    pub strict: bool,
}

/// GET /api/skip-calculator/{subjectId}
pub async fn skip_calculator(
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
    AppQuery(query): AppQuery<SkipCalculatorQuery>,
) -> AppResult<Json<StrategyReport>> {
    let subject = subject_service::get_subject(&state.db_pool, &subject_id).await?;
    let report = strategy_service::compute_strategy(&subject);

    if !report.is_consistent() {
        tracing::warn!(
            "Skip strategy for {} computed from inconsistent data: {:?}",
            subject_id,
            report.inconsistencies
        );
        if query.strict {
            return Err(AppError::DataInconsistency(format!(
                "subject '{}' has inconsistent attendance counters",
                subject_id
            )));
        }
    }
    tracing::debug!(
        "Skip strategy for {}: {} (can skip {}, need {})",
        subject_id,
        report.status.as_str(),
        report.can_skip,
        report.need_to_attend
    );

    Ok(Json(report))
}
