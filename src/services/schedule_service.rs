// src/services/schedule_service.rs
use crate::{
    db,
    error::{AppError, AppResult},
    models::schedule::{NewScheduleEvent, ScheduleEvent},
};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

pub const DEFAULT_UPCOMING_LIMIT: usize = 5;

const SELECT_EVENT: &str = r#"
    SELECT id, title, subject_id, start_time, end_time, kind, location, created_at
    FROM schedule_events
"#;

// Timestamps are stored as UTC RFC 3339 text, so text order is time order.

pub async fn find_all_events(db_pool: &SqlitePool) -> AppResult<Vec<ScheduleEvent>> {
    tracing::debug!("Fetching all schedule events...");
    let query = format!("{} ORDER BY start_time ASC, id ASC", SELECT_EVENT);
    let events = sqlx::query_as::<_, ScheduleEvent>(&query)
        .fetch_all(db_pool)
        .await?;
    Ok(events)
}

/// Events starting after `now`, soonest first, at most `limit` of them.
pub async fn find_upcoming_events(
    db_pool: &SqlitePool,
    now: DateTime<Utc>,
    limit: usize,
) -> AppResult<Vec<ScheduleEvent>> {
    let query = format!(
        "{} WHERE start_time > ?1 ORDER BY start_time ASC, id ASC LIMIT ?2",
        SELECT_EVENT
    );
    let upcoming = sqlx::query_as::<_, ScheduleEvent>(&query)
        .bind(now)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(db_pool)
        .await?;
    tracing::debug!("{} upcoming events (limit {}).", upcoming.len(), limit);
    Ok(upcoming)
}

pub async fn create_event(
    db_pool: &SqlitePool,
    new_event: &NewScheduleEvent,
) -> AppResult<ScheduleEvent> {
    new_event.validate()?;

    let event = ScheduleEvent {
        id: Uuid::new_v4().to_string(),
        title: new_event.title.trim().to_string(),
        subject_id: new_event.subject_id.clone(),
        start_time: new_event.start_time,
        end_time: new_event.end_time,
        kind: new_event.kind,
        location: new_event.location.clone(),
        created_at: Utc::now(),
    };

    let mut tx = db::begin_write(db_pool).await?;

    if let Some(subject_id) = &event.subject_id {
        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM subjects WHERE id = ?1")
            .bind(subject_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(AppError::not_found("Subject", subject_id));
        }
    }

    sqlx::query(
        r#"
        INSERT INTO schedule_events (id, title, subject_id, start_time, end_time, kind, location, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&event.id)
    .bind(&event.title)
    .bind(&event.subject_id)
    .bind(event.start_time)
    .bind(event.end_time)
    .bind(event.kind)
    .bind(&event.location)
    .bind(event.created_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!("✅ Schedule event '{}' created ({}).", event.title, event.id);
    Ok(event)
}
