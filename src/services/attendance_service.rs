// src/services/attendance_service.rs
use crate::{
    db,
    error::{AppError, AppResult},
    models::attendance::{AttendanceRecord, NewAttendanceRecord},
};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Appends an attendance record and, when `attended`, increments the subject's
/// `attended_classes`. Both writes share one write-locked transaction, so
/// concurrent postings queue behind each other and none is lost or rejected.
pub async fn record_attendance(
    db_pool: &SqlitePool,
    new_record: &NewAttendanceRecord,
) -> AppResult<AttendanceRecord> {
    tracing::debug!(
        "Recording attendance for subject {} on {} (attended={})",
        new_record.subject_id,
        new_record.date,
        new_record.attended
    );

    let record = AttendanceRecord {
        id: Uuid::new_v4().to_string(),
        subject_id: new_record.subject_id.clone(),
        date: new_record.date,
        attended: new_record.attended,
        created_at: Utc::now(),
    };

    let mut tx = db::begin_write(db_pool).await?;

    let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM subjects WHERE id = ?1")
        .bind(&record.subject_id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        tracing::warn!("Attendance for unknown subject '{}' rejected.", record.subject_id);
        return Err(AppError::not_found("Subject", &record.subject_id));
    }

    sqlx::query(
        r#"
        INSERT INTO attendance_records (id, subject_id, date, attended, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(&record.id)
    .bind(&record.subject_id)
    .bind(record.date)
    .bind(record.attended)
    .bind(record.created_at)
    .execute(&mut *tx)
    .await?;

    if record.attended {
        sqlx::query("UPDATE subjects SET attended_classes = attended_classes + 1 WHERE id = ?1")
            .bind(&record.subject_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    tracing::info!(
        "✅ Attendance record {} stored for subject {}.",
        record.id,
        record.subject_id
    );
    Ok(record)
}

/// Lists attendance records, newest first, optionally for a single subject.
pub async fn find_attendance_records(
    db_pool: &SqlitePool,
    subject_id: Option<&str>,
) -> AppResult<Vec<AttendanceRecord>> {
    let records = match subject_id {
        Some(subject_id) => {
            tracing::debug!("Fetching attendance records for subject {}", subject_id);
            sqlx::query_as::<_, AttendanceRecord>(
                r#"
                SELECT id, subject_id, date, attended, created_at
                FROM attendance_records
                WHERE subject_id = ?1
                ORDER BY date DESC, created_at DESC
                "#,
            )
            .bind(subject_id)
            .fetch_all(db_pool)
            .await?
        }
        None => {
            tracing::debug!("Fetching all attendance records");
            sqlx::query_as::<_, AttendanceRecord>(
                r#"
                SELECT id, subject_id, date, attended, created_at
                FROM attendance_records
                ORDER BY date DESC, created_at DESC
                "#,
            )
            .fetch_all(db_pool)
            .await?
        }
    };
    Ok(records)
}
