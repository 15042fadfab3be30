// src/services/subject_service.rs
use crate::{
    db,
    error::{AppError, AppResult},
    models::subject::{AttendanceOverride, NewSubject, Subject},
};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

const SELECT_SUBJECT: &str = r#"
    SELECT id, name, total_classes, attended_classes, minimum_attendance, created_at
    FROM subjects
"#;

/// Fetches every subject, oldest first.
pub async fn find_all_subjects(db_pool: &SqlitePool) -> AppResult<Vec<Subject>> {
    tracing::debug!("Fetching all subjects...");
    let query = format!("{} ORDER BY created_at ASC, id ASC", SELECT_SUBJECT);
    let subjects = sqlx::query_as::<_, Subject>(&query)
        .fetch_all(db_pool)
        .await?;
    tracing::debug!("Found {} subjects.", subjects.len());
    Ok(subjects)
}

pub async fn find_subject_by_id(db_pool: &SqlitePool, subject_id: &str) -> AppResult<Option<Subject>> {
    tracing::debug!("Fetching subject by ID: {}", subject_id);
    let query = format!("{} WHERE id = ?1", SELECT_SUBJECT);
    let subject = sqlx::query_as::<_, Subject>(&query)
        .bind(subject_id)
        .fetch_optional(db_pool)
        .await?;
    Ok(subject)
}

/// Like `find_subject_by_id`, but a missing subject is a `NotFound` error.
pub async fn get_subject(db_pool: &SqlitePool, subject_id: &str) -> AppResult<Subject> {
    find_subject_by_id(db_pool, subject_id)
        .await?
        .ok_or_else(|| AppError::not_found("Subject", subject_id))
}

pub async fn create_subject(db_pool: &SqlitePool, new_subject: &NewSubject) -> AppResult<Subject> {
    new_subject.validate()?;

    let subject = Subject {
        id: Uuid::new_v4().to_string(),
        name: new_subject.name.trim().to_string(),
        total_classes: new_subject.total_classes,
        attended_classes: new_subject.attended_classes,
        minimum_attendance: new_subject.minimum_attendance,
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO subjects (id, name, total_classes, attended_classes, minimum_attendance, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&subject.id)
    .bind(&subject.name)
    .bind(subject.total_classes)
    .bind(subject.attended_classes)
    .bind(subject.minimum_attendance)
    .bind(subject.created_at)
    .execute(db_pool)
    .await?;

    tracing::info!("✅ Subject '{}' created ({}).", subject.name, subject.id);
    Ok(subject)
}

/// Administrative override of `attendedClasses`. Validated against the
/// subject's current `totalClasses` before it is written.
pub async fn update_attended_classes(
    db_pool: &SqlitePool,
    subject_id: &str,
    update: &AttendanceOverride,
) -> AppResult<Subject> {
    tracing::info!(
        "Overriding attendedClasses for subject {} to {}",
        subject_id,
        update.attended_classes
    );

    let mut tx = db::begin_write(db_pool).await?;

    let query = format!("{} WHERE id = ?1", SELECT_SUBJECT);
    let mut subject = sqlx::query_as::<_, Subject>(&query)
        .bind(subject_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found("Subject", subject_id))?;

    update.validate_against(&subject)?;

    sqlx::query("UPDATE subjects SET attended_classes = ?1 WHERE id = ?2")
        .bind(update.attended_classes)
        .bind(subject_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    subject.attended_classes = update.attended_classes;
    Ok(subject)
}
