// src/db.rs
use crate::{config::AppConfig, error::AppResult, models::schedule::EventKind};
use chrono::{Duration, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    Sqlite, Transaction,
};
use std::str::FromStr;
use std::time::Duration as StdDuration;

pub async fn create_db_pool(config: &AppConfig) -> AppResult<SqlitePool> {
    tracing::info!("Connecting to database: {}", config.database_url);

    // Connection options (create if missing, enforce foreign keys, busy timeout)
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(StdDuration::from_secs(5));

    // An in-memory database exists only inside its connection: keep exactly
    // one and never let the pool recycle it.
    let pool_options = if config.is_in_memory() {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<StdDuration>)
            .max_lifetime(None::<StdDuration>)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = pool_options.connect_with(options).await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations finished.");

    Ok(pool)
}

/// Opens a transaction that holds the write lock from its first statement.
///
/// A deferred transaction that reads before writing has to upgrade its lock,
/// and SQLite fails that upgrade with SQLITE_BUSY without consulting the busy
/// timeout. Taking the lock up front makes concurrent writers queue instead.
pub async fn begin_write(db_pool: &SqlitePool) -> AppResult<Transaction<'static, Sqlite>> {
    Ok(db_pool.begin_with("BEGIN IMMEDIATE").await?)
}

/// Inserts the demo subjects and upcoming events when the database is empty.
/// Returns whether anything was inserted.
pub async fn seed_sample_data(db_pool: &SqlitePool) -> AppResult<bool> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subjects")
        .fetch_one(db_pool)
        .await?;
    if existing > 0 {
        tracing::debug!("Database already has {} subjects, skipping seed.", existing);
        return Ok(false);
    }

    let now = Utc::now();
    let subjects = [
        ("ds-1", "Data Structures", 30, 24, 75),
        ("math-1", "Mathematics", 30, 27, 75),
        ("physics-1", "Physics", 30, 19, 75),
        ("chem-1", "Chemistry", 30, 22, 75),
    ];
    let events = [
        (
            "event-1",
            "Database Lab",
            "ds-1",
            now + Duration::minutes(45),
            now + Duration::minutes(135),
            EventKind::Class,
            "Lab 101",
        ),
        (
            "event-2",
            "Math Assignment Due",
            "math-1",
            now + Duration::days(1),
            now + Duration::days(1),
            EventKind::Assignment,
            "Online",
        ),
        (
            "event-3",
            "Physics Quiz",
            "physics-1",
            now + Duration::days(3),
            now + Duration::days(3) + Duration::hours(1),
            EventKind::Exam,
            "Room 203",
        ),
    ];

    let mut tx = begin_write(db_pool).await?;

    for (id, name, total, attended, minimum) in subjects {
        sqlx::query(
            r#"
            INSERT INTO subjects (id, name, total_classes, attended_classes, minimum_attendance, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(total)
        .bind(attended)
        .bind(minimum)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    for (id, title, subject_id, start, end, kind, location) in events {
        sqlx::query(
            r#"
            INSERT INTO schedule_events (id, title, subject_id, start_time, end_time, kind, location, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(subject_id)
        .bind(start)
        .bind(end)
        .bind(kind)
        .bind(location)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::info!(
        "🌱 Sample data seeded ({} subjects, {} events).",
        subjects.len(),
        events.len()
    );
    Ok(true)
}

/// Fresh in-memory database with the schema applied, for tests.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    create_db_pool(&AppConfig::default())
        .await
        .expect("in-memory test database")
}

/// Scratch database file for tests that need several real connections.
/// The returned guard deletes the file (and its journal) when dropped.
#[cfg(test)]
pub async fn test_file_pool() -> (SqlitePool, TempDatabase) {
    let path = std::env::temp_dir().join(format!("attendance-planner-{}.db", uuid::Uuid::new_v4()));
    let config = AppConfig {
        database_url: format!("sqlite://{}", path.display()),
        ..AppConfig::default()
    };
    let pool = create_db_pool(&config).await.expect("file test database");
    (pool, TempDatabase(path))
}

#[cfg(test)]
pub struct TempDatabase(std::path::PathBuf);

#[cfg(test)]
impl Drop for TempDatabase {
    fn drop(&mut self) {
        for suffix in ["", "-journal", "-wal", "-shm"] {
            let mut file = self.0.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}
