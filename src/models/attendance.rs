// src/models/attendance.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One attendance event. Append-only: never updated after insertion.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    pub subject_id: String,
    pub date: DateTime<Utc>,
    pub attended: bool,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/attendance`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewAttendanceRecord {
    pub subject_id: String,
    pub date: DateTime<Utc>,
    #[serde(default = "attended_by_default")]
    pub attended: bool,
}

fn attended_by_default() -> bool {
    true
}

/// Query string of `GET /api/attendance`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceQuery {
    pub subject_id: Option<String>,
}
