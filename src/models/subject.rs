// src/models/subject.rs
use crate::{
    error::{AppError, AppResult},
    models::strategy::{AttendanceStatus, Inconsistency, StrategyReport},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const DEFAULT_TOTAL_CLASSES: i64 = 30;
pub const DEFAULT_MINIMUM_ATTENDANCE: i64 = 75;

/// A row of the `subjects` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub total_classes: i64,
    pub attended_classes: i64,
    pub minimum_attendance: i64, // percentage, 0..=100
    pub created_at: DateTime<Utc>,
}

/// Subject plus the derived attendance fields, as served by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectWithStats {
    #[serde(flatten)]
    pub subject: Subject,
    pub attendance_rate: f64,
    pub required_classes: i64,
    pub can_skip: i64,
    pub need_to_attend: i64,
    pub status: AttendanceStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inconsistencies: Vec<Inconsistency>,
}

impl SubjectWithStats {
    pub fn new(subject: Subject, report: StrategyReport) -> Self {
        SubjectWithStats {
            subject,
            attendance_rate: report.current_attendance,
            required_classes: report.required_classes,
            can_skip: report.can_skip,
            need_to_attend: report.need_to_attend,
            status: report.status,
            inconsistencies: report.inconsistencies,
        }
    }
}

// --- Request bodies ---

/// Body of `POST /api/subjects`. Omitted counters take the column defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewSubject {
    pub name: String,
    #[serde(default = "default_total_classes")]
    pub total_classes: i64,
    #[serde(default)]
    pub attended_classes: i64,
    #[serde(default = "default_minimum_attendance")]
    pub minimum_attendance: i64,
}

fn default_total_classes() -> i64 {
    DEFAULT_TOTAL_CLASSES
}

fn default_minimum_attendance() -> i64 {
    DEFAULT_MINIMUM_ATTENDANCE
}

impl NewSubject {
    /// Checks every constraint and collects all violations in one message.
    pub fn validate(&self) -> AppResult<()> {
        let mut problems = Vec::new();

        if self.name.trim().is_empty() {
            problems.push("name must not be empty".to_string());
        }
        if self.total_classes < 0 {
            problems.push("totalClasses must be >= 0".to_string());
        }
        if self.attended_classes < 0 {
            problems.push("attendedClasses must be >= 0".to_string());
        } else if self.attended_classes > self.total_classes {
            problems.push("attendedClasses must not exceed totalClasses".to_string());
        }
        if let Err(e) = validate_minimum_attendance(self.minimum_attendance) {
            problems.push(e);
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(problems.join("; ")))
        }
    }
}

/// Body of `PATCH /api/subjects/{id}/attendance`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceOverride {
    pub attended_classes: i64,
}

impl AttendanceOverride {
    /// The override must keep `0 <= attended <= total` for the target subject.
    pub fn validate_against(&self, subject: &Subject) -> AppResult<()> {
        if self.attended_classes < 0 {
            return Err(AppError::Validation(
                "attendedClasses must be >= 0".to_string(),
            ));
        }
        if self.attended_classes > subject.total_classes {
            return Err(AppError::Validation(format!(
                "attendedClasses ({}) must not exceed totalClasses ({})",
                self.attended_classes, subject.total_classes
            )));
        }
        Ok(())
    }
}

fn validate_minimum_attendance(value: i64) -> Result<(), String> {
    if (0..=100).contains(&value) {
        Ok(())
    } else {
        Err("minimumAttendance must be between 0 and 100".to_string())
    }
}
