// src/models/strategy.rs
use serde::Serialize;

/// Binary classification of a subject against its minimum attendance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Safe,
    Warning,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Safe => "safe",
            AttendanceStatus::Warning => "warning",
        }
    }
}

/// Stored counters that had to be corrected before computing a report.
/// The report is still produced so list endpoints keep going.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Inconsistency {
    /// `totalClasses == 0`: there is no rate to compute.
    NoClassesHeld,
    #[serde(rename_all = "camelCase")]
    AttendedExceedsTotal { attended_classes: i64, total_classes: i64 },
    #[serde(rename_all = "camelCase")]
    NegativeCounter { field: &'static str, value: i64 },
    #[serde(rename_all = "camelCase")]
    ThresholdOutOfRange { minimum_attendance: i64 },
}

/// Output of the skip-strategy calculator (`GET /api/skip-calculator/{id}`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyReport {
    pub subject_name: String,
    /// Rate rounded to one decimal. Display only; never used for the status.
    pub current_attendance: f64,
    pub required_classes: i64,
    pub can_skip: i64,
    pub need_to_attend: i64,
    pub status: AttendanceStatus,
    pub recommendation: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inconsistencies: Vec<Inconsistency>,
}

impl StrategyReport {
    pub fn is_consistent(&self) -> bool {
        self.inconsistencies.is_empty()
    }
}
