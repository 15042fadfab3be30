// src/services/strategy_service.rs
//
// Skip-strategy calculator. Pure: reads a Subject snapshot, never mutates it,
// never touches the database.
//
// Threshold rule: the status is decided on the exact (unrounded) rate, which
// for integer counters is `attended * 100 >= total * minimum`. This is the same
// condition as `attended >= required_classes`, so status, canSkip and
// needToAttend always agree. The one-decimal rate is for display only.
use crate::models::{
    strategy::{AttendanceStatus, Inconsistency, StrategyReport},
    subject::{Subject, SubjectWithStats},
};

pub const NO_CLASSES_RECOMMENDATION: &str =
    "No classes have been held yet, so attendance cannot be assessed.";

/// Computes the status and skip/attend recommendation for a subject.
///
/// Out-of-invariant counters (zero or negative totals, attended above total,
/// thresholds outside 0..=100) are clamped and reported in
/// `StrategyReport::inconsistencies` instead of failing.
pub fn compute_strategy(subject: &Subject) -> StrategyReport {
    let mut inconsistencies = Vec::new();

    let total = non_negative("totalClasses", subject.total_classes, &mut inconsistencies);
    let mut attended = non_negative(
        "attendedClasses",
        subject.attended_classes,
        &mut inconsistencies,
    );
    if attended > total {
        inconsistencies.push(Inconsistency::AttendedExceedsTotal {
            attended_classes: subject.attended_classes,
            total_classes: subject.total_classes,
        });
        attended = total;
    }

    let minimum = subject.minimum_attendance.clamp(0, 100);
    if minimum != subject.minimum_attendance {
        inconsistencies.push(Inconsistency::ThresholdOutOfRange {
            minimum_attendance: subject.minimum_attendance,
        });
    }

    if total == 0 {
        inconsistencies.push(Inconsistency::NoClassesHeld);
        return StrategyReport {
            subject_name: subject.name.clone(),
            current_attendance: 0.0,
            required_classes: 0,
            can_skip: 0,
            need_to_attend: 0,
            status: AttendanceStatus::Warning,
            recommendation: NO_CLASSES_RECOMMENDATION.to_string(),
            inconsistencies,
        };
    }

    let required = required_classes(total, minimum);
    let can_skip = (attended - required).max(0);
    let need_to_attend = (required - attended).max(0);

    let status = if meets_minimum(attended, total, minimum) {
        AttendanceStatus::Safe
    } else {
        AttendanceStatus::Warning
    };

    StrategyReport {
        subject_name: subject.name.clone(),
        current_attendance: display_rate(attended, total),
        required_classes: required,
        can_skip,
        need_to_attend,
        status,
        recommendation: recommendation(status, can_skip, need_to_attend),
        inconsistencies,
    }
}

/// Annotates a subject with the derived fields used by the list endpoints.
pub fn annotate(subject: Subject) -> SubjectWithStats {
    let report = compute_strategy(&subject);
    SubjectWithStats::new(subject, report)
}

/// `ceil(total * minimum / 100)`, in integers so 22.5 becomes 23 exactly.
pub fn required_classes(total: i64, minimum: i64) -> i64 {
    let product = i128::from(total) * i128::from(minimum);
    // both factors are non-negative here, so this is a ceiling division
    let required = (product + 99) / 100;
    i64::try_from(required).unwrap_or(i64::MAX)
}

/// Exact comparison of the unrounded rate against the threshold.
pub fn meets_minimum(attended: i64, total: i64, minimum: i64) -> bool {
    i128::from(attended) * 100 >= i128::from(total) * i128::from(minimum)
}

/// Attendance rate rounded half-up to one decimal. `total` must be > 0.
pub fn display_rate(attended: i64, total: i64) -> f64 {
    let attended = i128::from(attended);
    let total = i128::from(total);
    // tenths of a percent, rounded half-up: floor(a * 1000 / t + 1/2)
    let tenths = (attended * 2000 + total) / (2 * total);
    tenths as f64 / 10.0
}

pub fn recommendation(status: AttendanceStatus, can_skip: i64, need_to_attend: i64) -> String {
    match status {
        AttendanceStatus::Safe => {
            format!("You can skip up to {} more classes safely.", can_skip)
        }
        AttendanceStatus::Warning => format!(
            "You need to attend at least {} more classes to meet minimum requirement.",
            need_to_attend
        ),
    }
}

fn non_negative(field: &'static str, value: i64, found: &mut Vec<Inconsistency>) -> i64 {
    if value < 0 {
        found.push(Inconsistency::NegativeCounter { field, value });
        0
    } else {
        value
    }
}
