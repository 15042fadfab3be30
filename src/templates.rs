// src/templates.rs
use crate::models::{schedule::ScheduleEvent, subject::SubjectWithStats};
use askama::Template;

// Struct for `dashboard.html` (templates/ folder)
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage<'a> {
    pub subjects: &'a [SubjectWithStats],
    pub upcoming: &'a [ScheduleEvent],
    pub safe_count: usize,
    pub warning_count: usize,
}

impl<'a> DashboardPage<'a> {
    pub fn new(subjects: &'a [SubjectWithStats], upcoming: &'a [ScheduleEvent]) -> Self {
        let safe_count = subjects
            .iter()
            .filter(|s| s.status == crate::models::strategy::AttendanceStatus::Safe)
            .count();
        DashboardPage {
            subjects,
            upcoming,
            safe_count,
            warning_count: subjects.len() - safe_count,
        }
    }
}
