// src/web/mod.rs
pub mod attendance_handlers;
pub mod dashboard_handlers;
pub mod document_handlers;
pub mod extract;
pub mod routes;
pub mod schedule_handlers;
pub mod subject_handlers;
