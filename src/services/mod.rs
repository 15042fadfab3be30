// src/services/mod.rs
pub mod attendance_service;
pub mod document_service;
pub mod schedule_service;
pub mod strategy_service;
pub mod subject_service;
