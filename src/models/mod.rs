// src/models/mod.rs
pub mod attendance;
pub mod document;
pub mod schedule;
pub mod strategy;
pub mod subject;
