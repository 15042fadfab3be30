// src/models/document.rs
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum DocumentKind {
    Calendar,
    Timetable,
}

impl FromStr for DocumentKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "calendar" => Ok(DocumentKind::Calendar),
            "timetable" => Ok(DocumentKind::Timetable),
            other => Err(AppError::Validation(format!(
                "Invalid document type '{}' (expected 'calendar' or 'timetable')",
                other
            ))),
        }
    }
}

/// Bookkeeping for an uploaded PDF. The file content itself is not kept.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedDocument {
    pub id: String,
    pub filename: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub size_bytes: i64,
    /// Always `None`: no text is extracted from uploads.
    pub extracted_text: Option<String>,
    /// Always `false`. Uploads are stored as bookkeeping only and never
    /// parsed, so clients must not wait for this to flip.
    pub processed: bool,
    pub created_at: DateTime<Utc>,
}

/// A validated upload, ready to be recorded.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub filename: String,
    pub kind: DocumentKind,
    pub size_bytes: i64,
}

/// Reply to `POST /api/upload`. The upload is recorded, not processed: the
/// returned document has `processed: false` and no extracted text.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub document: UploadedDocument,
}
