// src/services/document_service.rs
use crate::{
    error::{AppError, AppResult},
    models::document::{NewDocument, UploadedDocument},
};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Extra request-body allowance on top of the file limit, for the multipart
/// boundaries, part headers and the `type` field.
pub const MULTIPART_HEADROOM_BYTES: usize = 64 * 1024;
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Accepts only non-empty payloads declared as PDF that also look like one.
pub fn validate_pdf(content_type: Option<&str>, bytes: &[u8]) -> AppResult<()> {
    let declared_pdf = content_type
        .map(|ct| ct.split(';').next().unwrap_or("").trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE))
        .unwrap_or(false);
    if !declared_pdf {
        return Err(AppError::Validation("Only PDF files are allowed".to_string()));
    }
    if bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(AppError::Validation(
            "Uploaded file is not a valid PDF".to_string(),
        ));
    }
    Ok(())
}

/// Records an upload. Text extraction is not performed, so the document is
/// stored unprocessed and without extracted text.
pub async fn create_document(
    db_pool: &SqlitePool,
    new_document: &NewDocument,
) -> AppResult<UploadedDocument> {
    let document = UploadedDocument {
        id: Uuid::new_v4().to_string(),
        filename: new_document.filename.clone(),
        kind: new_document.kind,
        size_bytes: new_document.size_bytes,
        extracted_text: None,
        processed: false,
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO uploaded_documents (id, filename, kind, size_bytes, extracted_text, processed, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&document.id)
    .bind(&document.filename)
    .bind(document.kind)
    .bind(document.size_bytes)
    .bind(&document.extracted_text)
    .bind(document.processed)
    .bind(document.created_at)
    .execute(db_pool)
    .await?;

    tracing::info!(
        "📄 Document '{}' ({:?}, {} bytes) recorded as {}.",
        document.filename,
        document.kind,
        document.size_bytes,
        document.id
    );
    Ok(document)
}

pub async fn find_all_documents(db_pool: &SqlitePool) -> AppResult<Vec<UploadedDocument>> {
    tracing::debug!("Fetching uploaded documents...");
    let documents = sqlx::query_as::<_, UploadedDocument>(
        r#"
        SELECT id, filename, kind, size_bytes, extracted_text, processed, created_at
        FROM uploaded_documents
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(db_pool)
    .await?;
    Ok(documents)
}
