// src/web/document_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::document::{DocumentKind, NewDocument, UploadResponse, UploadedDocument},
    services::document_service,
    state::AppState,
};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Json,
};

/// POST /api/upload - multipart form with a `pdf` file and a `type` field.
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<UploadResponse>)> {
    let mut file: Option<(String, usize)> = None;
    let mut kind: Option<DocumentKind> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("pdf") => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| "upload.pdf".to_string());
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                if bytes.len() > state.config.max_upload_bytes {
                    return Err(AppError::PayloadTooLarge(format!(
                        "File is {} bytes, the limit is {}",
                        bytes.len(),
                        state.config.max_upload_bytes
                    )));
                }

                document_service::validate_pdf(content_type.as_deref(), &bytes)?;
                file = Some((filename, bytes.len()));
            }
            Some("type") => {
                kind = Some(field.text().await?.parse::<DocumentKind>()?);
            }
            other => {
                tracing::trace!("Ignoring multipart field {:?}", other);
            }
        }
    }

    let (filename, size) =
        file.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
    let kind = kind.ok_or_else(|| AppError::Validation("Invalid document type".to_string()))?;

    let size_bytes = i64::try_from(size).map_err(|_| AppError::Validation("File too large".to_string()))?;
    let document = document_service::create_document(
        &state.db_pool,
        &NewDocument {
            filename,
            kind,
            size_bytes,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "PDF uploaded successfully".to_string(),
            document,
        }),
    ))
}

/// GET /api/documents
pub async fn list_documents(State(state): State<AppState>) -> AppResult<Json<Vec<UploadedDocument>>> {
    let documents = document_service::find_all_documents(&state.db_pool).await?;
    Ok(Json(documents))
}
