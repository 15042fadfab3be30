// src/web/extract.rs
use crate::error::AppError;
use axum::extract::{FromRequest, FromRequestParts};

/// `Json<T>` whose rejections (bad syntax, wrong types, missing fields)
/// become `AppError::Validation` instead of axum's plain-text 4xx.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Same for query strings.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
