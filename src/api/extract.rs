//! Extractors whose rejections use the error envelope instead of plain text.

use axum::extract::{FromRequest, FromRequestParts};

use crate::errors::AppError;

/// JSON body; malformed or mistyped bodies become `BAD_REQUEST`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Path parameters; unparseable segments become `BAD_REQUEST`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Query string parameters.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
