use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json`, but malformed bodies come back as a JSON `AppError::BadRequest`
/// instead of axum's plain-text rejection.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
