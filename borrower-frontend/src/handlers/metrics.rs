use crate::services::get_metrics;
use axum::{http::header, response::IntoResponse};
use service_core::error::AppError;

pub async fn metrics() -> Result<impl IntoResponse, AppError> {
    let body = get_metrics().ok_or(AppError::ServiceUnavailable("metrics recorder"))?;
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body))
}
