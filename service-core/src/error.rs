use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Failures outside the borrower flow: startup, configuration and
/// operational endpoints.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A component this endpoint needs was never initialised.
    #[error("{0} is unavailable")]
    ServiceUnavailable(&'static str),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::ServiceUnavailable(component) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorBody {
                    error: "Service unavailable",
                    details: Some(format!("{} is not initialised", component)),
                },
            ),
            AppError::Config(_) | AppError::Io(_) => {
                tracing::error!(error = %self, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "Internal server error",
                        details: None,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
