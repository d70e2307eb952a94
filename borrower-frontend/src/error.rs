use crate::handlers::found;
use askama::Template;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Where a borrower whose session has lapsed starts again.
pub const SESSION_EXPIRED_REDIRECT: &str = "/borrower-reference";

/// Where a borrower who skipped the network agreement is sent back to.
pub const AGREEMENT_REDIRECT: &str = "/confirm-naa";

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("session has no {0}")]
    SessionExpired(&'static str),

    #[error("network agreement has not been accepted")]
    AgreementRequired,

    #[error("invalid form submission: {0}")]
    InvalidForm(String),

    #[error("deed {0} not found")]
    DeedNotFound(String),

    #[error("deed API request failed: {0}")]
    DeedApi(#[from] anyhow::Error),

    #[error("session store error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("session layer is not installed")]
    SessionUnavailable,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: &'static str,
    pub message: &'static str,
}

impl IntoResponse for FlowError {
    fn into_response(self) -> Response {
        match self {
            FlowError::SessionExpired(missing) => {
                tracing::info!(missing, "Borrower session expired, restarting flow");
                found(SESSION_EXPIRED_REDIRECT)
            }
            FlowError::AgreementRequired => found(AGREEMENT_REDIRECT),
            FlowError::InvalidForm(reason) => {
                tracing::warn!(%reason, "Rejected form submission");
                (StatusCode::BAD_REQUEST, reason).into_response()
            }
            FlowError::DeedNotFound(deed_token) => {
                tracing::warn!(%deed_token, "Deed in session not found by deed API");
                (
                    StatusCode::NOT_FOUND,
                    ErrorTemplate {
                        title: "Mortgage deed not found",
                        message: "We could not find your mortgage deed. Please contact your conveyancer.",
                    },
                )
                    .into_response()
            }
            FlowError::DeedApi(e) => {
                tracing::error!(error = ?e, "Deed API call failed");
                service_unavailable_page()
            }
            FlowError::Session(e) => {
                tracing::error!(error = %e, "Session store failure");
                service_unavailable_page()
            }
            FlowError::SessionUnavailable => {
                tracing::error!("Session layer missing from router");
                service_unavailable_page()
            }
        }
    }
}

fn service_unavailable_page() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorTemplate {
            title: "Sorry, there is a problem with the service",
            message: "Please try again later.",
        },
    )
        .into_response()
}
