pub mod app;
pub mod borrower;
pub mod metrics;
pub mod search_deed;
pub mod signing;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// 302 to the next step. `axum::response::Redirect::to` answers 303.
pub fn found(uri: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, uri.to_string())]).into_response()
}

/// Re-render a form page with its inline error; these pages answer 307
/// rather than a 4xx when the borrower's input is rejected.
pub fn rerender(page: impl IntoResponse) -> Response {
    (StatusCode::TEMPORARY_REDIRECT, page).into_response()
}
