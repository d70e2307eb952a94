use crate::services::{check_services, ServiceCheck, ServiceCheckReport};
use crate::AppState;
use askama::Template;
use axum::{extract::State, response::IntoResponse, Json};

#[derive(Template)]
#[template(path = "start.html")]
pub struct StartTemplate {}

pub async fn index() -> impl IntoResponse {
    StartTemplate {}
}

pub async fn health_check() -> &'static str {
    "OK"
}

/// Health of this frontend and everything behind the deed API.
///
/// Always answers 200; callers read the per-service `status_code`s.
pub async fn service_check(State(state): State<AppState>) -> Json<ServiceCheckReport> {
    let check = check_services(&state.deed_api).await;

    if matches!(check, ServiceCheck::Degraded(_)) {
        tracing::warn!(
            status_code = check.status_code(),
            "Service check degraded: deed-api unavailable"
        );
    }

    Json(check.into_report())
}
