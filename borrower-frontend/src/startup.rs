use axum::{middleware::from_fn, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use service_core::observability::REQUEST_ID_HEADER;
use std::path::PathBuf;
use std::sync::Arc;
use time::Duration;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::{crate_directory, ServerSettings, Settings};
use crate::handlers::{
    app::{health_check, index, service_check},
    borrower::{how_to_proceed, network_agreement_page, submit_network_agreement},
    metrics::metrics,
    search_deed::{
        borrower_reference_page, date_of_birth_page, mortgage_deed, submit_date_of_birth,
    },
    signing::{
        confirm_mortgage_is_signed, confirming_mortgage_deed, enter_auth_code_page, finished,
        request_auth_code, verify_auth_code, verify_auth_code_no_js,
    },
};
use crate::services::DeedApiClient;
use crate::AppState;

pub const SESSION_COOKIE_NAME: &str = "borrower_session";

pub fn build_router(state: AppState, server: &ServerSettings) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_name(SESSION_COOKIE_NAME)
        .with_secure(server.secure_cookies)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(
            server.session_expiry_minutes,
        )));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/service-check", get(service_check))
        .route("/metrics", get(metrics))
        .route("/borrower-reference", get(borrower_reference_page))
        .route(
            "/date-of-birth",
            get(date_of_birth_page).post(submit_date_of_birth),
        )
        .route("/how-to-proceed", get(how_to_proceed).post(how_to_proceed))
        .route(
            "/confirm-naa",
            get(network_agreement_page).post(submit_network_agreement),
        )
        .route(
            "/confirm-borrower-naa",
            get(network_agreement_page).post(submit_network_agreement),
        )
        .route("/mortgage-deed", get(mortgage_deed))
        .route(
            "/enter-authentication-code",
            get(enter_auth_code_page).post(request_auth_code),
        )
        .route("/verify-auth-code", axum::routing::post(verify_auth_code))
        .route(
            "/verify-auth-code-no-js",
            axum::routing::post(verify_auth_code_no_js),
        )
        .route(
            "/confirming-mortgage-deed",
            get(confirming_mortgage_deed).post(confirming_mortgage_deed),
        )
        .route("/confirm-mortgage-is-signed", get(confirm_mortgage_is_signed))
        .route("/finished", get(finished).post(finished))
        .nest_service("/static", ServeDir::new(static_directory()))
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Outermost, so the trace span sees the request id
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

fn static_directory() -> PathBuf {
    crate_directory()
        .map(|dir| dir.join("static"))
        .unwrap_or_else(|e| {
            tracing::warn!("Could not resolve crate directory for static assets: {}", e);
            PathBuf::from("static")
        })
}

/// Bound listener plus router, ready to serve.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(settings: Settings) -> Result<Self, AppError> {
        let deed_api = Arc::new(DeedApiClient::new(settings.deed_api.clone()));
        tracing::info!(deed_api = %deed_api.base_url(), "Using deed API");

        let router = build_router(AppState::new(deed_api), &settings.server);

        let address = format!("{}:{}", settings.server.host, settings.server.port);
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
            e
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Actual port, useful when configured with port 0.
    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), AppError> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
