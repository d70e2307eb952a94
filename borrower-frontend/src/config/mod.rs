use serde::Deserialize;
use service_core::error::AppError;
use std::path::PathBuf;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub deed_api: DeedApiSettings,
    #[serde(default)]
    pub observability: ObservabilitySettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Mark the session cookie `Secure`; leave off only for plain-HTTP local runs.
    #[serde(default)]
    pub secure_cookies: bool,
    /// Idle time after which a borrower's signing session is discarded.
    #[serde(default = "default_session_expiry_minutes")]
    pub session_expiry_minutes: i64,
}

fn default_session_expiry_minutes() -> i64 {
    30
}

#[derive(Deserialize, Clone)]
pub struct DeedApiSettings {
    /// Base URL of the deed API (e.g., http://deed-api:8080).
    pub url: String,
    #[serde(default = "default_health_path")]
    pub health_path: String,
}

fn default_health_path() -> String {
    "/health/service-check".to_string()
}

#[derive(Deserialize, Clone)]
pub struct ObservabilitySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP collector endpoint; span export is disabled when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for ObservabilitySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// The `borrower-frontend` crate directory, whether the process was started
/// from it or from the workspace root.
pub fn crate_directory() -> std::io::Result<PathBuf> {
    let base_path = std::env::current_dir()?;

    if base_path.ends_with("borrower-frontend") {
        Ok(base_path)
    } else {
        Ok(base_path.join("borrower-frontend"))
    }
}

pub fn get_configuration() -> Result<Settings, AppError> {
    let configuration_directory = crate_directory()?.join("config");

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize::<Settings>()?)
}
