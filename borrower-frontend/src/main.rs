use borrower_frontend::config::get_configuration;
use borrower_frontend::services::init_metrics;
use borrower_frontend::startup::Application;
use dotenvy::dotenv;
use service_core::observability::init_tracing;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "borrower-frontend",
        &configuration.observability.log_level,
        configuration.observability.otlp_endpoint.as_deref(),
    );

    if let Err(e) = init_metrics() {
        tracing::warn!("Metrics disabled: {}", e);
    }

    let application = Application::build(configuration).await?;
    info!("Starting borrower-frontend on port {}", application.port());

    application.run_until_stopped().await?;

    Ok(())
}
