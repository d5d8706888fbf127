use org_portal::config::{get_configuration, SERVICE_NAME};
use org_portal::startup::Application;
use service_core::observability::init_tracing;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(SERVICE_NAME, &configuration.telemetry);

    org_portal::services::metrics::init_metrics();

    let application = Application::build(configuration.clone()).await?;

    info!(
        "Starting {} on {}:{}",
        SERVICE_NAME,
        configuration.server.host,
        application.port()
    );
    application.run_until_stopped().await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
