use relay_service::config::RelayConfig;
use relay_service::startup::Application;
use service_core::error::AppError;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Fail fast: no listener is bound without a usable API key.
    let config = RelayConfig::load()?;

    init_tracing(
        "relay-service",
        &config.common.log_level,
        config.otlp_endpoint.as_deref(),
    );

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting relay service"
    );

    let app = Application::build(config).await?;
    app.run_until_stopped().await?;

    Ok(())
}
