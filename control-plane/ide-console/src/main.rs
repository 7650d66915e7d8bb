use anyhow::Result;
use clap::Command;
use ide_console::{bootstrap::build_api_server, config::AppConfig};
use ide_observability::{TracingConfig, setup_tracing};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let _matches = Command::new("ide-console")
        .about("Cloud IDE console: connectors, images and runner sessions")
        .version(env!("CARGO_PKG_VERSION"))
        .get_matches();

    let config = AppConfig::load_from_env()?;

    let logging = config.observability().logging;
    let tracing_config =
        TracingConfig::new("ide-console", &logging.level, &logging.format);
    setup_tracing(tracing_config).expect("Failed to setup tracing");

    info!("Starting Cloud IDE console with environment-based config");
    let server = build_api_server(&config).await?;

    if let Err(e) = server.serve().await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
