use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt,
};

#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub service_name: String,
    pub log_level: String,
    pub json_format: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            service_name: "ide-console".to_string(),
            log_level: "info".to_string(),
            json_format: false,
        }
    }
}

impl TracingConfig {
    /// `format` is matched case-insensitively; anything but `json` is plain.
    pub fn new(service_name: &str, log_level: &str, format: &str) -> Self {
        Self {
            service_name: service_name.to_string(),
            log_level: log_level.to_string(),
            json_format: format.eq_ignore_ascii_case("json"),
        }
    }
}

pub fn setup_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_file(true)
        .with_line_number(true);

    let fmt_layer = if config.json_format {
        fmt_layer.json().boxed()
    } else {
        fmt_layer.boxed()
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TracingError::Setup(e.to_string()))?;

    Registry::default()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| TracingError::Setup(e.to_string()))?;

    ::tracing::debug!(service = %config.service_name, "tracing initialised");
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Tracing setup error: {0}")]
    Setup(String),
}
