use anyhow::Result;
use envconfig::Envconfig;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, Envconfig)]
pub struct AppConfig {
    // Server configuration
    #[envconfig(from = "SERVER_HOST", default = "0.0.0.0")]
    pub server_host: String,

    #[envconfig(from = "SERVER_PORT", default = "8080")]
    pub server_port: u16,

    /// Comma-separated; empty allows any origin.
    #[envconfig(from = "CORS_ALLOWED_ORIGINS", default = "")]
    pub cors_allowed_origins: String,

    // Storage configuration
    #[envconfig(from = "STORAGE_TYPE", default = "memory")]
    pub storage_type: String,

    // Runner lifecycle
    #[envconfig(from = "RUNNER_URL_BASE", default = "https://ide.revature.com")]
    pub runner_url_base: String,

    #[envconfig(from = "RUNNER_PROVISION_DELAY_MS", default = "10000")]
    pub runner_provision_delay_ms: u64,

    #[envconfig(from = "RUNNER_DEFAULT_DURATION_MINUTES", default = "180")]
    pub runner_default_duration_minutes: u32,

    // Listing
    #[envconfig(from = "PAGE_SIZE", default = "5")]
    pub page_size: usize,

    #[envconfig(from = "SEED_SAMPLE_DATA", default = "false")]
    pub seed_sample_data: bool,

    // Observability configuration
    #[envconfig(from = "LOG_LEVEL", default = "info")]
    pub log_level: String,

    #[envconfig(from = "LOG_FORMAT", default = "plain")]
    pub log_format: String,
}

impl AppConfig {
    /// Load configuration from environment variables only
    pub fn load_from_env() -> Result<Self> {
        Ok(Self::init_from_env()?)
    }

    pub fn server(&self) -> ServerConfig {
        ServerConfig {
            host: self.server_host.clone(),
            port: self.server_port,
            cors_allowed_origins: self
                .cors_allowed_origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn storage(&self) -> StorageConfig {
        let storage_type = match self.storage_type.to_lowercase().as_str() {
            "memory" => StorageType::Memory,
            other => {
                warn!(
                    "Unrecognized storage type '{}', falling back to 'memory'.",
                    other
                );
                StorageType::Memory
            }
        };
        StorageConfig { storage_type }
    }

    pub fn lifecycle(&self) -> LifecycleConfig {
        let default_duration_minutes = if (ide_models::MIN_SESSION_MINUTES
            ..=ide_models::MAX_SESSION_MINUTES)
            .contains(&self.runner_default_duration_minutes)
        {
            self.runner_default_duration_minutes
        } else {
            warn!(
                "RUNNER_DEFAULT_DURATION_MINUTES={} is out of range, using {}",
                self.runner_default_duration_minutes,
                DEFAULT_SESSION_MINUTES
            );
            DEFAULT_SESSION_MINUTES
        };

        LifecycleConfig {
            url_base: self.runner_url_base.clone(),
            provision_delay: Duration::from_millis(
                self.runner_provision_delay_ms,
            ),
            default_duration_minutes,
        }
    }

    pub fn views(&self) -> ViewConfig {
        ViewConfig {
            page_size: self.page_size.clamp(1, MAX_PAGE_SIZE),
            seed_sample_data: self.seed_sample_data,
        }
    }

    pub fn observability(&self) -> ObservabilityConfig {
        ObservabilityConfig {
            logging: LoggingConfig {
                level: self.log_level.clone(),
                format: self.log_format.clone(),
            },
        }
    }
}

pub const DEFAULT_SESSION_MINUTES: u32 = 180;
pub const DEFAULT_PAGE_SIZE: usize = 5;
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub storage_type: StorageType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    Memory,
}

/// Timing and addressing of runner sessions.
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    pub url_base: String,
    /// Time a runner spends in `starting` before it becomes `ready`.
    pub provision_delay: Duration,
    pub default_duration_minutes: u32,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            url_base: "https://ide.revature.com".to_string(),
            provision_delay: Duration::from_secs(10),
            default_duration_minutes: DEFAULT_SESSION_MINUTES,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewConfig {
    pub page_size: usize,
    pub seed_sample_data: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            seed_sample_data: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}
