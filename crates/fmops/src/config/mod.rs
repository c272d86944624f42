use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::workflows::sourcing::EvaluationWeights;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub sourcing: SourcingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("FMOPS_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("FMOPS_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("FMOPS_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("FMOPS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let sourcing = SourcingConfig {
            default_weights: EvaluationWeights {
                price: read_weight("FMOPS_WEIGHT_PRICE", 40)?,
                quality: read_weight("FMOPS_WEIGHT_QUALITY", 30)?,
                delivery: read_weight("FMOPS_WEIGHT_DELIVERY", 15)?,
                compliance: read_weight("FMOPS_WEIGHT_COMPLIANCE", 15)?,
            },
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            sourcing,
        })
    }
}

fn read_weight(key: &'static str, default: u32) -> Result<u32, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidWeight { key }),
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Defaults applied to newly created RFQs.
#[derive(Debug, Clone)]
pub struct SourcingConfig {
    pub default_weights: EvaluationWeights,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidWeight { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "FMOPS_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "FMOPS_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidWeight { key } => {
                write!(f, "{key} must be a non-negative integer weight")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidWeight { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
