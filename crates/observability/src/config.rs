//! Configuration for observability/telemetry

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ObservabilityError;

const DEFAULT_SERVICE_NAME: &str = "parley";

/// Console log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ObservabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "plain" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(ObservabilityError::Config(format!(
                "unknown log format '{other}'"
            ))),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Service name attached to exported traces
    pub service_name: String,

    /// OTLP endpoint for trace export (e.g., "http://localhost:4317")
    pub otlp_endpoint: Option<String>,

    /// Emit log lines to stderr
    pub enable_console: bool,

    pub log_format: LogFormat,

    /// Log level filter (e.g., "info", "parley_runtime=debug").
    /// Falls back to `RUST_LOG`, then "info".
    pub log_level: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            otlp_endpoint: None,
            enable_console: true,
            log_format: LogFormat::Pretty,
            log_level: None,
        }
    }
}

impl ObservabilityConfig {
    /// Create a new configuration with service name
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    pub fn with_otlp_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.otlp_endpoint = Some(endpoint.into());
        self
    }

    /// Enable or disable console output
    pub fn with_console(mut self, enable: bool) -> Self {
        self.enable_console = enable;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    /// Build from environment variables
    ///
    /// Reads:
    /// - `PARLEY_SERVICE_NAME` or `OTEL_SERVICE_NAME` → service_name
    /// - `PARLEY_OTLP_ENDPOINT` or `OTEL_EXPORTER_OTLP_ENDPOINT` → otlp_endpoint
    /// - `PARLEY_LOG_LEVEL` or `RUST_LOG` → log_level
    /// - `PARLEY_LOG_FORMAT` (`pretty` | `json`) → log_format
    pub fn from_env() -> Self {
        let service_name = std::env::var("PARLEY_SERVICE_NAME")
            .or_else(|_| std::env::var("OTEL_SERVICE_NAME"))
            .unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string());

        // Only export when explicitly asked to; no collector is assumed.
        let otlp_endpoint = std::env::var("PARLEY_OTLP_ENDPOINT")
            .or_else(|_| std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT"))
            .ok();

        let log_level = std::env::var("PARLEY_LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok();

        let log_format = std::env::var("PARLEY_LOG_FORMAT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        Self {
            service_name,
            otlp_endpoint,
            enable_console: true,
            log_format,
            log_level,
        }
    }
}
