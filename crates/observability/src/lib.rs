//! Parley Observability - tracing setup shared by the parley crates
//!
//! # Quick Start
//!
//! ```no_run
//! use parley_observability::{init, LogFormat, ObservabilityConfig};
//!
//! let config = ObservabilityConfig::new("parley")
//!     .with_format(LogFormat::Json)
//!     .with_log_level("info,parley_runtime=debug");
//!
//! init(config)?;
//!
//! // Or initialize from environment variables
//! // parley_observability::init_from_env()?;
//!
//! tracing::info!("Service started");
//! # Ok::<(), parley_observability::ObservabilityError>(())
//! ```
//!
//! # Environment Variables
//!
//! - `PARLEY_SERVICE_NAME` or `OTEL_SERVICE_NAME` - Service name
//! - `PARLEY_OTLP_ENDPOINT` or `OTEL_EXPORTER_OTLP_ENDPOINT` - OTLP endpoint
//! - `PARLEY_LOG_LEVEL` or `RUST_LOG` - Log level filter
//! - `PARLEY_LOG_FORMAT` - `pretty` or `json`

pub mod config;
pub mod error;
pub mod telemetry;
pub mod tracing;

pub use config::{LogFormat, ObservabilityConfig};
pub use error::ObservabilityError;
pub use telemetry::{init, init_from_env, shutdown};
pub use crate::tracing::{record_duration, record_error};

// Re-exported so the span macros resolve in crates that only depend on us.
#[doc(hidden)]
pub use ::tracing as __tracing;
