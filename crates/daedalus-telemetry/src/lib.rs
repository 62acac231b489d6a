//! Observability for Daedalus request binding.
//!
//! The binding crates only emit through the `tracing` and `metrics`
//! facades. This crate installs the backends:
//!
//! - **Logging**: JSON or pretty output via `tracing-subscriber` with an
//!   `EnvFilter`
//! - **Metrics**: a Prometheus recorder whose text output the host
//!   application serves itself
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `daedalus_bind_total` | Counter | `source`, `outcome` | Bind attempts |
//! | `daedalus_bind_field_errors_total` | Counter | `kind` | Field conversion failures |
//!
//! # Example
//!
//! ```rust,ignore
//! use daedalus_telemetry::{init_telemetry, LogConfig, MetricsConfig};
//!
//! init_telemetry(&LogConfig::production(), &MetricsConfig::default())?;
//! ```
//!
//! ```text
//! # HELP daedalus_bind_total Total bind attempts by data source and outcome
//! # TYPE daedalus_bind_total counter
//! daedalus_bind_total{source="query",outcome="ok"} 1234
//! daedalus_bind_total{source="json",outcome="error"} 56
//! ```

#![doc(html_root_url = "https://docs.rs/daedalus-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig, LogFormat};
pub use metrics::{init_metrics, render_metrics, MetricsConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Initializes logging, then metrics.
///
/// # Errors
///
/// Returns `TelemetryError` if either subsystem fails to initialize.
pub fn init_telemetry(logging: &LogConfig, metrics: &MetricsConfig) -> TelemetryResult<()> {
    init_logging(logging)?;
    init_metrics(metrics)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_with_everything_disabled() {
        let logging = LogConfig {
            enabled: false,
            ..LogConfig::default()
        };
        let metrics = MetricsConfig {
            enabled: false,
            ..MetricsConfig::default()
        };

        assert!(init_telemetry(&logging, &metrics).is_ok());
        assert!(render_metrics().is_none());
    }
}
