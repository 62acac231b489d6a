//! Prometheus metrics for Daedalus.
//!
//! The binder records its counters through the `metrics` facade, so they
//! are no-ops until a recorder is installed. [`init_metrics`] installs a
//! Prometheus recorder without an HTTP listener; the host application
//! exposes [`render_metrics`] on whatever endpoint it already serves.
//!
//! # Bind Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `daedalus_bind_total` | Counter | `source`, `outcome` | Bind attempts by source (`query`, `form`, `json`, `xml`, `none`) and outcome (`ok`, `error`) |
//! | `daedalus_bind_field_errors_total` | Counter | `kind` | Field conversion failures by kind |
//!
//! # Example
//!
//! ```rust,ignore
//! use daedalus_telemetry::metrics::{init_metrics, render_metrics, MetricsConfig};
//!
//! init_metrics(&MetricsConfig::default())?;
//! // ... bind some requests ...
//! let body = render_metrics().unwrap_or_default();
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use metrics::describe_counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

pub use daedalus_core::metric_names::{BIND_FIELD_ERRORS_TOTAL, BIND_TOTAL};

/// Global metrics handle for rendering.
static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics configuration.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Whether metrics are enabled.
    pub enabled: bool,

    /// Labels attached to every metric (e.g., `service`).
    pub global_labels: Vec<(String, String)>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            global_labels: Vec::new(),
        }
    }
}

impl MetricsConfig {
    /// Adds a label attached to every metric.
    #[must_use]
    pub fn global_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.global_labels.push((key.into(), value.into()));
        self
    }
}

fn builder(config: &MetricsConfig) -> PrometheusBuilder {
    config
        .global_labels
        .iter()
        .fold(PrometheusBuilder::new(), |builder, (key, value)| {
            builder.add_global_label(key, value)
        })
}

/// Installs the global Prometheus recorder.
///
/// A no-op when `config.enabled` is false.
///
/// # Errors
///
/// Returns `TelemetryError::MetricsInit` if a global recorder is already
/// installed.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let handle = builder(config)
        .install_recorder()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    let _ = METRICS_HANDLE.set(handle);

    describe_bind_metrics();

    Ok(())
}

/// Returns the global metrics handle if initialized.
pub fn metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Renders metrics in Prometheus text format.
///
/// Returns `None` if metrics are not initialized.
#[must_use]
pub fn render_metrics() -> Option<String> {
    METRICS_HANDLE.get().map(PrometheusHandle::render)
}

/// Registers descriptions for the bind counters with the current recorder.
pub fn describe_bind_metrics() {
    describe_counter!(
        BIND_TOTAL,
        "Total bind attempts by data source and outcome"
    );
    describe_counter!(
        BIND_FIELD_ERRORS_TOTAL,
        "Total field conversion failures by kind"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics::counter;

    #[test]
    fn test_default_config() {
        let config = MetricsConfig::default();
        assert!(config.enabled);
        assert!(config.global_labels.is_empty());
    }

    #[test]
    fn test_global_labels() {
        let config = MetricsConfig::default().global_label("service", "catalog");
        assert_eq!(
            config.global_labels,
            vec![("service".to_string(), "catalog".to_string())]
        );
    }

    #[test]
    fn test_disabled_metrics() {
        let config = MetricsConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(init_metrics(&config).is_ok());
    }

    #[test]
    fn test_bind_counters_render() {
        let recorder = builder(&MetricsConfig::default().global_label("service", "test"))
            .build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            describe_bind_metrics();
            counter!(BIND_TOTAL, "source" => "query", "outcome" => "ok").increment(2);
            counter!(BIND_FIELD_ERRORS_TOTAL, "kind" => "integer_syntax").increment(1);
        });

        let rendered = handle.render();
        assert!(rendered.contains("# TYPE daedalus_bind_total counter"));
        assert!(rendered.contains("daedalus_bind_total{"));
        assert!(rendered.contains("source=\"query\""));
        assert!(rendered.contains("service=\"test\""));
        assert!(rendered.contains("daedalus_bind_field_errors_total{"));
    }
}
