//! Configuration schema types.
//!
//! This module defines the structure of all configuration sections.

use daedalus_extract::{
    DEFAULT_MAX_BODY_SIZE, DEFAULT_MAX_MULTIPART_FIELDS, DEFAULT_MAX_MULTIPART_FIELD_SIZE,
};
use serde::{Deserialize, Serialize};

/// Binder limits section.
///
/// # Example
///
/// ```
/// use daedalus_config::LimitsConfig;
///
/// let limits = LimitsConfig {
///     max_body_size: 64 * 1024,
///     ..Default::default()
/// };
/// assert_eq!(limits.max_multipart_fields, 100);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Largest request body the binder will decode, in bytes.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// Maximum number of parts in a multipart body.
    #[serde(default = "default_max_multipart_fields")]
    pub max_multipart_fields: usize,

    /// Maximum size of a single multipart part, in bytes.
    #[serde(default = "default_max_multipart_field_size")]
    pub max_multipart_field_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: default_max_body_size(),
            max_multipart_fields: default_max_multipart_fields(),
            max_multipart_field_size: default_max_multipart_field_size(),
        }
    }
}

fn default_max_body_size() -> usize {
    DEFAULT_MAX_BODY_SIZE
}

fn default_max_multipart_fields() -> usize {
    DEFAULT_MAX_MULTIPART_FIELDS
}

fn default_max_multipart_field_size() -> usize {
    DEFAULT_MAX_MULTIPART_FIELD_SIZE
}

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable logs (development).
    Pretty,
}

impl From<LogFormat> for daedalus_telemetry::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
        }
    }
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive (e.g., "info" or "info,daedalus_core=trace").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include file and line number in log output.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Metrics section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Install the Prometheus recorder.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Value of a `service` label attached to every metric.
    #[serde(default)]
    pub service_name: Option<String>,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            enabled: true,
            service_name: None,
        }
    }
}

fn default_true() -> bool {
    true
}
