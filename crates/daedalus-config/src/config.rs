//! Main configuration types.
//!
//! This module provides the top-level [`DaedalusConfig`] struct and its builder.

use daedalus_extract::BindLimits;
use daedalus_telemetry::{LogConfig, MetricsConfig};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, LimitsConfig, LogFormat, LoggingConfig, MetricsSection};

/// Complete Daedalus configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use daedalus_config::DaedalusConfig;
///
/// let config = DaedalusConfig::default();
/// assert_eq!(config.limits.max_body_size, 1024 * 1024);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct DaedalusConfig {
    /// Binder limits.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Metrics configuration.
    #[serde(default)]
    pub metrics: MetricsSection,
}

impl DaedalusConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> DaedalusConfigBuilder {
        DaedalusConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - Any limit is zero
    /// - The log level is not a valid filter directive
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = [
            ("limits.max_body_size", self.limits.max_body_size),
            ("limits.max_multipart_fields", self.limits.max_multipart_fields),
            (
                "limits.max_multipart_field_size",
                self.limits.max_multipart_field_size,
            ),
        ];
        if let Some((field, _)) = limits.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::invalid_value(*field, "must be greater than zero"));
        }

        if self.logging.enabled {
            daedalus_telemetry::logging::create_env_filter(&self.logging.level)
                .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// Pretty logs with source locations, and binder tracing enabled.
    ///
    /// # Example
    ///
    /// ```
    /// use daedalus_config::{DaedalusConfig, LogFormat};
    ///
    /// let config = DaedalusConfig::development();
    /// assert_eq!(config.logging.format, LogFormat::Pretty);
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.logging.level = "debug,daedalus_core=trace".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.include_location = true;

        config
    }

    /// Create a production configuration preset.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;

        config
    }

    /// Limits for [`DefaultBinder`](daedalus_extract::DefaultBinder).
    #[must_use]
    pub fn binder_limits(&self) -> BindLimits {
        BindLimits::new()
            .max_body_size(self.limits.max_body_size)
            .max_multipart_fields(self.limits.max_multipart_fields)
            .max_multipart_field_size(self.limits.max_multipart_field_size)
    }

    /// Logging setup for [`init_logging`](daedalus_telemetry::init_logging).
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.logging.enabled,
            level: self.logging.level.clone(),
            format: self.logging.format.into(),
            include_location: self.logging.include_location,
            ..LogConfig::default()
        }
    }

    /// Metrics setup for [`init_metrics`](daedalus_telemetry::init_metrics).
    #[must_use]
    pub fn metrics_config(&self) -> MetricsConfig {
        let config = MetricsConfig {
            enabled: self.metrics.enabled,
            ..MetricsConfig::default()
        };
        match &self.metrics.service_name {
            Some(name) => config.global_label("service", name.clone()),
            None => config,
        }
    }
}

/// Builder for [`DaedalusConfig`].
#[derive(Debug, Default)]
pub struct DaedalusConfigBuilder {
    limits: Option<LimitsConfig>,
    logging: Option<LoggingConfig>,
    metrics: Option<MetricsSection>,
}

impl DaedalusConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limits section.
    #[must_use]
    pub fn limits(mut self, limits: LimitsConfig) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Set the logging section.
    #[must_use]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Set the metrics section.
    #[must_use]
    pub fn metrics(mut self, metrics: MetricsSection) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Build the configuration.
    ///
    /// Any unset sections will use their default values.
    #[must_use]
    pub fn build(self) -> DaedalusConfig {
        DaedalusConfig {
            limits: self.limits.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
            metrics: self.metrics.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<DaedalusConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
