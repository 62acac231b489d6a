//! Typed configuration for Daedalus.
//!
//! Binder limits and telemetry settings are loaded in layers:
//! - Built-in defaults
//! - A TOML or JSON file (strict: unknown fields fail)
//! - Environment variable overrides
//!
//! The loaded [`DaedalusConfig`] converts into the types the other crates
//! take: [`DaedalusConfig::binder_limits`] for the
//! [`DefaultBinder`](daedalus_extract::DefaultBinder),
//! [`DaedalusConfig::log_config`] and [`DaedalusConfig::metrics_config`]
//! for `daedalus-telemetry`.
//!
//! # Example
//!
//! ```no_run
//! use daedalus_config::ConfigLoader;
//! use daedalus_extract::DefaultBinder;
//!
//! # fn main() -> Result<(), daedalus_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("daedalus.toml")?
//!     .with_env_prefix("DAEDALUS")
//!     .load()?;
//!
//! let binder = DefaultBinder::new(config.binder_limits());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [limits]
//! max_body_size = 1048576
//! max_multipart_fields = 100
//! max_multipart_field_size = 10485760
//!
//! [logging]
//! enabled = true
//! level = "info,daedalus_core=trace"
//! format = "json"
//! include_location = false
//!
//! [metrics]
//! enabled = true
//! service_name = "catalog"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values are overridden with `PREFIX__SECTION__KEY`, for example:
//!
//! - `DAEDALUS__LIMITS__MAX_BODY_SIZE=65536`
//! - `DAEDALUS__LOGGING__FORMAT=pretty`
//! - `DAEDALUS__METRICS__ENABLED=false`

#![doc(html_root_url = "https://docs.rs/daedalus-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{DaedalusConfig, DaedalusConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{LimitsConfig, LogFormat, LoggingConfig, MetricsSection};
