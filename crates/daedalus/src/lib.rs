//! # Daedalus
//!
//! **Runtime request data binding for Rust services**
//!
//! Daedalus fills a caller-supplied struct from an HTTP request:
//!
//! - **Query and form binding**: key-to-field matching with per-mode
//!   renames, case-insensitive fallback, nested records, sequences,
//!   optional fields and timestamps
//! - **Custom parsing**: types implementing `UnmarshalParam` parse
//!   themselves from the raw token
//! - **Structured bodies**: JSON and XML bodies are decoded with serde onto
//!   the target's current value, with decoder errors normalised into one
//!   error type
//! - **Static descriptors**: `#[derive(Record)]` generates field tables at
//!   compile time, so nothing is inspected at runtime
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use daedalus::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Deserialize, Serialize, Record)]
//! #[bind(crate = "daedalus::core")]
//! struct ListUsers {
//!     #[bind(query = "q")]
//!     search: String,
//!     page: Option<u32>,
//!     #[bind(query = "role", form = "role")]
//!     roles: Vec<String>,
//! }
//!
//! fn list_users(request: http::Request<bytes::Bytes>) -> Result<(), BindError> {
//!     let ctx = RequestContext::from_request(request);
//!     let Bound(params) = Bound::<ListUsers>::from_request(&ctx)?;
//!     // ...
//!     Ok(())
//! }
//! ```
//!
//! ## Data Source Selection
//!
//! ```text
//! body empty ─┬─ GET / DELETE ──► query string ──► struct walker (query tags)
//!             └─ otherwise ─────► EmptyBody
//! body set ───┬─ application/json ─────────────► serde_json (merged onto target)
//!             ├─ application/xml, text/xml ────► quick-xml (merged onto target)
//!             ├─ x-www-form-urlencoded ─┐
//!             ├─ multipart/form-data ───┴──────► struct walker (form tags)
//!             └─ anything else ────────────────► UnsupportedMediaType
//! ```

#![doc(html_root_url = "https://docs.rs/daedalus/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use daedalus_core as core;

// Re-export request binding types
pub use daedalus_extract as extract;

// Re-export configuration types
pub use daedalus_config as config;

// Re-export telemetry types
pub use daedalus_telemetry as telemetry;

// Re-export macros - the Record derive
pub use daedalus_macros::Record;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use daedalus::prelude::*;
/// ```
pub mod prelude {
    pub use daedalus_core::{
        record_field, walk, walk_record, BindError, BindField, BindMode, BindResult, BoxError,
        ConvertError, FromParam, ParamMap, Record, Timestamp, TokenError, UnmarshalParam,
    };

    // Re-export the binder and extractors
    pub use daedalus_extract::{
        BindLimits, BindSource, Binder, Bound, DefaultBinder, FromRequest, RequestContext,
        RequestContextBuilder,
    };

    // Derive macro, same name as the trait
    pub use daedalus_macros::Record;

    // Re-export configuration and telemetry entry points
    pub use daedalus_config::{ConfigLoader, DaedalusConfig};
    pub use daedalus_telemetry::{init_telemetry, LogConfig, MetricsConfig};
}
