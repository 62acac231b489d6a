//! # Daedalus Extract
//!
//! The request-facing half of Daedalus binding.
//!
//! This crate reads a buffered HTTP request, decides where the data for a
//! bind comes from, and hands it to the struct walker in `daedalus-core`
//! or to a structured decoder.
//!
//! | Content type | Source | Path |
//! |--------------|--------|------|
//! | none (`GET`/`DELETE`) | Query string | struct walker, `query` tags |
//! | `application/json` | Body | `serde_json`, merged onto the target |
//! | `application/xml`, `text/xml` | Body | `quick-xml`, merged onto the target |
//! | `application/x-www-form-urlencoded` | Body + query string | struct walker, `form` tags |
//! | `multipart/form-data` | Body + query string | struct walker, `form` tags |
//!
//! ## Example
//!
//! ```rust,ignore
//! use daedalus_extract::{Bound, FromRequest, RequestContext};
//!
//! let ctx = RequestContext::from_request(request);
//! let Bound(search) = Bound::<SearchParams>::from_request(&ctx)?;
//! ```
//!
//! ## Error Handling
//!
//! Every failure is a [`BindError`](daedalus_core::BindError), which maps to
//! an HTTP status:
//!
//! ```rust
//! use daedalus_core::BindError;
//!
//! let err = BindError::unsupported_media_type("application/octet-stream");
//! assert_eq!(err.status_code(), http::StatusCode::UNSUPPORTED_MEDIA_TYPE);
//! ```

#![doc(html_root_url = "https://docs.rs/daedalus-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod binder;
mod context;
mod extractor;
pub mod form;
pub mod json;
pub mod multipart;
pub mod xml;

pub use binder::{
    BindLimits, BindSource, Binder, DefaultBinder, DEFAULT_MAX_BODY_SIZE,
    DEFAULT_MAX_MULTIPART_FIELDS, DEFAULT_MAX_MULTIPART_FIELD_SIZE,
};
pub use context::{RequestContext, RequestContextBuilder};
pub use extractor::{Bound, FromRequest};
