//! # Daedalus Core
//!
//! Record descriptors, scalar conversion and the struct walker for
//! Daedalus request binding.
//!
//! This crate holds everything that does not depend on how a request is
//! read:
//!
//! - [`ParamMap`] - Source key to ordered, non-empty values
//! - [`RecordDescriptor`] / [`FieldDescriptor`] - Static field tables for bindable types
//! - [`FromParam`] / [`UnmarshalParam`] - Scalar conversion and the custom-parse hook
//! - [`BindField`] / [`Record`] - Field slots the walker assigns into
//! - [`walk`] - Populates a record from a [`ParamMap`]
//! - [`BindError`] - The error taxonomy shared by every binding path
//!
//! Records are normally declared with `#[derive(Record)]` from
//! `daedalus-macros`; a manual [`Record`] impl paired with
//! [`record_field!`] is equivalent.

#![doc(html_root_url = "https://docs.rs/daedalus-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod convert;
mod descriptor;
mod error;
mod field;
pub mod metric_names;
mod param;
mod resolve;
pub mod time;
mod walk;

pub use convert::{FromParam, UnmarshalParam};
pub use descriptor::{FieldDescriptor, FieldKind, RecordDescriptor, ScalarKind};
pub use error::{
    BindError, BindResult, BoxError, ConvertError, DecodeError, DecodeErrorKind, DocumentFormat,
    TokenError,
};
pub use field::{BindField, Record};
pub use param::{BindMode, ParamMap, ParamValues};
pub use resolve::{resolve, resolve_key, Resolved};
pub use time::{parse_timestamp, Timestamp, TimeZoneSpec};
pub use walk::{walk, walk_record};
