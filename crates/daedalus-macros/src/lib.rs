//! Procedural macros for Daedalus records.
//!
//! This crate provides `#[derive(Record)]`, which generates the static
//! descriptor table and field accessors the struct walker needs, so that
//! binding never inspects types at runtime.
//!
//! # Example
//!
//! ```rust,ignore
//! use daedalus::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Record, Deserialize, Serialize)]
//! #[bind(crate = "daedalus::core")]
//! struct SearchParams {
//!     #[bind(query = "q", form = "query")]
//!     term: String,
//!     page: Option<u32>,
//!     #[bind(query = "tag")]
//!     tags: Vec<String>,
//!     #[bind(query = "since", time_format = "%Y-%m-%d", time_utc)]
//!     since: Timestamp,
//!     #[bind(skip)]
//!     cached: bool,
//! }
//! ```
//!
//! # Field attributes
//!
//! - `query = "key"` / `form = "key"`: source key for that mode (defaults to the field name)
//! - `time_format = "..."`: `strftime` format, required for timestamp fields
//! - `time_utc`: read timestamps in UTC
//! - `time_location = "Area/City"`: read timestamps in a named zone
//! - `skip`: leave the field out of binding entirely
//!
//! # Container attributes
//!
//! - `crate = "path"`: path to `daedalus_core` when it is re-exported
//!   elsewhere (`"daedalus::core"` through the facade crate)
//! - `unmarshal`: the type implements `UnmarshalParam`; when nested it is
//!   parsed from a single token instead of walked

mod parse;
mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `Record` (and `BindField`) for a struct with named fields.
///
/// See the [crate documentation](crate) for the accepted attributes.
///
/// # Generated Code
///
/// The macro generates approximately:
///
/// ```rust,ignore
/// impl ::daedalus_core::Record for SearchParams {
///     fn descriptor(&self) -> &'static ::daedalus_core::RecordDescriptor {
///         static FIELDS: [::daedalus_core::FieldDescriptor; 2] = [
///             ::daedalus_core::FieldDescriptor::new("term").query("q"),
///             ::daedalus_core::FieldDescriptor::new("page"),
///         ];
///         static DESCRIPTOR: ::daedalus_core::RecordDescriptor =
///             ::daedalus_core::RecordDescriptor::new("SearchParams", &FIELDS);
///         &DESCRIPTOR
///     }
///
///     fn field_mut(&mut self, index: usize) -> Option<&mut dyn ::daedalus_core::BindField> {
///         match index {
///             0 => Some(&mut self.term),
///             1 => Some(&mut self.page),
///             _ => None,
///         }
///     }
/// }
/// ```
#[proc_macro_derive(Record, attributes(bind))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::expand_record(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
