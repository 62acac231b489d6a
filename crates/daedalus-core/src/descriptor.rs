//! Record and field metadata.
//!
//! A [`RecordDescriptor`] is the static table describing a bindable record:
//! its name and, in declaration order, one [`FieldDescriptor`] per bindable
//! field. Descriptors are immutable and usually live in a `static`, which is
//! what `#[derive(Record)]` emits.

use crate::BindMode;
use std::fmt;

/// Primitive kinds the scalar converter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `isize`
    Isize,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `usize`
    Usize,
    /// `bool`
    Bool,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// `String`
    String,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::Usize => "usize",
            Self::Bool => "bool",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::String => "string",
        };
        f.write_str(name)
    }
}

/// The declared kind of a field's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A primitive handled by the scalar converter.
    Scalar(ScalarKind),
    /// A type that parses itself through [`UnmarshalParam`](crate::UnmarshalParam).
    Custom,
    /// An optional slot (`Option<T>`) allocated on first assignment.
    Indirect,
    /// A list bound from every value of its key.
    Sequence,
    /// A timestamp bound through the field's time annotations.
    Timestamp,
    /// A nested record.
    Record,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => kind.fmt(f),
            Self::Custom => f.write_str("custom"),
            Self::Indirect => f.write_str("optional"),
            Self::Sequence => f.write_str("sequence"),
            Self::Timestamp => f.write_str("timestamp"),
            Self::Record => f.write_str("record"),
        }
    }
}

/// Metadata for one bindable field.
///
/// Built with `const` builder methods so tables can be `static`:
///
/// ```
/// use daedalus_core::FieldDescriptor;
///
/// static CREATED: FieldDescriptor = FieldDescriptor::new("created")
///     .query("since")
///     .time_format("%Y-%m-%d")
///     .time_utc();
///
/// assert_eq!(CREATED.name(), "created");
/// assert_eq!(CREATED.time_format_str(), Some("%Y-%m-%d"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: &'static str,
    query: Option<&'static str>,
    form: Option<&'static str>,
    time_format: Option<&'static str>,
    time_utc: bool,
    time_location: Option<&'static str>,
}

impl FieldDescriptor {
    /// Creates a descriptor for the field with the given declared name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            query: None,
            form: None,
            time_format: None,
            time_utc: false,
            time_location: None,
        }
    }

    /// Sets the source key used in query mode.
    #[must_use]
    pub const fn query(mut self, key: &'static str) -> Self {
        self.query = Some(key);
        self
    }

    /// Sets the source key used in form mode.
    #[must_use]
    pub const fn form(mut self, key: &'static str) -> Self {
        self.form = Some(key);
        self
    }

    /// Sets the `strftime` format for timestamp fields.
    #[must_use]
    pub const fn time_format(mut self, format: &'static str) -> Self {
        self.time_format = Some(format);
        self
    }

    /// Interprets timestamps without an offset as UTC.
    #[must_use]
    pub const fn time_utc(mut self) -> Self {
        self.time_utc = true;
        self
    }

    /// Interprets timestamps without an offset in the named location.
    #[must_use]
    pub const fn time_location(mut self, location: &'static str) -> Self {
        self.time_location = Some(location);
        self
    }

    /// Returns the declared field name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the source tag for `mode`. Empty tags count as absent.
    #[must_use]
    pub fn tag(&self, mode: BindMode) -> Option<&'static str> {
        let tag = match mode {
            BindMode::Query => self.query,
            BindMode::Form => self.form,
        };
        tag.filter(|t| !t.is_empty())
    }

    /// Returns the primary lookup key for `mode`: the tag if present, else the name.
    #[must_use]
    pub fn key(&self, mode: BindMode) -> &'static str {
        self.tag(mode).unwrap_or(self.name)
    }

    /// Returns the timestamp format annotation. Empty formats count as absent.
    #[must_use]
    pub fn time_format_str(&self) -> Option<&'static str> {
        self.time_format.filter(|f| !f.is_empty())
    }

    /// Returns `true` if timestamps are read as UTC.
    #[must_use]
    pub const fn is_time_utc(&self) -> bool {
        self.time_utc
    }

    /// Returns the named time location annotation.
    #[must_use]
    pub fn time_location_str(&self) -> Option<&'static str> {
        self.time_location.filter(|l| !l.is_empty())
    }
}

/// Metadata for a bindable record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordDescriptor {
    name: &'static str,
    fields: &'static [FieldDescriptor],
}

impl RecordDescriptor {
    /// Creates a descriptor from a type name and its field table.
    #[must_use]
    pub const fn new(name: &'static str, fields: &'static [FieldDescriptor]) -> Self {
        Self { name, fields }
    }

    /// Returns the record type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the bindable fields in declaration order.
    #[must_use]
    pub const fn fields(&self) -> &'static [FieldDescriptor] {
        self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_prefers_tag_for_mode() {
        let field = FieldDescriptor::new("user_name").query("user").form("username");

        assert_eq!(field.key(BindMode::Query), "user");
        assert_eq!(field.key(BindMode::Form), "username");
    }

    #[test]
    fn test_key_falls_back_to_name() {
        let field = FieldDescriptor::new("page").query("p");

        assert_eq!(field.tag(BindMode::Form), None);
        assert_eq!(field.key(BindMode::Form), "page");
    }

    #[test]
    fn test_empty_annotations_are_absent() {
        let field = FieldDescriptor::new("at").query("").time_format("").time_location("");

        assert_eq!(field.tag(BindMode::Query), None);
        assert_eq!(field.time_format_str(), None);
        assert_eq!(field.time_location_str(), None);
    }

    #[test]
    fn test_static_record_descriptor() {
        static FIELDS: [FieldDescriptor; 2] =
            [FieldDescriptor::new("a"), FieldDescriptor::new("b").time_utc()];
        static RECORD: RecordDescriptor = RecordDescriptor::new("Pair", &FIELDS);

        assert_eq!(RECORD.name(), "Pair");
        assert_eq!(RECORD.fields().len(), 2);
        assert!(RECORD.fields()[1].is_time_utc());
    }

    #[test]
    fn test_field_kind_display() {
        assert_eq!(FieldKind::Scalar(ScalarKind::U16).to_string(), "u16");
        assert_eq!(FieldKind::Indirect.to_string(), "optional");
        assert_eq!(FieldKind::Record.to_string(), "record");
    }
}
