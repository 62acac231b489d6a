//! Error types for Daedalus binding.
//!
//! [`BindError`] is returned by every binding entry point. Per-field
//! conversion failures carry a [`ConvertError`] together with the record,
//! field and raw token that failed; structured document failures carry a
//! [`DecodeError`].
//!
//! Binding never writes a response itself. [`BindError::status_code`] and
//! [`BindError::error_code`] exist so the HTTP layer can map failures
//! without matching on every variant.

use crate::FieldKind;
use http::StatusCode;
use std::fmt;
use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

/// Boxed error returned by custom parameter parsers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias using [`BindError`].
pub type BindResult<T> = Result<T, BindError>;

/// Failure converting a single token into a field value.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The token is not a base-10 integer.
    #[error("invalid integer syntax: {0}")]
    IntegerSyntax(#[source] ParseIntError),

    /// The token is an integer that does not fit the target width.
    #[error("integer out of range: {0}")]
    IntegerOverflow(#[source] ParseIntError),

    /// The token is not one of the accepted boolean literals.
    #[error("invalid boolean syntax: expected one of 1, t, T, TRUE, true, True, 0, f, F, FALSE, false, False")]
    BooleanSyntax,

    /// The token is not a decimal floating point number.
    #[error("invalid float syntax: {0}")]
    FloatSyntax(#[source] ParseFloatError),

    /// The field's kind cannot be assigned from a token.
    #[error("unsupported field kind: {kind}")]
    UnsupportedKind {
        /// The kind that was reached.
        kind: FieldKind,
    },

    /// A custom [`UnmarshalParam`](crate::UnmarshalParam) implementation failed.
    #[error("custom unmarshal failed: {0}")]
    CustomUnmarshal(#[source] BoxError),

    /// A timestamp field has no format annotation.
    #[error("blank time format")]
    MissingTimeFormat,

    /// The time location annotation names an unknown zone.
    #[error("unknown time zone: {name}")]
    UnknownTimeZone {
        /// The location name from the annotation.
        name: String,
    },

    /// The token does not match the timestamp format.
    #[error("invalid time syntax: {message}")]
    TimeSyntax {
        /// Description of the mismatch.
        message: String,
    },
}

impl ConvertError {
    /// Classifies an integer parse failure as overflow or syntax.
    #[must_use]
    pub fn from_int(err: ParseIntError) -> Self {
        use std::num::IntErrorKind;
        match err.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => Self::IntegerOverflow(err),
            _ => Self::IntegerSyntax(err),
        }
    }

    /// Creates a time syntax error.
    #[must_use]
    pub fn time_syntax(message: impl fmt::Display) -> Self {
        Self::TimeSyntax {
            message: message.to_string(),
        }
    }

    /// Returns a stable identifier for this failure kind.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::IntegerSyntax(_) => "integer_syntax",
            Self::IntegerOverflow(_) => "integer_overflow",
            Self::BooleanSyntax => "boolean_syntax",
            Self::FloatSyntax(_) => "float_syntax",
            Self::UnsupportedKind { .. } => "unsupported_kind",
            Self::CustomUnmarshal(_) => "custom_unmarshal",
            Self::MissingTimeFormat => "missing_time_format",
            Self::UnknownTimeZone { .. } => "unknown_time_zone",
            Self::TimeSyntax { .. } => "time_syntax",
        }
    }
}

/// A [`ConvertError`] together with the raw token that caused it.
#[derive(Error, Debug)]
#[error("cannot convert {token:?}: {source}")]
pub struct TokenError {
    /// The token that failed to convert.
    pub token: String,
    /// The conversion failure.
    #[source]
    pub source: ConvertError,
}

impl TokenError {
    /// Creates a token error.
    #[must_use]
    pub fn new(token: impl Into<String>, source: ConvertError) -> Self {
        Self {
            token: token.into(),
            source,
        }
    }
}

/// Which structured decoder produced a [`DecodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON body.
    Json,
    /// XML body.
    Xml,
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("JSON"),
            Self::Xml => f.write_str("XML"),
        }
    }
}

/// What went wrong inside a structured decoder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// A value had the wrong type for its destination.
    #[error(
        "unmarshal type error: expected={expected}, got={actual}{}{}",
        optional(", field=", .field, ""),
        optional(", offset=", .offset, "")
    )]
    TypeMismatch {
        /// The type the destination expected.
        expected: String,
        /// Description of the value actually found.
        actual: String,
        /// The destination field, when the decoder reports it.
        field: Option<String>,
        /// Byte offset into the document, when known.
        offset: Option<usize>,
    },
    /// The document is not well-formed.
    #[error(
        "syntax error: {}{}error={message}",
        optional("line=", .line, ", "),
        optional("offset=", .offset, ", ")
    )]
    Syntax {
        /// Byte offset into the document, when known.
        offset: Option<usize>,
        /// 1-based line number, when known.
        line: Option<usize>,
        /// Decoder message.
        message: String,
    },
    /// Any other decoder failure.
    #[error("decode error: {message}")]
    Other {
        /// Decoder message.
        message: String,
    },
}

fn optional<T: fmt::Display>(prefix: &str, value: &Option<T>, suffix: &str) -> String {
    value
        .as_ref()
        .map(|value| format!("{prefix}{value}{suffix}"))
        .unwrap_or_default()
}

/// Failure from the JSON or XML decoder, normalised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{format} {kind}")]
pub struct DecodeError {
    format: DocumentFormat,
    kind: DecodeErrorKind,
}

impl DecodeError {
    /// Creates a decode error.
    #[must_use]
    pub fn new(format: DocumentFormat, kind: DecodeErrorKind) -> Self {
        Self { format, kind }
    }

    /// Returns the document format.
    #[must_use]
    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    /// Returns the failure kind.
    #[must_use]
    pub fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }
}

/// Error returned by binding operations.
#[derive(Error, Debug)]
pub enum BindError {
    /// A request that must carry a body arrived without one.
    #[error("request body can't be empty")]
    EmptyBody,

    /// The body's content type has no binding path.
    #[error("unsupported media type: {content_type}")]
    UnsupportedMediaType {
        /// The content type as received (empty if absent).
        content_type: String,
    },

    /// The body exceeds the configured limit.
    #[error("payload too large: max {limit} bytes, got {actual} bytes")]
    PayloadTooLarge {
        /// Configured maximum.
        limit: usize,
        /// Actual body size.
        actual: usize,
    },

    /// The binding target is not a record.
    #[error("binding element must be a record, got {kind}")]
    NotARecord {
        /// The kind of the target that was supplied.
        kind: FieldKind,
    },

    /// A field value could not be converted.
    #[error("failed to bind field '{field}' of {record} from {value:?}: {source}")]
    Field {
        /// Name of the record type that owns the field.
        record: &'static str,
        /// Declared field name.
        field: &'static str,
        /// The raw token that failed to convert.
        value: String,
        /// The conversion failure.
        #[source]
        source: ConvertError,
    },

    /// The JSON or XML decoder rejected the body.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The form body could not be decoded.
    #[error("failed to decode form: {message}")]
    FormDecode {
        /// Description of the failure.
        message: String,
    },
}

impl BindError {
    /// Creates a field conversion error.
    #[must_use]
    pub fn field(
        record: &'static str,
        field: &'static str,
        value: impl Into<String>,
        source: ConvertError,
    ) -> Self {
        Self::Field {
            record,
            field,
            value: value.into(),
            source,
        }
    }

    /// Creates an unsupported media type error.
    #[must_use]
    pub fn unsupported_media_type(content_type: impl Into<String>) -> Self {
        Self::UnsupportedMediaType {
            content_type: content_type.into(),
        }
    }

    /// Creates a form decode error.
    #[must_use]
    pub fn form_decode(message: impl Into<String>) -> Self {
        Self::FormDecode {
            message: message.into(),
        }
    }

    /// Returns the conversion failure, if this is a field error.
    #[must_use]
    pub fn convert_error(&self) -> Option<&ConvertError> {
        match self {
            Self::Field { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Returns the suggested HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotARecord { .. }
            | Self::Field {
                source: ConvertError::UnsupportedKind { .. },
                ..
            } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::EmptyBody | Self::Field { .. } | Self::Decode(_) | Self::FormDecode { .. } => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    /// Returns the error code suitable for error envelopes.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyBody => "EMPTY_BODY",
            Self::UnsupportedMediaType { .. } => "UNSUPPORTED_MEDIA_TYPE",
            Self::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            Self::NotARecord { .. } => "NOT_A_RECORD",
            Self::Field { .. } => "INVALID_PARAMETER",
            Self::Decode(_) => "DESERIALIZATION_FAILED",
            Self::FormDecode { .. } => "FORM_DECODE_FAILED",
        }
    }
}
