//! JSON body decoding.
//!
//! Documents are decoded onto the current value of the target: the target is
//! serialised to a JSON tree, the document is merged over it, and the merged
//! tree is deserialised back. Members absent from the document keep the
//! target's values. Decoder failures are translated into a [`DecodeError`]
//! so callers see the same shape for JSON and XML.

use daedalus_core::{DecodeError, DecodeErrorKind, DocumentFormat};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::error::Category;
use serde_json::Value;

/// Decodes a JSON document into a fresh `T`.
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, DecodeError> {
    let mut de = serde_json::Deserializer::from_slice(body);
    let value = serde_path_to_error::deserialize(&mut de).map_err(|err| {
        let field = field_path(err.path());
        translate(err.inner(), body, field)
    })?;
    de.end().map_err(|err| translate(&err, body, None))?;
    Ok(value)
}

/// Decodes a JSON document onto the current value of `target`.
///
/// Objects are merged member by member; arrays and scalars in the document
/// replace the target's. On failure `target` is left unchanged.
pub fn decode_json_into<T>(body: &[u8], target: &mut T) -> Result<(), DecodeError>
where
    T: Serialize + DeserializeOwned,
{
    let document: Value =
        serde_json::from_slice(body).map_err(|err| translate(&err, body, None))?;
    let mut merged = serde_json::to_value(&*target).map_err(|err| {
        DecodeError::new(
            DocumentFormat::Json,
            DecodeErrorKind::Other {
                message: format!("cannot represent target as JSON: {err}"),
            },
        )
    })?;
    merge(&mut merged, document);

    match serde_path_to_error::deserialize::<_, T>(merged) {
        Ok(value) => {
            *target = value;
            Ok(())
        }
        Err(err) => {
            let field = field_path(err.path());
            let merged_error = translate(err.inner(), body, field);
            Err(locate_in_body::<T>(merged_error, body))
        }
    }
}

/// Merges `upper` over `lower`. Objects merge recursively; anything else in
/// `upper` replaces `lower` entirely.
pub(crate) fn merge(lower: &mut Value, upper: Value) {
    match (lower, upper) {
        (Value::Object(lower), Value::Object(upper)) => {
            for (key, value) in upper {
                match lower.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        lower.insert(key, value);
                    }
                }
            }
        }
        (lower, upper) => *lower = upper,
    }
}

// The merged tree carries no positions. A type mismatch comes from the
// document, so decoding the body alone reports the same member with its
// offset.
fn locate_in_body<T: DeserializeOwned>(merged_error: DecodeError, body: &[u8]) -> DecodeError {
    let DecodeErrorKind::TypeMismatch { field, .. } = merged_error.kind() else {
        return merged_error;
    };
    match decode_json::<T>(body) {
        Err(direct) => match direct.kind() {
            DecodeErrorKind::TypeMismatch {
                field: direct_field,
                ..
            } if direct_field == field => direct,
            _ => merged_error,
        },
        Ok(_) => merged_error,
    }
}

fn field_path(path: &serde_path_to_error::Path) -> Option<String> {
    let path = path.to_string();
    (path != ".").then_some(path)
}

fn translate(err: &serde_json::Error, body: &[u8], field: Option<String>) -> DecodeError {
    let offset = byte_offset(body, err.line(), err.column());
    let message = message_without_position(err);

    let kind = match err.classify() {
        Category::Syntax | Category::Eof => DecodeErrorKind::Syntax {
            offset: Some(offset.unwrap_or(body.len())),
            line: (err.line() > 0).then_some(err.line()),
            message,
        },
        Category::Data => match split_type_mismatch(&message) {
            Some((actual, expected)) => DecodeErrorKind::TypeMismatch {
                expected: expected.to_string(),
                actual: actual.to_string(),
                field,
                offset,
            },
            None => DecodeErrorKind::Other { message },
        },
        Category::Io => DecodeErrorKind::Other { message },
    };

    DecodeError::new(DocumentFormat::Json, kind)
}

/// Converts the decoder's 1-based line and column into the number of bytes
/// consumed when the error was raised.
fn byte_offset(body: &[u8], line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    let line_start = body
        .split_inclusive(|&b| b == b'\n')
        .take(line - 1)
        .map(<[u8]>::len)
        .sum::<usize>();
    Some((line_start + column).min(body.len()))
}

fn message_without_position(err: &serde_json::Error) -> String {
    let full = err.to_string();
    let suffix = format!(" at line {} column {}", err.line(), err.column());
    match full.strip_suffix(&suffix) {
        Some(message) => message.to_string(),
        None => full,
    }
}

// `invalid type: string "x", expected u32`
pub(crate) fn split_type_mismatch(message: &str) -> Option<(&str, &str)> {
    message
        .strip_prefix("invalid type: ")
        .and_then(|rest| rest.rsplit_once(", expected "))
}
