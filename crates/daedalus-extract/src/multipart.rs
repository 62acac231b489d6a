//! Multipart form decoding.
//!
//! The body is already buffered, so `multer` is driven over a single-chunk
//! stream that is always ready and the whole parse completes in one poll.
//! Only plain value parts contribute to the result; file parts are skipped.

use bytes::Bytes;
use daedalus_core::{BindError, ParamMap};
use futures_util::FutureExt;
use std::io;
use tracing::trace;

use crate::binder::BindLimits;

/// Decodes a `multipart/form-data` body into a [`ParamMap`].
///
/// # Errors
///
/// Returns [`BindError::FormDecode`] if the boundary is missing, the body
/// is malformed, a part is not UTF-8, or the field count or per-field size
/// limits are exceeded.
pub fn decode_multipart(
    content_type: &str,
    body: Bytes,
    limits: &BindLimits,
) -> Result<ParamMap, BindError> {
    let boundary = multer::parse_boundary(content_type).map_err(|_| {
        BindError::form_decode("missing or invalid boundary in multipart Content-Type")
    })?;

    let per_field = u64::try_from(limits.max_multipart_field_size).unwrap_or(u64::MAX);
    let constraints =
        multer::Constraints::new().size_limit(multer::SizeLimit::new().per_field(per_field));

    let stream = futures_util::stream::once(async move { Ok::<_, io::Error>(body) });
    let mut multipart = multer::Multipart::with_constraints(stream, boundary, constraints);
    let max_fields = limits.max_multipart_fields;

    let collect = async move {
        let mut params = ParamMap::new();
        let mut field_count = 0_usize;

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            field_count += 1;
            if field_count > max_fields {
                return Err(BindError::form_decode(format!(
                    "too many fields (max {max_fields})"
                )));
            }

            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            if field.file_name().is_some() {
                trace!(field = %name, "skipping file part");
                continue;
            }

            let value = field.text().await.map_err(multipart_error)?;
            params.push(name, value);
        }

        Ok::<_, BindError>(params)
    };

    collect
        .now_or_never()
        .unwrap_or_else(|| Err(BindError::form_decode("multipart body is incomplete")))
}

fn multipart_error(err: multer::Error) -> BindError {
    BindError::form_decode(format!("multipart parse error: {err}"))
}
