//! Form body decoding.
//!
//! Url-encoded bodies are decoded with `serde_urlencoded`; multipart bodies
//! are handed to [`crate::multipart`]. Both produce a [`ParamMap`] that keeps
//! repeated keys in arrival order.

use daedalus_core::{BindError, ParamMap};

use crate::binder::{BindLimits, MediaKind};
use crate::multipart;
use crate::RequestContext;

/// Decodes an `application/x-www-form-urlencoded` payload.
pub fn decode_urlencoded(bytes: &[u8]) -> Result<ParamMap, BindError> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(bytes)
        .map_err(|e| BindError::form_decode(format!("invalid url-encoded data: {e}")))?;
    Ok(pairs.into_iter().collect())
}

/// Decodes the request body according to its form content type.
///
/// Bodies with any other content type contribute no values.
pub(crate) fn decode_form_body(
    ctx: &RequestContext,
    limits: &BindLimits,
) -> Result<ParamMap, BindError> {
    let content_type = ctx.content_type().unwrap_or_default();
    match MediaKind::detect(content_type) {
        Some(MediaKind::UrlEncoded) => decode_urlencoded(ctx.body()),
        Some(MediaKind::Multipart) => {
            multipart::decode_multipart(content_type, ctx.body().clone(), limits)
        }
        _ => Ok(ParamMap::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RequestContextBuilder;
    use http::Method;

    #[test]
    fn test_decode_urlencoded() {
        let params = decode_urlencoded(b"username=alice&tag=a&tag=b&note=hello+world%21").unwrap();

        assert_eq!(params.get("username").unwrap().first(), "alice");
        assert_eq!(params.get("tag").unwrap().len(), 2);
        assert_eq!(params.get("note").unwrap().first(), "hello world!");
    }

    #[test]
    fn test_decode_empty_urlencoded() {
        assert!(decode_urlencoded(b"").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_percent_escapes_are_lossy() {
        let params = decode_urlencoded(b"name=%ff").unwrap();
        assert_eq!(params.get("name").unwrap().first(), "\u{fffd}");
    }

    #[test]
    fn test_other_content_type_contributes_nothing() {
        let ctx = RequestContextBuilder::new()
            .method(Method::POST)
            .content_type("text/plain")
            .body("name=alice")
            .build();

        assert!(decode_form_body(&ctx, &BindLimits::default())
            .unwrap()
            .is_empty());
    }
}
