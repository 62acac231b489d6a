//! The binder front-end.
//!
//! [`DefaultBinder`] looks at the request method, body and content type,
//! picks a data source, and either runs the struct walker over query or
//! form parameters or decodes a JSON/XML document into the target.

use daedalus_core::metric_names::{BIND_FIELD_ERRORS_TOTAL, BIND_TOTAL};
use daedalus_core::{walk, BindError, BindField, BindMode, BindResult};
use http::Method;
use metrics::counter;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::json::decode_json_into;
use crate::xml::decode_xml_into;
use crate::RequestContext;

/// Default maximum body size (1 MB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Default maximum number of multipart parts.
pub const DEFAULT_MAX_MULTIPART_FIELDS: usize = 100;

/// Default maximum size of a single multipart part (10 MB).
pub const DEFAULT_MAX_MULTIPART_FIELD_SIZE: usize = 10 * 1024 * 1024;

const APPLICATION_XML: &str = "application/xml";

/// Size limits applied while binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindLimits {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
    /// Maximum number of multipart parts.
    pub max_multipart_fields: usize,
    /// Maximum size of a single multipart part in bytes.
    pub max_multipart_field_size: usize,
}

impl Default for BindLimits {
    fn default() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            max_multipart_fields: DEFAULT_MAX_MULTIPART_FIELDS,
            max_multipart_field_size: DEFAULT_MAX_MULTIPART_FIELD_SIZE,
        }
    }
}

impl BindLimits {
    /// Create limits with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum body size.
    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// Set the maximum number of multipart parts.
    #[must_use]
    pub fn max_multipart_fields(mut self, count: usize) -> Self {
        self.max_multipart_fields = count;
        self
    }

    /// Set the maximum size of a single multipart part.
    #[must_use]
    pub fn max_multipart_field_size(mut self, size: usize) -> Self {
        self.max_multipart_field_size = size;
        self
    }
}

/// Body formats the binder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MediaKind {
    Json,
    Xml,
    UrlEncoded,
    Multipart,
}

impl MediaKind {
    /// Matches a Content-Type by prefix, ignoring case and surrounding space.
    pub(crate) fn detect(content_type: &str) -> Option<Self> {
        let content_type = content_type.trim().to_ascii_lowercase();
        let is = |essence: &str| content_type.starts_with(essence);

        if is(mime::APPLICATION_JSON.essence_str()) {
            Some(Self::Json)
        } else if is(APPLICATION_XML) || is(mime::TEXT_XML.essence_str()) {
            Some(Self::Xml)
        } else if is(mime::APPLICATION_WWW_FORM_URLENCODED.essence_str()) {
            Some(Self::UrlEncoded)
        } else if is(mime::MULTIPART_FORM_DATA.essence_str()) {
            Some(Self::Multipart)
        } else {
            None
        }
    }
}

/// Where a bind took its data from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindSource {
    /// URL query parameters of a bodiless request.
    Query,
    /// Url-encoded or multipart form body.
    Form,
    /// JSON document.
    Json,
    /// XML document.
    Xml,
}

impl BindSource {
    /// Returns the source as a metric label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Form => "form",
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }
}

impl fmt::Display for BindSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binds request data into a target value.
pub trait Binder {
    /// Populates `target` from the request.
    ///
    /// # Errors
    ///
    /// Returns a [`BindError`] describing the first failure. Fields of a
    /// walked record that were bound before the failure keep their values.
    /// A failed JSON or XML decode leaves `target` unchanged.
    fn bind<T>(&self, target: &mut T, ctx: &RequestContext) -> BindResult<()>
    where
        T: BindField + Serialize + DeserializeOwned;
}

/// The standard binder.
///
/// - Bodiless `GET` and `DELETE` requests bind from the query string.
/// - Other bodiless requests fail with [`BindError::EmptyBody`].
/// - JSON and XML bodies are decoded onto the current value of `target`;
///   members absent from the document keep their values.
/// - Url-encoded and multipart bodies bind from the form parameters, with
///   the query string's values appended after the body's.
/// - Any other content type fails with [`BindError::UnsupportedMediaType`].
///
/// # Example
///
/// ```rust
/// use daedalus_core::{record_field, BindField, FieldDescriptor, Record, RecordDescriptor};
/// use daedalus_extract::{Binder, DefaultBinder, RequestContextBuilder};
/// use http::{Method, Uri};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Default, Deserialize, Serialize)]
/// struct Page {
///     number: u32,
/// }
///
/// impl Record for Page {
///     fn descriptor(&self) -> &'static RecordDescriptor {
///         static FIELDS: [FieldDescriptor; 1] = [FieldDescriptor::new("number").query("page")];
///         static DESCRIPTOR: RecordDescriptor = RecordDescriptor::new("Page", &FIELDS);
///         &DESCRIPTOR
///     }
///
///     fn field_mut(&mut self, index: usize) -> Option<&mut dyn BindField> {
///         (index == 0).then_some(&mut self.number as &mut dyn BindField)
///     }
/// }
///
/// record_field!(Page);
///
/// let ctx = RequestContextBuilder::new()
///     .method(Method::GET)
///     .uri(Uri::from_static("/items?page=4"))
///     .build();
///
/// let mut page = Page::default();
/// DefaultBinder::default().bind(&mut page, &ctx).unwrap();
/// assert_eq!(page.number, 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DefaultBinder {
    limits: BindLimits,
}

impl DefaultBinder {
    /// Creates a binder with the given limits.
    #[must_use]
    pub fn new(limits: BindLimits) -> Self {
        Self { limits }
    }

    /// Returns the configured limits.
    #[must_use]
    pub fn limits(&self) -> &BindLimits {
        &self.limits
    }

    /// Picks the data source for a request without reading it.
    pub fn select_source(&self, ctx: &RequestContext) -> BindResult<BindSource> {
        if ctx.is_body_empty() {
            let method = ctx.method();
            if *method == Method::GET || *method == Method::DELETE {
                return Ok(BindSource::Query);
            }
            return Err(BindError::EmptyBody);
        }

        let actual = ctx.content_length();
        if actual > self.limits.max_body_size {
            return Err(BindError::PayloadTooLarge {
                limit: self.limits.max_body_size,
                actual,
            });
        }

        let content_type = ctx.content_type().unwrap_or_default();
        match MediaKind::detect(content_type) {
            Some(MediaKind::Json) => Ok(BindSource::Json),
            Some(MediaKind::Xml) => Ok(BindSource::Xml),
            Some(MediaKind::UrlEncoded | MediaKind::Multipart) => Ok(BindSource::Form),
            None => Err(BindError::unsupported_media_type(content_type)),
        }
    }

    fn bind_from<T>(&self, source: BindSource, target: &mut T, ctx: &RequestContext) -> BindResult<()>
    where
        T: BindField + Serialize + DeserializeOwned,
    {
        match source {
            BindSource::Query => {
                let params = ctx.query_params()?;
                walk(target, &params, BindMode::Query)
            }
            BindSource::Form => {
                let params = ctx.form_params(&self.limits)?;
                walk(target, &params, BindMode::Form)
            }
            BindSource::Json => decode_json_into(ctx.body(), target).map_err(BindError::from),
            BindSource::Xml => decode_xml_into(ctx.body(), target).map_err(BindError::from),
        }
    }
}

impl Binder for DefaultBinder {
    fn bind<T>(&self, target: &mut T, ctx: &RequestContext) -> BindResult<()>
    where
        T: BindField + Serialize + DeserializeOwned,
    {
        let selected = self.select_source(ctx);
        let source = selected.as_ref().ok().copied();
        debug!(
            method = %ctx.method(),
            content_type = ctx.content_type().unwrap_or_default(),
            source = source.map_or("none", BindSource::as_str),
            "binding request"
        );

        let result = selected.and_then(|source| self.bind_from(source, target, ctx));
        record_outcome(source, &result);
        if let Err(err) = &result {
            debug!(error = %err, code = err.error_code(), "bind failed");
        }
        result
    }
}

fn record_outcome(source: Option<BindSource>, result: &BindResult<()>) {
    let source = source.map_or("none", BindSource::as_str);
    let outcome = if result.is_ok() { "ok" } else { "error" };
    counter!(BIND_TOTAL, "source" => source, "outcome" => outcome).increment(1);

    if let Some(err) = result.as_ref().err().and_then(BindError::convert_error) {
        counter!(BIND_FIELD_ERRORS_TOTAL, "kind" => err.kind_name()).increment(1);
    }
}
