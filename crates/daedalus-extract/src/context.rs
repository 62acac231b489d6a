//! Request context providing access to request data.
//!
//! The [`RequestContext`] is what the binder reads from: the method, the
//! URI (for query parameters), the headers (for the content type) and the
//! already-buffered body.

use bytes::Bytes;
use daedalus_core::{BindError, ParamMap};
use http::{header, HeaderMap, HeaderName, HeaderValue, Method, Uri};

use crate::binder::BindLimits;
use crate::form;

/// Context providing access to the parts of an HTTP request binding needs.
///
/// # Example
///
/// ```rust
/// use daedalus_extract::RequestContext;
/// use http::{HeaderMap, Method, Uri};
/// use bytes::Bytes;
///
/// let ctx = RequestContext::new(
///     Method::GET,
///     Uri::from_static("/users?active=true&tag=a&tag=b"),
///     HeaderMap::new(),
///     Bytes::new(),
/// );
///
/// let query = ctx.query_params().unwrap();
/// assert_eq!(ctx.method(), &Method::GET);
/// assert_eq!(query.get("tag").map(|v| v.len()), Some(2));
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
}

impl RequestContext {
    /// Creates a new request context.
    #[must_use]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
        }
    }

    /// Creates a context from an `http::Request` whose body is already buffered.
    #[must_use]
    pub fn from_request(request: http::Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();
        Self::new(parts.method, parts.uri, parts.headers, body)
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the query string if present.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a specific header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the Content-Type header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// Returns the body length.
    ///
    /// The body is already buffered, so its length is authoritative even
    /// when a Content-Length header disagrees.
    #[must_use]
    pub fn content_length(&self) -> usize {
        self.body.len()
    }

    /// Returns the request body as bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Checks if the request body is empty.
    #[must_use]
    pub fn is_body_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Decodes the URL query string.
    ///
    /// Repeated keys keep every value in order. A request without a query
    /// string yields an empty map.
    pub fn query_params(&self) -> Result<ParamMap, BindError> {
        match self.query_string() {
            Some(query) => form::decode_urlencoded(query.as_bytes()),
            None => Ok(ParamMap::new()),
        }
    }

    /// Decodes the form body and appends the query parameters after it.
    ///
    /// Url-encoded and multipart bodies are supported. For every key, the
    /// body's values come first and the query string's values follow.
    pub fn form_params(&self, limits: &BindLimits) -> Result<ParamMap, BindError> {
        let mut params = form::decode_form_body(self, limits)?;
        params.extend_from(&self.query_params()?);
        Ok(params)
    }
}

/// Builder for constructing a `RequestContext`.
///
/// Method and URI default to `GET /`.
#[derive(Debug, Default)]
pub struct RequestContextBuilder {
    method: Option<Method>,
    uri: Option<Uri>,
    headers: HeaderMap,
    body: Bytes,
}

impl RequestContextBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the URI.
    #[must_use]
    pub fn uri(mut self, uri: Uri) -> Self {
        self.uri = Some(uri);
        self
    }

    /// Sets the headers.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Adds a single header. Invalid values are ignored.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Sets the Content-Type header.
    #[must_use]
    pub fn content_type(self, value: &str) -> Self {
        self.header(header::CONTENT_TYPE, value)
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Builds the request context.
    #[must_use]
    pub fn build(self) -> RequestContext {
        RequestContext {
            method: self.method.unwrap_or(Method::GET),
            uri: self.uri.unwrap_or_else(|| Uri::from_static("/")),
            headers: self.headers,
            body: self.body,
        }
    }
}
