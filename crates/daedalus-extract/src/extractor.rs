//! Request extractors.
//!
//! The [`FromRequest`] trait builds a value from a [`RequestContext`].
//! [`Bound<T>`] is the extractor that runs the [`DefaultBinder`].

use daedalus_core::{BindError, BindField};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::ops::{Deref, DerefMut};

use crate::{Binder, DefaultBinder, RequestContext};

/// Trait for types that can be extracted from an HTTP request.
///
/// # Implementing `FromRequest`
///
/// ```rust
/// use daedalus_core::BindError;
/// use daedalus_extract::{FromRequest, RequestContext};
///
/// // Custom extractor for the raw query string
/// struct RawQuery(Option<String>);
///
/// impl FromRequest for RawQuery {
///     fn from_request(ctx: &RequestContext) -> Result<Self, BindError> {
///         Ok(RawQuery(ctx.query_string().map(str::to_string)))
///     }
/// }
/// ```
pub trait FromRequest: Sized {
    /// Extracts this type from the request context.
    ///
    /// # Errors
    ///
    /// Returns a [`BindError`] if extraction fails.
    fn from_request(ctx: &RequestContext) -> Result<Self, BindError>;
}

// Optional extraction: `None` if it fails
impl<T: FromRequest> FromRequest for Option<T> {
    fn from_request(ctx: &RequestContext) -> Result<Self, BindError> {
        Ok(T::from_request(ctx).ok())
    }
}

// Lets a handler inspect the error itself
impl<T: FromRequest> FromRequest for Result<T, BindError> {
    fn from_request(ctx: &RequestContext) -> Result<Self, BindError> {
        Ok(T::from_request(ctx))
    }
}

macro_rules! impl_from_request_for_tuple {
    ($($T:ident),*) => {
        impl<$($T: FromRequest),*> FromRequest for ($($T,)*) {
            fn from_request(ctx: &RequestContext) -> Result<Self, BindError> {
                Ok(($($T::from_request(ctx)?,)*))
            }
        }
    };
}

impl_from_request_for_tuple!(T1, T2);
impl_from_request_for_tuple!(T1, T2, T3);
impl_from_request_for_tuple!(T1, T2, T3, T4);

/// Extractor that binds the request into `T`.
///
/// The value starts as `T::default()` and is then populated by the
/// [`DefaultBinder`] with default limits. Use [`Bound::with_binder`] to
/// bind with a configured binder.
///
/// ```rust,ignore
/// let Bound(params) = Bound::<SearchParams>::from_request(&ctx)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bound<T>(pub T);

impl<T> Bound<T> {
    /// Consumes the Bound and returns the inner value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Bound<T>
where
    T: BindField + Serialize + DeserializeOwned + Default,
{
    /// Binds the request into a default `T` with the given binder.
    pub fn with_binder<B: Binder>(ctx: &RequestContext, binder: &B) -> Result<Self, BindError> {
        let mut value = T::default();
        binder.bind(&mut value, ctx)?;
        Ok(Self(value))
    }
}

impl<T> Deref for Bound<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for Bound<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> FromRequest for Bound<T>
where
    T: BindField + Serialize + DeserializeOwned + Default,
{
    fn from_request(ctx: &RequestContext) -> Result<Self, BindError> {
        Self::with_binder(ctx, &DefaultBinder::default())
    }
}
