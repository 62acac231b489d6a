//! Scalar conversion from a single textual token.
//!
//! [`FromParam`] is implemented for the primitive kinds, for `Option<T>`
//! and, through a blanket impl, for every type that implements
//! [`UnmarshalParam`]. A type with its own textual parser therefore always
//! takes that path instead of the built-in coercion.
//!
//! Numeric and boolean kinds treat an empty token as their zero value so
//! that blank form inputs do not fail.

use crate::{BoxError, ConvertError, FieldKind, ScalarKind};

/// A value that can be converted from a single parameter token.
pub trait FromParam: Sized {
    /// The declared kind of this type.
    const KIND: FieldKind;

    /// Converts a token into a new value.
    fn from_param(token: &str) -> Result<Self, ConvertError>;

    /// Converts a token into `self`, leaving `self` untouched on failure.
    fn assign_param(&mut self, token: &str) -> Result<(), ConvertError> {
        *self = Self::from_param(token)?;
        Ok(())
    }
}

/// A type that knows how to parse itself from a query or form parameter.
///
/// Implementing this trait opts a type into the custom-unmarshal path: it is
/// bound from the raw token even when it is itself a record.
///
/// # Example
///
/// ```
/// use daedalus_core::{BoxError, FromParam, UnmarshalParam};
///
/// #[derive(Debug, PartialEq)]
/// struct Csv(Vec<String>);
///
/// impl UnmarshalParam for Csv {
///     fn unmarshal_param(param: &str) -> Result<Self, BoxError> {
///         Ok(Csv(param.split(',').map(str::to_string).collect()))
///     }
/// }
///
/// let value = Csv::from_param("a,b").unwrap();
/// assert_eq!(value, Csv(vec!["a".into(), "b".into()]));
/// ```
pub trait UnmarshalParam: Sized {
    /// Parses a value from the raw parameter.
    fn unmarshal_param(param: &str) -> Result<Self, BoxError>;
}

impl<T: UnmarshalParam> FromParam for T {
    const KIND: FieldKind = FieldKind::Custom;

    fn from_param(token: &str) -> Result<Self, ConvertError> {
        T::unmarshal_param(token).map_err(ConvertError::CustomUnmarshal)
    }
}

impl<T: FromParam + Default> FromParam for Option<T> {
    const KIND: FieldKind = FieldKind::Indirect;

    fn from_param(token: &str) -> Result<Self, ConvertError> {
        T::from_param(token).map(Some)
    }

    // The slot is allocated before converting, so it stays allocated even
    // when the conversion fails.
    fn assign_param(&mut self, token: &str) -> Result<(), ConvertError> {
        self.get_or_insert_with(T::default).assign_param(token)
    }
}

macro_rules! impl_from_param_int {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl FromParam for $ty {
                const KIND: FieldKind = FieldKind::Scalar(ScalarKind::$kind);

                fn from_param(token: &str) -> Result<Self, ConvertError> {
                    if token.is_empty() {
                        return Ok(0);
                    }
                    token.parse::<$ty>().map_err(ConvertError::from_int)
                }
            }
        )*
    };
}

impl_from_param_int!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
);

macro_rules! impl_from_param_float {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl FromParam for $ty {
                const KIND: FieldKind = FieldKind::Scalar(ScalarKind::$kind);

                fn from_param(token: &str) -> Result<Self, ConvertError> {
                    if token.is_empty() {
                        return Ok(0.0);
                    }
                    token.parse::<$ty>().map_err(ConvertError::FloatSyntax)
                }
            }
        )*
    };
}

impl_from_param_float!(f32 => F32, f64 => F64);

impl FromParam for bool {
    const KIND: FieldKind = FieldKind::Scalar(ScalarKind::Bool);

    fn from_param(token: &str) -> Result<Self, ConvertError> {
        match token {
            "" | "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            _ => Err(ConvertError::BooleanSyntax),
        }
    }
}

impl FromParam for String {
    const KIND: FieldKind = FieldKind::Scalar(ScalarKind::String);

    fn from_param(token: &str) -> Result<Self, ConvertError> {
        Ok(token.to_string())
    }
}
