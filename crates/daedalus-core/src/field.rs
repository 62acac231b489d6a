//! Field slots and records.
//!
//! The walker never sees concrete field types. It reaches every bindable
//! field of a [`Record`] as a `&mut dyn BindField`, asks for its
//! [`FieldKind`], and either recurses (records) or hands it the resolved
//! values.

use crate::time::{parse_timestamp, Timestamp};
use crate::{FieldDescriptor, FieldKind, FromParam, ParamValues, RecordDescriptor, TokenError};

/// A field slot the walker can assign into.
pub trait BindField {
    /// Returns the declared kind of this slot.
    fn kind(&self) -> FieldKind;

    /// Assigns from the values resolved for this field's key.
    ///
    /// On failure the slot keeps its previous value, except that an
    /// `Option` slot stays allocated. The error carries the token that
    /// failed, which for sequences need not be the first value.
    fn bind_values(
        &mut self,
        values: &ParamValues,
        field: &FieldDescriptor,
    ) -> Result<(), TokenError>;

    /// Returns this slot as a record, if it is one.
    fn as_record(&mut self) -> Option<&mut dyn Record> {
        None
    }
}

/// A record whose fields can be bound.
///
/// Usually implemented with `#[derive(Record)]`. A hand-written impl returns
/// a `static` descriptor and maps each descriptor index to its field; pair
/// it with [`record_field!`](crate::record_field) so the record can also be
/// nested in other records.
///
/// # Example
///
/// ```
/// use daedalus_core::{record_field, walk, BindField, BindMode, FieldDescriptor,
///     ParamMap, Record, RecordDescriptor};
///
/// #[derive(Default)]
/// struct Page {
///     number: u32,
///     size: u32,
/// }
///
/// impl Record for Page {
///     fn descriptor(&self) -> &'static RecordDescriptor {
///         static FIELDS: [FieldDescriptor; 2] = [
///             FieldDescriptor::new("number").query("page"),
///             FieldDescriptor::new("size"),
///         ];
///         static DESCRIPTOR: RecordDescriptor = RecordDescriptor::new("Page", &FIELDS);
///         &DESCRIPTOR
///     }
///
///     fn field_mut(&mut self, index: usize) -> Option<&mut dyn BindField> {
///         match index {
///             0 => Some(&mut self.number),
///             1 => Some(&mut self.size),
///             _ => None,
///         }
///     }
/// }
///
/// record_field!(Page);
///
/// let params: ParamMap = [("page", "3"), ("Size", "50")].into_iter().collect();
/// let mut page = Page::default();
/// walk(&mut page, &params, BindMode::Query).unwrap();
///
/// assert_eq!(page.number, 3);
/// assert_eq!(page.size, 50);
/// ```
pub trait Record {
    /// Returns the descriptor table for this record type.
    fn descriptor(&self) -> &'static RecordDescriptor;

    /// Returns the field at `index` in the descriptor table.
    fn field_mut(&mut self, index: usize) -> Option<&mut dyn BindField>;
}

impl<T: FromParam> BindField for T {
    fn kind(&self) -> FieldKind {
        T::KIND
    }

    fn bind_values(
        &mut self,
        values: &ParamValues,
        _field: &FieldDescriptor,
    ) -> Result<(), TokenError> {
        let token = values.first();
        self.assign_param(token)
            .map_err(|source| TokenError::new(token, source))
    }
}

impl<T: FromParam> BindField for Vec<T> {
    fn kind(&self) -> FieldKind {
        FieldKind::Sequence
    }

    fn bind_values(
        &mut self,
        values: &ParamValues,
        _field: &FieldDescriptor,
    ) -> Result<(), TokenError> {
        let items = values
            .iter()
            .map(|token| T::from_param(token).map_err(|source| TokenError::new(token, source)))
            .collect::<Result<Vec<_>, _>>()?;
        *self = items;
        Ok(())
    }
}

impl BindField for Timestamp {
    fn kind(&self) -> FieldKind {
        FieldKind::Timestamp
    }

    fn bind_values(
        &mut self,
        values: &ParamValues,
        field: &FieldDescriptor,
    ) -> Result<(), TokenError> {
        let token = values.first();
        *self = parse_timestamp(token, field).map_err(|source| TokenError::new(token, source))?;
        Ok(())
    }
}

/// Implements [`BindField`] for a type that implements [`Record`].
///
/// The generated impl reports [`FieldKind::Record`], exposes the value
/// through [`BindField::as_record`], and rejects direct assignment from a
/// token with [`ConvertError::UnsupportedKind`](crate::ConvertError::UnsupportedKind).
#[macro_export]
macro_rules! record_field {
    ($ty:ty) => {
        impl $crate::BindField for $ty {
            fn kind(&self) -> $crate::FieldKind {
                $crate::FieldKind::Record
            }

            fn bind_values(
                &mut self,
                values: &$crate::ParamValues,
                _field: &$crate::FieldDescriptor,
            ) -> ::core::result::Result<(), $crate::TokenError> {
                ::core::result::Result::Err($crate::TokenError::new(
                    values.first(),
                    $crate::ConvertError::UnsupportedKind {
                        kind: $crate::FieldKind::Record,
                    },
                ))
            }

            fn as_record(&mut self) -> ::core::option::Option<&mut dyn $crate::Record> {
                ::core::option::Option::Some(self)
            }
        }
    };
}
