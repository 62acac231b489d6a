//! The struct walker.
//!
//! [`walk`] populates a record from a [`ParamMap`] by visiting the fields of
//! its descriptor in declaration order. Absent keys are skipped, untagged
//! nested records are populated from the same flat map, and the first
//! conversion failure aborts the walk.

use crate::field::{BindField, Record};
use crate::resolve::resolve;
use crate::{BindError, BindMode, FieldKind, ParamMap, TokenError};
use tracing::{debug, trace};

/// Binds `data` into `target` using the tags for `mode`.
///
/// # Errors
///
/// Returns [`BindError::NotARecord`] if `target` is not a record, or
/// [`BindError::Field`] for the first field whose value fails to convert.
/// Fields visited before the failure keep their new values.
pub fn walk(target: &mut dyn BindField, data: &ParamMap, mode: BindMode) -> Result<(), BindError> {
    let kind = target.kind();
    let record = target
        .as_record()
        .ok_or(BindError::NotARecord { kind })?;
    walk_record(record, data, mode)
}

/// Binds `data` into a record directly.
///
/// Unlike [`walk`] this also accepts records that parse themselves from a
/// single token when nested, since their [`BindField`] impl does not expose
/// them as records.
pub fn walk_record(
    record: &mut dyn Record,
    data: &ParamMap,
    mode: BindMode,
) -> Result<(), BindError> {
    let descriptor = record.descriptor();

    for (index, field) in descriptor.fields().iter().enumerate() {
        let Some(slot) = record.field_mut(index) else {
            continue;
        };

        if field.tag(mode).is_none() && slot.kind() == FieldKind::Record {
            if let Some(nested) = slot.as_record() {
                trace!(
                    record = descriptor.name(),
                    field = field.name(),
                    "descending into untagged record"
                );
                walk_record(nested, data, mode)?;
                continue;
            }
        }

        let Some(resolved) = resolve(data, field, mode) else {
            trace!(
                record = descriptor.name(),
                field = field.name(),
                key = field.key(mode),
                "no source value, skipping"
            );
            continue;
        };

        trace!(
            record = descriptor.name(),
            field = field.name(),
            key = resolved.key,
            folded = resolved.folded,
            values = resolved.values.len(),
            "binding field"
        );

        if let Err(TokenError { token, source }) = slot.bind_values(resolved.values, field) {
            debug!(
                record = descriptor.name(),
                field = field.name(),
                value = %token,
                error = %source,
                "field conversion failed"
            );
            return Err(BindError::field(
                descriptor.name(),
                field.name(),
                token,
                source,
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Timestamp;
    use crate::{record_field, ConvertError, FieldDescriptor, RecordDescriptor, ScalarKind};

    #[derive(Debug, Default, PartialEq)]
    struct Address {
        city: String,
        zip: u32,
    }

    impl Record for Address {
        fn descriptor(&self) -> &'static RecordDescriptor {
            static FIELDS: [FieldDescriptor; 2] = [
                FieldDescriptor::new("city"),
                FieldDescriptor::new("zip").query("postcode"),
            ];
            static DESCRIPTOR: RecordDescriptor = RecordDescriptor::new("Address", &FIELDS);
            &DESCRIPTOR
        }

        fn field_mut(&mut self, index: usize) -> Option<&mut dyn BindField> {
            match index {
                0 => Some(&mut self.city),
                1 => Some(&mut self.zip),
                _ => None,
            }
        }
    }

    record_field!(Address);

    #[derive(Debug, Default)]
    struct User {
        name: String,
        age: u8,
        admin: bool,
        ids: Vec<i64>,
        nickname: Option<String>,
        address: Address,
        billing: Address,
        joined: Timestamp,
    }

    impl Record for User {
        fn descriptor(&self) -> &'static RecordDescriptor {
            static FIELDS: [FieldDescriptor; 8] = [
                FieldDescriptor::new("name"),
                FieldDescriptor::new("age").form("user_age"),
                FieldDescriptor::new("admin"),
                FieldDescriptor::new("ids").query("id").form("id"),
                FieldDescriptor::new("nickname"),
                FieldDescriptor::new("address"),
                FieldDescriptor::new("billing").query("billing"),
                FieldDescriptor::new("joined")
                    .query("since")
                    .time_format("%Y-%m-%d")
                    .time_utc(),
            ];
            static DESCRIPTOR: RecordDescriptor = RecordDescriptor::new("User", &FIELDS);
            &DESCRIPTOR
        }

        fn field_mut(&mut self, index: usize) -> Option<&mut dyn BindField> {
            match index {
                0 => Some(&mut self.name),
                1 => Some(&mut self.age),
                2 => Some(&mut self.admin),
                3 => Some(&mut self.ids),
                4 => Some(&mut self.nickname),
                5 => Some(&mut self.address),
                6 => Some(&mut self.billing),
                7 => Some(&mut self.joined),
                _ => None,
            }
        }
    }

    record_field!(User);

    fn params(pairs: &[(&str, &str)]) -> ParamMap {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_binds_scalars_sequences_and_options() {
        let data = params(&[
            ("name", "alice"),
            ("age", "30"),
            ("admin", "true"),
            ("id", "1"),
            ("id", "2"),
            ("id", "3"),
            ("nickname", "al"),
        ]);
        let mut user = User::default();

        walk(&mut user, &data, BindMode::Query).unwrap();

        assert_eq!(user.name, "alice");
        assert_eq!(user.age, 30);
        assert!(user.admin);
        assert_eq!(user.ids, vec![1, 2, 3]);
        assert_eq!(user.nickname.as_deref(), Some("al"));
    }

    #[test]
    fn test_mode_selects_tag_family() {
        let data = params(&[("age", "10"), ("user_age", "20")]);

        let mut by_query = User::default();
        walk(&mut by_query, &data, BindMode::Query).unwrap();
        assert_eq!(by_query.age, 10);

        let mut by_form = User::default();
        walk(&mut by_form, &data, BindMode::Form).unwrap();
        assert_eq!(by_form.age, 20);
    }

    #[test]
    fn test_case_insensitive_field_name() {
        let data = params(&[("Name", "bob")]);
        let mut user = User::default();

        walk(&mut user, &data, BindMode::Query).unwrap();

        assert_eq!(user.name, "bob");
    }

    #[test]
    fn test_partial_binding_keeps_prior_values() {
        let data = params(&[("name", "carol")]);
        let mut user = User {
            age: 41,
            ids: vec![7],
            ..User::default()
        };

        walk(&mut user, &data, BindMode::Query).unwrap();

        assert_eq!(user.name, "carol");
        assert_eq!(user.age, 41);
        assert_eq!(user.ids, vec![7]);
        assert!(user.nickname.is_none());
    }

    #[test]
    fn test_untagged_nested_record_reads_flat_map() {
        let data = params(&[("city", "Lisbon"), ("postcode", "1100")]);
        let mut user = User::default();

        walk(&mut user, &data, BindMode::Query).unwrap();

        assert_eq!(
            user.address,
            Address {
                city: "Lisbon".to_string(),
                zip: 1100,
            }
        );
    }

    #[test]
    fn test_tagged_nested_record_is_unsupported() {
        let data = params(&[("billing", "anything")]);
        let mut user = User::default();

        let err = walk(&mut user, &data, BindMode::Query).unwrap_err();

        match err {
            BindError::Field {
                record,
                field,
                value,
                source: ConvertError::UnsupportedKind { kind },
            } => {
                assert_eq!(record, "User");
                assert_eq!(field, "billing");
                assert_eq!(value, "anything");
                assert_eq!(kind, FieldKind::Record);
            }
            other => panic!("expected unsupported kind, got {other:?}"),
        }
    }

    #[test]
    fn test_tagged_nested_record_without_value_is_skipped() {
        let data = params(&[("city", "Oslo")]);
        let mut user = User::default();

        walk(&mut user, &data, BindMode::Query).unwrap();

        assert_eq!(user.address.city, "Oslo");
        assert_eq!(user.billing, Address::default());
    }

    #[test]
    fn test_timestamp_field() {
        let data = params(&[("since", "2024-03-15")]);
        let mut user = User::default();

        walk(&mut user, &data, BindMode::Query).unwrap();

        assert_eq!(user.joined.to_rfc3339(), "2024-03-15T00:00:00+00:00");
    }

    #[test]
    fn test_first_error_wins_and_earlier_fields_stay_bound() {
        let data = params(&[("name", "dave"), ("age", "300"), ("admin", "nope")]);
        let mut user = User::default();

        let err = walk(&mut user, &data, BindMode::Query).unwrap_err();

        assert!(matches!(
            err.convert_error(),
            Some(ConvertError::IntegerOverflow(_))
        ));
        assert_eq!(user.name, "dave");
        assert!(!user.admin);
    }

    #[test]
    fn test_sequence_failure_is_all_or_nothing() {
        let data = params(&[("id", "1"), ("id", "two")]);
        let mut user = User::default();

        let err = walk(&mut user, &data, BindMode::Query).unwrap_err();

        match err {
            BindError::Field {
                field,
                value,
                source,
                ..
            } => {
                assert_eq!(field, "ids");
                assert_eq!(value, "two");
                assert!(matches!(source, ConvertError::IntegerSyntax(_)));
            }
            other => panic!("expected field error, got {other:?}"),
        }
        assert!(user.ids.is_empty());
    }

    #[test]
    fn test_scalar_target_is_not_a_record() {
        let data = params(&[("value", "1")]);
        let mut target = 0_u16;

        let err = walk(&mut target, &data, BindMode::Query).unwrap_err();

        match err {
            BindError::NotARecord { kind } => {
                assert_eq!(kind, FieldKind::Scalar(ScalarKind::U16));
            }
            other => panic!("expected not a record, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_map_leaves_target_untouched() {
        let mut user = User {
            name: "erin".to_string(),
            ..User::default()
        };

        walk(&mut user, &ParamMap::new(), BindMode::Form).unwrap();

        assert_eq!(user.name, "erin");
    }
}
