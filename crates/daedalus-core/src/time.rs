//! Timestamp conversion.
//!
//! Timestamp fields bind to [`Timestamp`] using the field's annotations:
//! a mandatory `strftime` format, and optionally `time_utc` or a
//! `time_location` naming an IANA zone. Without either annotation the
//! token is read in the process's local zone.

use crate::{ConvertError, FieldDescriptor};
use chrono::format::{parse, ParseResult, Parsed, StrftimeItems};
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// The value type of timestamp fields.
pub type Timestamp = DateTime<FixedOffset>;

/// The zone a timestamp without an explicit offset is read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeZoneSpec {
    /// The process's local zone.
    Local,
    /// Coordinated Universal Time.
    Utc,
    /// A named IANA zone.
    Named(Tz),
}

impl TimeZoneSpec {
    /// Resolves the zone from a field's annotations.
    ///
    /// A location annotation wins over `time_utc`.
    pub fn for_field(field: &FieldDescriptor) -> Result<Self, ConvertError> {
        if let Some(name) = field.time_location_str() {
            return Self::named(name);
        }
        if field.is_time_utc() {
            return Ok(Self::Utc);
        }
        Ok(Self::Local)
    }

    /// Resolves a zone by name. `"UTC"` and `"Local"` are accepted as well.
    pub fn named(name: &str) -> Result<Self, ConvertError> {
        match name {
            "UTC" => Ok(Self::Utc),
            "Local" => Ok(Self::Local),
            _ => name
                .parse::<Tz>()
                .map(Self::Named)
                .map_err(|_| ConvertError::UnknownTimeZone {
                    name: name.to_string(),
                }),
        }
    }

    fn localize(self, naive: &NaiveDateTime) -> Result<Timestamp, ConvertError> {
        let resolved = match self {
            Self::Utc => Some(Utc.from_utc_datetime(naive).fixed_offset()),
            Self::Local => Local
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.fixed_offset()),
            Self::Named(tz) => tz
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.fixed_offset()),
        };
        resolved.ok_or_else(|| {
            ConvertError::time_syntax(format!("local time {naive} does not exist in {self:?}"))
        })
    }
}

/// Converts a token into a timestamp using the field's annotations.
///
/// An empty token yields the zero timestamp. A missing format is an error
/// even when the token is empty.
pub fn parse_timestamp(token: &str, field: &FieldDescriptor) -> Result<Timestamp, ConvertError> {
    let format = field
        .time_format_str()
        .ok_or(ConvertError::MissingTimeFormat)?;

    if token.is_empty() {
        return Ok(Timestamp::default());
    }

    let zone = TimeZoneSpec::for_field(field)?;
    parse_in_zone(token, format, zone)
}

/// Parses `token` with `format`, reading it in `zone` unless the format
/// carries its own offset.
///
/// Components the format leaves out take their zero value: a missing date
/// is January 1 of year 0 and missing time fields are 0, so date-only
/// formats yield midnight and `%H` alone keeps the hour.
pub fn parse_in_zone(token: &str, format: &str, zone: TimeZoneSpec) -> Result<Timestamp, ConvertError> {
    let mut parsed = Parsed::new();
    parse(&mut parsed, token, StrftimeItems::new(format)).map_err(ConvertError::time_syntax)?;
    fill_missing(&mut parsed).map_err(ConvertError::time_syntax)?;

    let date = parsed.to_naive_date().map_err(ConvertError::time_syntax)?;
    let time = parsed.to_naive_time().map_err(ConvertError::time_syntax)?;
    let naive = date.and_time(time);

    match parsed.to_fixed_offset() {
        Ok(offset) => offset
            .from_local_datetime(&naive)
            .single()
            .ok_or_else(|| ConvertError::time_syntax("offset out of range")),
        Err(_) => zone.localize(&naive),
    }
}

fn fill_missing(parsed: &mut Parsed) -> ParseResult<()> {
    if parsed.timestamp().is_some() {
        return Ok(());
    }

    let has_year = parsed.year().is_some()
        || parsed.year_div_100().is_some()
        || parsed.year_mod_100().is_some()
        || parsed.isoyear().is_some()
        || parsed.isoyear_div_100().is_some()
        || parsed.isoyear_mod_100().is_some();
    if !has_year {
        parsed.set_year(0)?;
    }

    let has_week = parsed.week_from_sun().is_some()
        || parsed.week_from_mon().is_some()
        || parsed.isoweek().is_some();
    if parsed.ordinal().is_none() && !has_week {
        if parsed.month().is_none() {
            parsed.set_month(1)?;
        }
        if parsed.day().is_none() {
            parsed.set_day(1)?;
        }
    }

    // `%I` without `%p` reads as a morning hour.
    if parsed.hour_mod_12().is_none() {
        parsed.set_hour12(12)?;
    }
    if parsed.hour_div_12().is_none() {
        parsed.set_ampm(false)?;
    }
    if parsed.minute().is_none() {
        parsed.set_minute(0)?;
    }
    if parsed.second().is_none() {
        parsed.set_second(0)?;
    }
    Ok(())
}
