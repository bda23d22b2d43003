/*
 *
 *  *
 *  *      Copyright (c) 2018-2025, SnackCloud All rights reserved.
 *  *
 *  *   Redistribution and use in source and binary forms, with or without
 *  *   modification, are permitted provided that the following conditions are met:
 *  *
 *  *   Redistributions of source code must retain the above copyright notice,
 *  *   this list of conditions and the following disclaimer.
 *  *   Redistributions in binary form must reproduce the above copyright
 *  *   notice, this list of conditions and the following disclaimer in the
 *  *   documentation and/or other materials provided with the distribution.
 *  *   Neither the name of the www.snackcloud.cn developer nor the names of its
 *  *   contributors may be used to endorse or promote products derived from
 *  *   this software without specific prior written permission.
 *  *   Author: SnackCloud
 *  *
 *
 */

//!
//! PostgreSQL `interval` values.
//!
//! Text in any of the grammars of [`grammar`] is normalised into seven canonical
//! fields and can be rendered back in any [`IntervalStyle`].
//!
//! ```rust
//! use pgtype_core::{Interval, IntervalStyle};
//!
//! let interval = Interval::parse("1 year 2 months 04:05:06").unwrap();
//! assert_eq!(interval.to_string(), "1 year 2 months 4 hours 5 minutes 6 seconds");
//! assert_eq!(interval.to_style(IntervalStyle::Iso8601), "P1Y2M0DT4H5M6S");
//! assert_eq!(interval.to_style(IntervalStyle::SqlStandard), "1-2 0 04:05:06");
//! ```
use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value as JsonValue};

use crate::{PgResult, PgTypeError};

pub mod grammar;
pub mod normalize;
mod format;
mod input;

pub use format::*;
pub use input::*;

use normalize::Fields;

pub const INTERVAL_TYPE: &str = "Interval";

/// Names of the seven canonical fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntervalField {
    Years,
    Months,
    Days,
    Hours,
    Minutes,
    Seconds,
    Milliseconds,
}

impl IntervalField {
    pub const ALL: [IntervalField; 7] = [
        IntervalField::Years,
        IntervalField::Months,
        IntervalField::Days,
        IntervalField::Hours,
        IntervalField::Minutes,
        IntervalField::Seconds,
        IntervalField::Milliseconds,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            IntervalField::Years => "years",
            IntervalField::Months => "months",
            IntervalField::Days => "days",
            IntervalField::Hours => "hours",
            IntervalField::Minutes => "minutes",
            IntervalField::Seconds => "seconds",
            IntervalField::Milliseconds => "milliseconds",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        IntervalField::ALL.iter().copied().find(|field| field.name() == name)
    }
}

impl fmt::Display for IntervalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A PostgreSQL interval held as seven independently signed fields.
///
/// Every field is a whole number, except `milliseconds` which may keep a
/// sub-millisecond remainder produced by normalisation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Interval {
    years: i64,
    months: i64,
    days: i64,
    hours: i64,
    minutes: i64,
    seconds: i64,
    milliseconds: f64,
}

impl Interval {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Parse interval text in any supported grammar.
    pub fn parse(text: &str) -> PgResult<Self> {
        Self::safe_from(text)
    }

    /// Build from normalised fields. `Err` carries the first value that is not
    /// finite or does not fit in an `i64`.
    pub(crate) fn from_fields(fields: Fields) -> Result<Self, f64> {
        let Fields { years, months, days, hours, minutes, seconds, milliseconds } = fields;
        if let Some(bad) = [years, months, days, hours, minutes, seconds, milliseconds]
            .into_iter()
            .find(|value| !fits_i64(*value))
        {
            return Err(bad);
        }
        Ok(Interval {
            years: years as i64,
            months: months as i64,
            days: days as i64,
            hours: hours as i64,
            minutes: minutes as i64,
            seconds: seconds as i64,
            milliseconds: milliseconds + 0.0,
        })
    }

    pub fn years(&self) -> i64 {
        self.years
    }

    pub fn months(&self) -> i64 {
        self.months
    }

    pub fn days(&self) -> i64 {
        self.days
    }

    pub fn hours(&self) -> i64 {
        self.hours
    }

    pub fn minutes(&self) -> i64 {
        self.minutes
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    pub fn milliseconds(&self) -> f64 {
        self.milliseconds
    }

    pub fn get(&self, field: IntervalField) -> f64 {
        match field {
            IntervalField::Years => self.years as f64,
            IntervalField::Months => self.months as f64,
            IntervalField::Days => self.days as f64,
            IntervalField::Hours => self.hours as f64,
            IntervalField::Minutes => self.minutes as f64,
            IntervalField::Seconds => self.seconds as f64,
            IntervalField::Milliseconds => self.milliseconds,
        }
    }

    /// Assign one field. Rejects non-finite values and values with a fraction.
    pub fn set(&mut self, field: IntervalField, value: f64) -> PgResult<()> {
        let value = whole_number(value)?;
        match field {
            IntervalField::Years => self.years = value as i64,
            IntervalField::Months => self.months = value as i64,
            IntervalField::Days => self.days = value as i64,
            IntervalField::Hours => self.hours = value as i64,
            IntervalField::Minutes => self.minutes = value as i64,
            IntervalField::Seconds => self.seconds = value as i64,
            IntervalField::Milliseconds => self.milliseconds = value + 0.0,
        }
        Ok(())
    }

    pub fn set_years(&mut self, value: f64) -> PgResult<()> {
        self.set(IntervalField::Years, value)
    }

    pub fn set_months(&mut self, value: f64) -> PgResult<()> {
        self.set(IntervalField::Months, value)
    }

    pub fn set_days(&mut self, value: f64) -> PgResult<()> {
        self.set(IntervalField::Days, value)
    }

    pub fn set_hours(&mut self, value: f64) -> PgResult<()> {
        self.set(IntervalField::Hours, value)
    }

    pub fn set_minutes(&mut self, value: f64) -> PgResult<()> {
        self.set(IntervalField::Minutes, value)
    }

    pub fn set_seconds(&mut self, value: f64) -> PgResult<()> {
        self.set(IntervalField::Seconds, value)
    }

    pub fn set_milliseconds(&mut self, value: f64) -> PgResult<()> {
        self.set(IntervalField::Milliseconds, value)
    }

    pub fn with_years(mut self, years: i64) -> Self {
        self.years = years;
        self
    }

    pub fn with_months(mut self, months: i64) -> Self {
        self.months = months;
        self
    }

    pub fn with_days(mut self, days: i64) -> Self {
        self.days = days;
        self
    }

    pub fn with_hours(mut self, hours: i64) -> Self {
        self.hours = hours;
        self
    }

    pub fn with_minutes(mut self, minutes: i64) -> Self {
        self.minutes = minutes;
        self
    }

    pub fn with_seconds(mut self, seconds: i64) -> Self {
        self.seconds = seconds;
        self
    }

    pub fn with_milliseconds(mut self, milliseconds: i64) -> Self {
        self.milliseconds = milliseconds as f64;
        self
    }

    /// Fields that are not exactly zero, in canonical order.
    pub fn non_zero_fields(&self) -> Vec<IntervalField> {
        IntervalField::ALL
            .iter()
            .copied()
            .filter(|field| self.get(*field) != 0.0)
            .collect()
    }

    pub fn is_zero(&self) -> bool {
        self.non_zero_fields().is_empty()
    }

    /// Textual value of a field as it appears in rendered output.
    pub(crate) fn field_text(&self, field: IntervalField) -> String {
        match field {
            IntervalField::Milliseconds => number_text(self.milliseconds),
            _ => (self.get(field) as i64).to_string(),
        }
    }

    /// Sparse object view: zero fields are left out, so a zero interval is `{}`.
    pub fn to_json(&self) -> JsonValue {
        let mut map = Map::new();
        for field in self.non_zero_fields() {
            let value = match field {
                IntervalField::Milliseconds => json_number(self.milliseconds),
                _ => JsonValue::from(self.get(field) as i64),
            };
            map.insert(field.name().to_string(), value);
        }
        JsonValue::Object(map)
    }

    pub fn to_style(&self, style: IntervalStyle) -> String {
        format::render(self, style)
    }

    /// Render with a style given by name, see [`IntervalStyle::ALL`].
    pub fn to_style_name(&self, style: &str) -> PgResult<String> {
        let style = IntervalStyle::from_str(style)?;
        Ok(self.to_style(style))
    }

    /// Compare against anything an interval can be built from.
    ///
    /// Both sides are compared through their default rendering.
    pub fn safe_equals<I: Into<IntervalInput>>(&self, other: I) -> PgResult<bool> {
        let other = Interval::safe_from(other)?;
        Ok(*self == other)
    }

    /// Approximate length, counting a year as 365 days and a month as 30 days.
    ///
    /// The conversion is lossy: calendar arithmetic on the result will not land
    /// where PostgreSQL would. `None` when the total does not fit.
    pub fn to_duration(&self) -> Option<Duration> {
        let days = self
            .years
            .checked_mul(365)?
            .checked_add(self.months.checked_mul(30)?)?
            .checked_add(self.days)?;
        Duration::try_days(days)?
            .checked_add(&Duration::try_hours(self.hours)?)?
            .checked_add(&Duration::try_minutes(self.minutes)?)?
            .checked_add(&Duration::try_seconds(self.seconds)?)?
            .checked_add(&Duration::microseconds((self.milliseconds * 1000.0).round() as i64))
    }
}

/// 2^63, the first magnitude an `i64` cannot hold.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

pub(crate) fn fits_i64(value: f64) -> bool {
    value.is_finite() && (-I64_BOUND..I64_BOUND).contains(&value)
}

fn whole_number(value: f64) -> PgResult<f64> {
    if !value.is_finite() {
        return Err(PgTypeError::invalid_type_error(INTERVAL_TYPE, &["number"], number_text(value)));
    }
    if value.fract() != 0.0 {
        return Err(PgTypeError::not_whole_error(INTERVAL_TYPE, value));
    }
    if !fits_i64(value) {
        return Err(PgTypeError::invalid_type_error(INTERVAL_TYPE, &["i64"], number_text(value)));
    }
    Ok(value)
}

/// Shortest decimal rendering, without a trailing `.0` for whole values.
pub(crate) fn number_text(value: f64) -> String {
    (value + 0.0).to_string()
}

fn json_number(value: f64) -> JsonValue {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        JsonValue::from(value as i64)
    } else {
        Number::from_f64(value).map(JsonValue::Number).unwrap_or(JsonValue::Null)
    }
}

impl PartialEq for Interval {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_style(IntervalStyle::default()))
    }
}

impl FromStr for Interval {
    type Err = PgTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interval::safe_from(s)
    }
}

impl Serialize for Interval {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Interval {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = JsonValue::deserialize(deserializer)?;
        Interval::safe_from(value).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IssueCode;
    use serde_json::json;

    #[test]
    fn test_setters_validate_whole_numbers() {
        let mut interval = Interval::zero();
        interval.set_days(3.0).unwrap();
        assert_eq!(interval.days(), 3);

        let err = interval.set_hours(1.5).unwrap_err();
        assert_eq!(err.code(), IssueCode::NotWhole);
        assert_eq!(interval.hours(), 0);

        let err = interval.set_milliseconds(f64::NAN).unwrap_err();
        assert_eq!(err.code(), IssueCode::InvalidType);
    }

    #[test]
    fn test_setters_reject_values_outside_i64() {
        let mut interval = Interval::zero();
        let err = interval.set_years(1e19).unwrap_err();
        assert_eq!(err.code(), IssueCode::InvalidType);
        assert_eq!(interval.years(), 0);

        interval.set_years(i64::MIN as f64).unwrap();
        assert_eq!(interval.years(), i64::MIN);
    }

    #[test]
    fn test_builders() {
        let interval = Interval::zero().with_years(1).with_hours(-2).with_milliseconds(7);
        assert_eq!(interval.years(), 1);
        assert_eq!(interval.hours(), -2);
        assert_eq!(interval.milliseconds(), 7.0);
        assert_eq!(interval.non_zero_fields(), vec![IntervalField::Years, IntervalField::Hours, IntervalField::Milliseconds]);
    }

    #[test]
    fn test_sparse_json() {
        assert_eq!(Interval::zero().to_json(), json!({}));
        let interval = Interval::zero().with_months(2).with_seconds(-6);
        assert_eq!(interval.to_json(), json!({ "months": 2, "seconds": -6 }));
        assert_eq!(serde_json::to_string(&interval).unwrap(), r#"{"months":2,"seconds":-6}"#);
    }

    #[test]
    fn test_fractional_milliseconds_in_json() {
        let interval = Interval::parse("1.2345 seconds").unwrap();
        assert_eq!(interval.to_json(), json!({ "seconds": 1, "milliseconds": 234.5 }));
    }

    #[test]
    fn test_deserialize_goes_through_normalizer() {
        let interval: Interval = serde_json::from_str(r#"{"seconds": 90}"#).unwrap();
        assert_eq!(interval.to_json(), json!({ "minutes": 1, "seconds": 30 }));

        let interval: Interval = serde_json::from_str(r#""1 day""#).unwrap();
        assert_eq!(interval.days(), 1);

        assert!(serde_json::from_str::<Interval>(r#"{"fortnights": 1}"#).is_err());
    }

    #[test]
    fn test_equality_uses_default_rendering() {
        let a = Interval::parse("1 year 2 months").unwrap();
        let b = Interval::parse("1-2").unwrap();
        assert_eq!(a, b);
        assert!(a.safe_equals("P1Y2M").unwrap());
        assert!(!a.safe_equals("P1Y").unwrap());
        assert_eq!(a.safe_equals("garbage").unwrap_err().code(), IssueCode::InvalidString);
    }

    #[test]
    fn test_to_duration() {
        let interval = Interval::parse("1 day 02:00:00.5").unwrap();
        let duration = interval.to_duration().unwrap();
        assert_eq!(duration.num_milliseconds(), (26 * 3600) * 1000 + 500);

        let interval = Interval::zero().with_years(1).with_months(1);
        assert_eq!(interval.to_duration().unwrap().num_days(), 395);
        assert!(Interval::zero().with_years(i64::MAX).to_duration().is_none());
    }
}
