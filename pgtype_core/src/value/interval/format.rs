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

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::PgTypeError;

use super::{Interval, IntervalField, INTERVAL_TYPE};

/// Output styles for [`Interval::to_style`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IntervalStyle {
    /// `1 year 2 months 3 days 4 hours`
    #[default]
    #[serde(rename = "postgres")]
    Postgres,
    /// `1 yrs 2 mons 3 days 4 hrs`
    #[serde(rename = "postgres_short")]
    PostgresShort,
    /// `1 year 2 months 3 days 04:05:06`
    #[serde(rename = "postgres_time")]
    PostgresTime,
    /// `1 yrs 2 mons 3 days 04:05:06`
    #[serde(rename = "postgres_time_short")]
    PostgresTimeShort,
    /// `P1Y2M3DT4H5M6S`, date fields always present
    #[serde(rename = "iso_8601")]
    Iso8601,
    /// `P1Y2MT4H`, zero fields left out
    #[serde(rename = "iso_8601_short")]
    Iso8601Short,
    /// `P00010203T040506`
    #[serde(rename = "iso_8601_basic")]
    Iso8601Basic,
    /// `P0001-02-03T04:05:06`
    #[serde(rename = "iso_8601_extended")]
    Iso8601Extended,
    /// `1-2 3 04:05:06`, narrowed to the populated fields
    #[serde(rename = "sql_standard")]
    SqlStandard,
}

impl IntervalStyle {
    pub const ALL: [IntervalStyle; 9] = [
        IntervalStyle::Postgres,
        IntervalStyle::PostgresShort,
        IntervalStyle::PostgresTime,
        IntervalStyle::PostgresTimeShort,
        IntervalStyle::Iso8601,
        IntervalStyle::Iso8601Short,
        IntervalStyle::Iso8601Basic,
        IntervalStyle::Iso8601Extended,
        IntervalStyle::SqlStandard,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            IntervalStyle::Postgres => "postgres",
            IntervalStyle::PostgresShort => "postgres_short",
            IntervalStyle::PostgresTime => "postgres_time",
            IntervalStyle::PostgresTimeShort => "postgres_time_short",
            IntervalStyle::Iso8601 => "iso_8601",
            IntervalStyle::Iso8601Short => "iso_8601_short",
            IntervalStyle::Iso8601Basic => "iso_8601_basic",
            IntervalStyle::Iso8601Extended => "iso_8601_extended",
            IntervalStyle::SqlStandard => "sql_standard",
        }
    }
}

impl fmt::Display for IntervalStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IntervalStyle {
    type Err = PgTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IntervalStyle::ALL
            .iter()
            .copied()
            .find(|style| style.name() == s)
            .ok_or_else(|| {
                let expected = IntervalStyle::ALL
                    .iter()
                    .map(|style| style.name())
                    .collect::<Vec<_>>()
                    .join(" | ");
                PgTypeError::invalid_string_error(INTERVAL_TYPE, expected, s)
            })
    }
}

const VERBOSE_UNITS: [(&str, &str); 7] = [
    ("year", "years"),
    ("month", "months"),
    ("day", "days"),
    ("hour", "hours"),
    ("minute", "minutes"),
    ("second", "seconds"),
    ("millisecond", "milliseconds"),
];

const SHORT_UNITS: [&str; 7] = ["yrs", "mons", "days", "hrs", "mins", "secs", "msecs"];

pub(crate) fn render(interval: &Interval, style: IntervalStyle) -> String {
    match style {
        IntervalStyle::Postgres => postgres(interval, false),
        IntervalStyle::PostgresShort => postgres(interval, true),
        IntervalStyle::PostgresTime => postgres_time(interval, false),
        IntervalStyle::PostgresTimeShort => postgres_time(interval, true),
        IntervalStyle::Iso8601 => iso_8601(interval, true),
        IntervalStyle::Iso8601Short => iso_8601(interval, false),
        IntervalStyle::Iso8601Basic => iso_8601_extended(interval)
            .chars()
            .filter(|c| *c != '-' && *c != ':')
            .collect(),
        IntervalStyle::Iso8601Extended => iso_8601_extended(interval),
        IntervalStyle::SqlStandard => sql_standard(interval),
    }
}

/// `<value> <unit>` for each non-zero field in `fields`.
fn labelled(interval: &Interval, fields: &[IntervalField], short: bool) -> Vec<String> {
    fields
        .iter()
        .filter_map(|field| {
            let value = interval.field_text(*field);
            if value == "0" {
                return None;
            }
            let index = *field as usize;
            let unit = if short {
                SHORT_UNITS[index]
            } else if value == "1" {
                VERBOSE_UNITS[index].0
            } else {
                VERBOSE_UNITS[index].1
            };
            Some(format!("{} {}", value, unit))
        })
        .collect()
}

fn postgres(interval: &Interval, short: bool) -> String {
    let parts = labelled(interval, &IntervalField::ALL, short);
    if parts.is_empty() {
        "0".to_string()
    } else {
        parts.join(" ")
    }
}

fn postgres_time(interval: &Interval, short: bool) -> String {
    let mut parts = labelled(
        interval,
        &[IntervalField::Years, IntervalField::Months, IntervalField::Days],
        short,
    );
    if has_time(interval) {
        parts.push(clock(interval, true));
    }
    if parts.is_empty() {
        "0".to_string()
    } else {
        parts.join(" ")
    }
}

fn has_time(interval: &Interval) -> bool {
    interval.hours() != 0 || interval.minutes() != 0 || interval.seconds() != 0 || interval.milliseconds() != 0.0
}

/// `hh:mm[:ss[.ffffff]]`. A clock whose fields are all non-positive is written
/// once with a leading minus.
fn clock(interval: &Interval, with_seconds: bool) -> String {
    let (hours, minutes, seconds, milliseconds) = (
        interval.hours(),
        interval.minutes(),
        interval.seconds(),
        interval.milliseconds(),
    );
    let negative = hours <= 0
        && minutes <= 0
        && seconds <= 0
        && milliseconds <= 0.0
        && (hours < 0 || minutes < 0 || seconds < 0 || milliseconds < 0.0);
    let mut text = if negative {
        format!("-{:02}:{:02}", hours.unsigned_abs(), minutes.unsigned_abs())
    } else {
        format!("{:02}:{:02}", hours, minutes)
    };
    if with_seconds {
        text.push(':');
        let seconds = seconds_text(seconds, milliseconds, 2);
        if negative {
            text.push_str(seconds.trim_start_matches('-'));
        } else {
            text.push_str(&seconds);
        }
    }
    text
}

/// Seconds with the milliseconds folded in as up to six fractional digits,
/// trailing zeros dropped and the whole part zero-padded to `width`.
fn seconds_text(seconds: i64, milliseconds: f64, width: usize) -> String {
    let micros = i128::from(seconds) * 1_000_000 + (milliseconds * 1000.0).round() as i128;
    let magnitude = micros.unsigned_abs();
    let sign = if micros < 0 { "-" } else { "" };
    let fraction = format!("{:06}", magnitude % 1_000_000);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{}{:0>width$}", sign, magnitude / 1_000_000, width = width)
    } else {
        format!("{}{:0>width$}.{}", sign, magnitude / 1_000_000, fraction, width = width)
    }
}

/// The time clause is left out when it renders as zero, so a sub-microsecond
/// remainder never produces a bare `T`.
fn iso_8601(interval: &Interval, verbose: bool) -> String {
    let seconds = seconds_text(interval.seconds(), interval.milliseconds(), 1);
    let time_is_zero = interval.hours() == 0 && interval.minutes() == 0 && seconds == "0";
    let date_is_zero = interval.years() == 0 && interval.months() == 0 && interval.days() == 0;
    if time_is_zero && date_is_zero {
        return "PT0S".to_string();
    }
    let designated = |value: String, designator: char| {
        if !verbose && value == "0" {
            String::new()
        } else {
            format!("{}{}", value, designator)
        }
    };
    let mut text = String::from("P");
    text.push_str(&designated(interval.years().to_string(), 'Y'));
    text.push_str(&designated(interval.months().to_string(), 'M'));
    text.push_str(&designated(interval.days().to_string(), 'D'));
    if !time_is_zero {
        text.push('T');
        text.push_str(&designated(interval.hours().to_string(), 'H'));
        text.push_str(&designated(interval.minutes().to_string(), 'M'));
        text.push_str(&designated(seconds, 'S'));
    }
    text
}

fn iso_8601_extended(interval: &Interval) -> String {
    format!(
        "P{:04}-{:02}-{:02}T{:02}:{:02}:{}",
        interval.years(),
        interval.months(),
        interval.days(),
        interval.hours(),
        interval.minutes(),
        seconds_text(interval.seconds(), interval.milliseconds(), 2)
    )
}

fn year_month(interval: &Interval) -> String {
    let (years, months) = (interval.years(), interval.months());
    if years <= 0 && months <= 0 && (years < 0 || months < 0) {
        format!("-{}-{}", years.unsigned_abs(), months.unsigned_abs())
    } else {
        format!("{}-{}", years, months)
    }
}

/// Pick the narrowest SQL-standard form that covers the populated fields.
/// The order of the checks matters: several forms accept the same field set.
fn sql_standard(interval: &Interval) -> String {
    use IntervalField::*;

    let present: HashSet<IntervalField> = interval.non_zero_fields().into_iter().collect();
    let has = |required: &[IntervalField]| required.iter().all(|field| present.contains(field));
    let only = |allowed: &[IntervalField]| present.iter().all(|field| allowed.contains(field));

    if present.len() == 2 && has(&[Years, Months]) {
        return year_month(interval);
    }
    if present.len() == 2 && has(&[Hours, Minutes]) {
        return clock(interval, false);
    }
    if has(&[Days, Hours, Minutes]) && only(&[Days, Hours, Minutes, Seconds, Milliseconds]) {
        return format!("{} {}", interval.days(), clock(interval, true));
    }
    if has(&[Hours, Minutes]) && only(&[Hours, Minutes, Seconds, Milliseconds]) {
        return clock(interval, true);
    }
    if only(&[Seconds, Milliseconds]) {
        return seconds_text(interval.seconds(), interval.milliseconds(), 1);
    }
    format!(
        "{} {} {}",
        year_month(interval),
        interval.days(),
        clock(interval, true)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IssueCode;

    fn sample() -> Interval {
        Interval::zero().with_years(1).with_months(2).with_hours(4).with_minutes(5).with_seconds(6)
    }

    #[test]
    fn test_postgres_styles() {
        let interval = sample();
        assert_eq!(interval.to_style(IntervalStyle::Postgres), "1 year 2 months 4 hours 5 minutes 6 seconds");
        assert_eq!(interval.to_style(IntervalStyle::PostgresShort), "1 yrs 2 mons 4 hrs 5 mins 6 secs");
        assert_eq!(interval.to_style(IntervalStyle::PostgresTime), "1 year 2 months 04:05:06");
        assert_eq!(interval.to_style(IntervalStyle::PostgresTimeShort), "1 yrs 2 mons 04:05:06");
    }

    #[test]
    fn test_postgres_pluralization_checks_exact_one() {
        let interval = Interval::zero().with_days(-1).with_milliseconds(1);
        assert_eq!(interval.to_style(IntervalStyle::Postgres), "-1 days 1 millisecond");
    }

    #[test]
    fn test_postgres_time_portions() {
        let interval = Interval::zero().with_days(3);
        assert_eq!(interval.to_style(IntervalStyle::PostgresTime), "3 days");

        let interval = Interval::parse("04:05:06.5").unwrap();
        assert_eq!(interval.to_style(IntervalStyle::PostgresTime), "04:05:06.5");

        let interval = Interval::parse("-04:05:06").unwrap();
        assert_eq!(interval.to_style(IntervalStyle::PostgresTime), "-04:05:06");
        assert_eq!(Interval::zero().to_style(IntervalStyle::PostgresTimeShort), "0");
    }

    #[test]
    fn test_iso_styles() {
        let interval = sample();
        assert_eq!(interval.to_style(IntervalStyle::Iso8601), "P1Y2M0DT4H5M6S");
        assert_eq!(interval.to_style(IntervalStyle::Iso8601Short), "P1Y2MT4H5M6S");
        assert_eq!(interval.to_style(IntervalStyle::Iso8601Extended), "P0001-02-00T04:05:06");
        assert_eq!(interval.to_style(IntervalStyle::Iso8601Basic), "P00010200T040506");
    }

    #[test]
    fn test_iso_time_clause_and_fraction() {
        let interval = Interval::zero().with_days(3);
        assert_eq!(interval.to_style(IntervalStyle::Iso8601), "P0Y0M3D");
        assert_eq!(interval.to_style(IntervalStyle::Iso8601Short), "P3D");

        let interval = Interval::parse("1.25 seconds").unwrap();
        assert_eq!(interval.to_style(IntervalStyle::Iso8601), "P0Y0M0DT0H0M1.25S");
        assert_eq!(interval.to_style(IntervalStyle::Iso8601Short), "PT1.25S");
        assert_eq!(interval.to_style(IntervalStyle::Iso8601Extended), "P0000-00-00T00:00:01.25");
    }

    #[test]
    fn test_iso_sub_microsecond_remainder_has_no_bare_time_designator() {
        let interval = Interval::parse("0.0000004 seconds").unwrap();
        assert!(!interval.is_zero());
        assert_eq!(interval.to_style(IntervalStyle::Iso8601Short), "PT0S");
        assert_eq!(interval.to_style(IntervalStyle::Iso8601), "PT0S");

        let interval = Interval::parse("1 day 0.0000004 seconds").unwrap();
        assert_eq!(interval.to_style(IntervalStyle::Iso8601Short), "P1D");
        assert_eq!(interval.to_style(IntervalStyle::Iso8601), "P0Y0M1D");
    }

    #[test]
    fn test_i64_min_fields_render() {
        let clock = Interval::zero().with_hours(i64::MIN).with_minutes(-1);
        assert_eq!(clock.to_style(IntervalStyle::PostgresTime), "-9223372036854775808:01:00");
        assert_eq!(clock.to_style(IntervalStyle::SqlStandard), "-9223372036854775808:01");

        let year_month = Interval::zero().with_years(i64::MIN).with_months(-1);
        assert_eq!(year_month.to_style(IntervalStyle::SqlStandard), "-9223372036854775808-1");

        let seconds = Interval::zero().with_seconds(i64::MIN);
        assert_eq!(seconds.to_style(IntervalStyle::SqlStandard), "-9223372036854775808");
        assert_eq!(
            seconds.with_hours(-1).to_style(IntervalStyle::PostgresTime),
            "-01:00:9223372036854775808"
        );
    }

    #[test]
    fn test_zero_interval() {
        let zero = Interval::zero();
        assert_eq!(zero.to_style(IntervalStyle::Postgres), "0");
        assert_eq!(zero.to_style(IntervalStyle::Iso8601), "PT0S");
        assert_eq!(zero.to_style(IntervalStyle::Iso8601Short), "PT0S");
        assert_eq!(zero.to_style(IntervalStyle::SqlStandard), "0");
    }

    #[test]
    fn test_sql_standard_cascade() {
        assert_eq!(sample().to_style(IntervalStyle::SqlStandard), "1-2 0 04:05:06");

        let style = IntervalStyle::SqlStandard;
        assert_eq!(Interval::zero().with_years(1).with_months(2).to_style(style), "1-2");
        assert_eq!(Interval::zero().with_years(-1).with_months(-2).to_style(style), "-1-2");
        assert_eq!(Interval::zero().with_hours(4).with_minutes(5).to_style(style), "04:05");
        assert_eq!(
            Interval::zero().with_days(3).with_hours(4).with_minutes(5).with_seconds(6).to_style(style),
            "3 04:05:06"
        );
        assert_eq!(
            Interval::zero().with_hours(4).with_minutes(5).with_milliseconds(500).to_style(style),
            "04:05:00.5"
        );
        assert_eq!(Interval::zero().with_seconds(6).with_milliseconds(500).to_style(style), "6.5");
        assert_eq!(Interval::zero().with_years(1).to_style(style), "1-0 0 00:00:00");
        assert_eq!(Interval::zero().with_days(3).with_hours(4).to_style(style), "0-0 3 04:00:00");
    }

    #[test]
    fn test_style_names() {
        for style in IntervalStyle::ALL {
            assert_eq!(style.name().parse::<IntervalStyle>().unwrap(), style);
        }
        assert_eq!(serde_json::to_string(&IntervalStyle::Iso8601Basic).unwrap(), "\"iso_8601_basic\"");
        let err = sample().to_style_name("bogus-style").unwrap_err();
        assert_eq!(err.code(), IssueCode::InvalidString);
        match err.issue {
            crate::Issue::InvalidString { expected, received } => {
                assert_eq!(received, "bogus-style");
                assert_eq!(expected.split(" | ").count(), 9);
            }
            other => panic!("unexpected issue {:?}", other),
        }
    }
}
