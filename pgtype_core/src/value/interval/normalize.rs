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
//! Canonicalisation of captured interval components.
//!
use crate::{PgResult, PgTypeError};

use super::grammar::{Components, Unit};
use super::INTERVAL_TYPE;

/// The seven canonical fields while they are still being carried between units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Fields {
    pub years: f64,
    pub months: f64,
    pub days: f64,
    pub hours: f64,
    pub minutes: f64,
    pub seconds: f64,
    pub milliseconds: f64,
}

/// Non-canonical magnitudes accepted alongside the canonical fields.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Extra {
    pub millennia: f64,
    pub centuries: f64,
    pub decades: f64,
    pub weeks: f64,
    pub microseconds: f64,
}

/// Turn a grammar capture into canonical fields.
///
/// A trailing `ago` on any captured value negates every value of the match.
pub fn normalize(components: &Components) -> PgResult<Fields> {
    let ago = components
        .iter()
        .any(|(_, text)| text.trim_end().to_ascii_lowercase().ends_with("ago"));

    let mut fields = Fields::default();
    let mut extra = Extra::default();
    for (unit, text) in components.iter() {
        let mut value = parse_component(unit, text)?;
        if ago {
            value = -value;
        }
        match unit {
            Unit::Millennium => extra.millennia = value,
            Unit::Century => extra.centuries = value,
            Unit::Decade => extra.decades = value,
            Unit::Year => fields.years = value,
            Unit::Month => fields.months = value,
            Unit::Week => extra.weeks = value,
            Unit::Day => fields.days = value,
            Unit::Hour => fields.hours = value,
            Unit::Minute => fields.minutes = value,
            Unit::Second => fields.seconds = value,
            Unit::Millisecond => fields.milliseconds = value,
            Unit::Microsecond => extra.microseconds = value,
        }
    }
    Ok(carry(fold(fields, extra)))
}

fn parse_component(unit: Unit, text: &str) -> PgResult<f64> {
    let lower = text.trim().to_ascii_lowercase();
    let number = lower.strip_suffix("ago").unwrap_or(&lower).trim();
    number
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| PgTypeError::invalid_string_error(INTERVAL_TYPE, format!("a finite {} value", unit), text))
}

/// Add the non-canonical units into the canonical fields they are multiples of.
pub fn fold(mut fields: Fields, extra: Extra) -> Fields {
    fields.years += extra.millennia * 1000.0 + extra.centuries * 100.0 + extra.decades * 10.0;
    fields.days += extra.weeks * 7.0;
    fields.milliseconds += extra.microseconds / 1000.0;
    fields
}

/// Push fractions down one unit, then overflow up, in a single pass each.
pub fn carry(fields: Fields) -> Fields {
    carry_up(carry_down(fields))
}

/// Top-down. Each step sees what the previous step added, so a fractional year
/// lands in days and is split again into hours; nothing is revisited afterwards.
pub fn carry_down(mut f: Fields) -> Fields {
    let (years, spill) = split_fraction(f.years, 365.0);
    f.years = years;
    f.days += spill;

    let (months, spill) = split_fraction(f.months, 30.0);
    f.months = months;
    f.days += spill;

    let (days, spill) = split_fraction(f.days, 24.0);
    f.days = days;
    f.hours += spill;

    let (hours, spill) = split_fraction(f.hours, 60.0);
    f.hours = hours;
    f.minutes += spill;

    let (minutes, spill) = split_fraction(f.minutes, 60.0);
    f.minutes = minutes;
    f.seconds += spill;

    let (seconds, spill) = split_fraction(f.seconds, 1000.0);
    f.seconds = seconds;
    f.milliseconds += spill;
    f
}

/// Bottom-up, positive overflow only. Months never roll into years.
pub fn carry_up(mut f: Fields) -> Fields {
    let (carried, rest) = overflow(f.milliseconds, 1000.0);
    f.seconds += carried;
    f.milliseconds = rest;

    let (carried, rest) = overflow(f.seconds, 60.0);
    f.minutes += carried;
    f.seconds = rest;

    let (carried, rest) = overflow(f.minutes, 60.0);
    f.hours += carried;
    f.minutes = rest;

    let (carried, rest) = overflow(f.hours, 24.0);
    f.days += carried;
    f.hours = rest;

    let (carried, rest) = overflow(f.days, 365.0);
    f.years += carried;
    f.days = rest;
    f
}

fn overflow(value: f64, radix: f64) -> (f64, f64) {
    if value >= radix {
        let carried = (value / radix).floor();
        (carried, value - carried * radix)
    } else {
        (0.0, value)
    }
}

/// Split `value` at the decimal point of its shortest decimal rendering and scale
/// the digits after the point by `factor`.
///
/// `2.1` yields the whole part `2` and `0.1 * factor`, computed from the digits
/// `1` rather than from the binary remainder `2.1 % 1`. The fraction keeps the
/// sign of `value`.
pub fn split_fraction(value: f64, factor: f64) -> (f64, f64) {
    let text = value.to_string();
    let Some((whole, digits)) = text.split_once('.') else {
        return (value, 0.0);
    };
    let whole = whole.parse::<f64>().unwrap_or(0.0) + 0.0;
    let numerator = digits.parse::<f64>().unwrap_or(0.0);
    let scale = 10f64.powi(digits.len() as i32);
    let sign = if value.is_sign_negative() { -1.0 } else { 1.0 };
    (whole, sign * numerator * factor / scale)
}
