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

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::{PgResult, PgTypeError};

use super::grammar::match_grammar;
use super::normalize::{carry, normalize, Fields};
use super::{number_text, Interval, IntervalField, INTERVAL_TYPE};

/// Number of positional arguments: years, months, days, hours, minutes, seconds, milliseconds.
const POSITIONAL_ARGUMENTS: usize = 7;

/// Example quoted back when a string matches no grammar.
const EXPECTED_PATTERN: &str = "P1Y2M3DT4H5M6S";

/// Expected-value hint when a component overflows an `i64`.
const EXPECTED_RANGE: &str = "interval fields within the 64-bit integer range";

/// Object form of an interval. Absent fields count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IntervalObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub months: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milliseconds: Option<f64>,
}

impl IntervalObject {
    fn slot(&mut self, field: IntervalField) -> &mut Option<f64> {
        match field {
            IntervalField::Years => &mut self.years,
            IntervalField::Months => &mut self.months,
            IntervalField::Days => &mut self.days,
            IntervalField::Hours => &mut self.hours,
            IntervalField::Minutes => &mut self.minutes,
            IntervalField::Seconds => &mut self.seconds,
            IntervalField::Milliseconds => &mut self.milliseconds,
        }
    }
}

/// Everything an [`Interval`] can be built from.
#[derive(Debug, Clone, PartialEq)]
pub enum IntervalInput {
    Text(String),
    /// Positional arguments; exactly seven are accepted.
    Numbers(Vec<f64>),
    Object(IntervalObject),
    /// Loosely typed input: a string, an object, or an array of arguments.
    Json(JsonValue),
    Interval(Interval),
}

impl From<&str> for IntervalInput {
    fn from(value: &str) -> Self {
        IntervalInput::Text(value.to_string())
    }
}

impl From<String> for IntervalInput {
    fn from(value: String) -> Self {
        IntervalInput::Text(value)
    }
}

impl From<Vec<f64>> for IntervalInput {
    fn from(value: Vec<f64>) -> Self {
        IntervalInput::Numbers(value)
    }
}

impl From<&[f64]> for IntervalInput {
    fn from(value: &[f64]) -> Self {
        IntervalInput::Numbers(value.to_vec())
    }
}

impl From<[f64; 7]> for IntervalInput {
    fn from(value: [f64; 7]) -> Self {
        IntervalInput::Numbers(value.to_vec())
    }
}

impl From<IntervalObject> for IntervalInput {
    fn from(value: IntervalObject) -> Self {
        IntervalInput::Object(value)
    }
}

impl From<JsonValue> for IntervalInput {
    fn from(value: JsonValue) -> Self {
        IntervalInput::Json(value)
    }
}

impl From<Interval> for IntervalInput {
    fn from(value: Interval) -> Self {
        IntervalInput::Interval(value)
    }
}

impl From<&Interval> for IntervalInput {
    fn from(value: &Interval) -> Self {
        IntervalInput::Interval(*value)
    }
}

impl Interval {
    /// Build an interval from any supported input without panicking.
    ///
    /// Text is matched against the interval grammars; numbers and objects are
    /// normalised the same way parsed text is; an existing interval is copied.
    pub fn safe_from<I: Into<IntervalInput>>(input: I) -> PgResult<Interval> {
        match input.into() {
            IntervalInput::Text(text) => from_text(&text),
            IntervalInput::Numbers(numbers) => from_numbers(&numbers),
            IntervalInput::Object(object) => from_object(&object),
            IntervalInput::Json(value) => from_json(value),
            IntervalInput::Interval(interval) => Ok(interval),
        }
    }
}

impl TryFrom<&str> for Interval {
    type Error = PgTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Interval::safe_from(value)
    }
}

impl TryFrom<Vec<f64>> for Interval {
    type Error = PgTypeError;

    fn try_from(value: Vec<f64>) -> Result<Self, Self::Error> {
        Interval::safe_from(value)
    }
}

impl TryFrom<IntervalObject> for Interval {
    type Error = PgTypeError;

    fn try_from(value: IntervalObject) -> Result<Self, Self::Error> {
        Interval::safe_from(value)
    }
}

impl TryFrom<JsonValue> for Interval {
    type Error = PgTypeError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        Interval::safe_from(value)
    }
}

fn from_text(text: &str) -> PgResult<Interval> {
    let (_, components) = match_grammar(text)
        .ok_or_else(|| PgTypeError::invalid_string_error(INTERVAL_TYPE, EXPECTED_PATTERN, text))?;
    Interval::from_fields(normalize(&components)?)
        .map_err(|_| PgTypeError::invalid_string_error(INTERVAL_TYPE, EXPECTED_RANGE, text))
}

fn check_arity(received: usize) -> PgResult<()> {
    if received < POSITIONAL_ARGUMENTS {
        return Err(PgTypeError::too_small_error(INTERVAL_TYPE, POSITIONAL_ARGUMENTS, received));
    }
    if received > POSITIONAL_ARGUMENTS {
        return Err(PgTypeError::too_big_error(INTERVAL_TYPE, POSITIONAL_ARGUMENTS, received));
    }
    Ok(())
}

fn finite(value: f64) -> PgResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PgTypeError::invalid_type_error(INTERVAL_TYPE, &["number"], value.to_string()))
    }
}

fn from_numbers(numbers: &[f64]) -> PgResult<Interval> {
    check_arity(numbers.len())?;
    let mut values = [0.0; POSITIONAL_ARGUMENTS];
    for (slot, value) in values.iter_mut().zip(numbers) {
        *slot = finite(*value)?;
    }
    let [years, months, days, hours, minutes, seconds, milliseconds] = values;
    in_range(carry(Fields {
        years,
        months,
        days,
        hours,
        minutes,
        seconds,
        milliseconds,
    }))
}

fn from_object(object: &IntervalObject) -> PgResult<Interval> {
    let value = |field: Option<f64>| finite(field.unwrap_or(0.0));
    in_range(carry(Fields {
        years: value(object.years)?,
        months: value(object.months)?,
        days: value(object.days)?,
        hours: value(object.hours)?,
        minutes: value(object.minutes)?,
        seconds: value(object.seconds)?,
        milliseconds: value(object.milliseconds)?,
    }))
}

fn in_range(fields: Fields) -> PgResult<Interval> {
    Interval::from_fields(fields)
        .map_err(|bad| PgTypeError::invalid_type_error(INTERVAL_TYPE, &["i64"], number_text(bad)))
}

fn from_json(value: JsonValue) -> PgResult<Interval> {
    match value {
        JsonValue::String(text) => from_text(&text),
        JsonValue::Object(map) => from_json_object(&map),
        JsonValue::Array(mut arguments) => match arguments.len() {
            0 => Err(PgTypeError::too_small_error(INTERVAL_TYPE, 1, 0)),
            1 => from_json(arguments.remove(0)),
            received => {
                check_arity(received)?;
                let numbers = arguments
                    .iter()
                    .map(|argument| {
                        argument.as_f64().ok_or_else(|| {
                            PgTypeError::invalid_type_error(INTERVAL_TYPE, &["number"], kind_of(argument))
                        })
                    })
                    .collect::<PgResult<Vec<f64>>>()?;
                from_numbers(&numbers)
            }
        },
        other => Err(PgTypeError::invalid_type_error(
            INTERVAL_TYPE,
            &["string", "object", "array"],
            kind_of(&other),
        )),
    }
}

fn from_json_object(map: &Map<String, JsonValue>) -> PgResult<Interval> {
    let unrecognized: Vec<String> = map
        .keys()
        .filter(|key| IntervalField::from_name(key).is_none())
        .cloned()
        .collect();
    if !unrecognized.is_empty() {
        return Err(PgTypeError::unrecognized_keys_error(INTERVAL_TYPE, unrecognized));
    }
    let mut object = IntervalObject::default();
    for (key, value) in map {
        let Some(field) = IntervalField::from_name(key) else {
            continue;
        };
        let number = value
            .as_f64()
            .ok_or_else(|| PgTypeError::invalid_key_type_error(INTERVAL_TYPE, key, "number", kind_of(value)))?;
        *object.slot(field) = Some(number);
    }
    from_object(&object)
}

/// Name of a JSON value's kind, as reported in `invalid_type` issues.
pub(crate) fn kind_of(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
