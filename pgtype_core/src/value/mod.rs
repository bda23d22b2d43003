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

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

mod interval;

pub use interval::*;

use crate::{PgResult, PgTypeError};

/// A decoded column value.
#[derive(Debug, Clone, PartialEq)]
pub enum PgValue {
    Null,
    Interval(Interval),
    Array(Vec<PgValue>),
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum PgValueType {
    Null,
    Interval,
    Array,
}

impl PgValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            PgValue::Null => "null",
            PgValue::Interval(_) => "interval",
            PgValue::Array(_) => "array",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PgValue::Null)
    }

    pub fn as_interval(&self) -> Option<&Interval> {
        match self {
            PgValue::Interval(interval) => Some(interval),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[PgValue]> {
        match self {
            PgValue::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl From<Interval> for PgValue {
    fn from(value: Interval) -> Self {
        PgValue::Interval(value)
    }
}

impl<T: Into<PgValue>> From<Option<T>> for PgValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(PgValue::Null)
    }
}

impl<T: Into<PgValue>> From<Vec<T>> for PgValue {
    fn from(value: Vec<T>) -> Self {
        PgValue::Array(value.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for PgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PgValue::Null => f.write_str("NULL"),
            PgValue::Interval(interval) => write!(f, "{}", interval),
            PgValue::Array(items) => {
                let items = items.iter().map(ToString::to_string).collect::<Vec<_>>();
                write!(f, "{{{}}}", items.join(","))
            }
        }
    }
}

impl Serialize for PgValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("PgValue", 2)?;
        match self {
            PgValue::Null => {
                state.serialize_field("type", &PgValueType::Null)?;
                state.serialize_field("value", &())?;
            }
            PgValue::Interval(interval) => {
                state.serialize_field("type", &PgValueType::Interval)?;
                state.serialize_field("value", interval)?;
            }
            PgValue::Array(items) => {
                state.serialize_field("type", &PgValueType::Array)?;
                state.serialize_field("value", items)?;
            }
        }
        state.end()
    }
}

/// Conversion out of a decoded [`PgValue`].
pub trait FromPgValue: Sized {
    fn from_pg_value(value: &PgValue) -> PgResult<Self>;
}

impl FromPgValue for Interval {
    fn from_pg_value(value: &PgValue) -> PgResult<Self> {
        value
            .as_interval()
            .copied()
            .ok_or_else(|| PgTypeError::invalid_type_error(INTERVAL_TYPE, &["interval"], value.type_name()))
    }
}

impl<T: FromPgValue> FromPgValue for Option<T> {
    fn from_pg_value(value: &PgValue) -> PgResult<Self> {
        match value {
            PgValue::Null => Ok(None),
            other => T::from_pg_value(other).map(Some),
        }
    }
}

impl<T: FromPgValue> FromPgValue for Vec<T> {
    fn from_pg_value(value: &PgValue) -> PgResult<Self> {
        match value {
            PgValue::Array(items) => items.iter().map(T::from_pg_value).collect(),
            other => Err(PgTypeError::invalid_type_error("Array", &["array"], other.type_name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_pg_value() {
        let day = Interval::parse("1 day").unwrap();
        let value = PgValue::from(vec![Some(day), None]);
        let decoded: Vec<Option<Interval>> = FromPgValue::from_pg_value(&value).unwrap();
        assert_eq!(decoded, vec![Some(day), None]);

        assert!(Interval::from_pg_value(&PgValue::Null).is_err());
        assert!(<Vec<Interval>>::from_pg_value(&PgValue::Interval(day)).is_err());
    }

    #[test]
    fn test_serialize_tagged() {
        let value = PgValue::Interval(Interval::parse("2 hours").unwrap());
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({ "type": "interval", "value": { "hours": 2 } })
        );
        assert_eq!(
            serde_json::to_value(PgValue::Null).unwrap(),
            json!({ "type": "null", "value": null })
        );
    }

    #[test]
    fn test_display() {
        let value = PgValue::from(vec![Some(Interval::parse("1 day").unwrap()), None]);
        assert_eq!(value.to_string(), "{1 day,NULL}");
    }
}
