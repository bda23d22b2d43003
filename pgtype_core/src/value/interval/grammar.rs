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
//! Textual interval grammars.
//!
//! Each grammar is an independent compiled pattern. [`match_grammar`] tries them
//! in a fixed order against the input prefixed with a single space, and the first
//! one that matches decides how the text is read.
//!
use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

macro_rules! number {
    () => {
        r"[+-]?(?:\d+(?:\.\d*)?|\.\d+)"
    };
}

macro_rules! all_units {
    () => {
        r"millennia|millenniums?|centuries|century|decades?|years?|yrs?|months?|mons?|weeks?|days?|hours?|hrs?|minutes?|mins?|seconds?|secs?|milliseconds?|msecs?|microseconds?"
    };
}

macro_rules! date_units {
    () => {
        r"millennia|millenniums?|centuries|century|decades?|years?|yrs?|months?|mons?|weeks?|days?"
    };
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("interval grammar must compile")
}

/// One `<number><unit>` token of the traditional grammars.
static TOKEN: Lazy<Regex> = Lazy::new(|| {
    compile(concat!(
        r"(?i)@?\s*(?P<value>", number!(), r")\s*(?P<unit>", all_units!(), r")\b(?P<ago>\s+ago\b)?"
    ))
});

static TRADITIONAL: Lazy<Regex> = Lazy::new(|| {
    compile(concat!(
        r"(?i)^(?:\s+@?\s*", number!(), r"\s*(?:", all_units!(), r")\b(?:\s+ago\b)?)+\s*$"
    ))
});

static TRADITIONAL_WITH_TIME: Lazy<Regex> = Lazy::new(|| {
    compile(concat!(
        r"(?i)^(?P<date>(?:\s+@?\s*", number!(), r"\s*(?:", date_units!(), r")\b(?:\s+ago\b)?)+)",
        r"\s+(?P<tsign>[+-])?(?P<hour>\d+):(?P<minute>\d+)(?::(?P<second>\d+(?:\.\d*)?))?\s*$"
    ))
});

static ISO_DESIGNATORS: Lazy<Regex> = Lazy::new(|| {
    compile(concat!(
        r"(?i)^\s*P",
        r"(?:(?P<year>", number!(), r")Y)?",
        r"(?:(?P<month>", number!(), r")M)?",
        r"(?:(?P<week>", number!(), r")W)?",
        r"(?:(?P<day>", number!(), r")D)?",
        r"(?:(?P<time>T)",
        r"(?:(?P<hour>", number!(), r")H)?",
        r"(?:(?P<minute>", number!(), r")M)?",
        r"(?:(?P<second>", number!(), r")S)?",
        r")?\s*$"
    ))
});

static ISO_BASIC: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)^\s*P(?:(?P<year>\d{4})(?P<month>\d{2})(?P<day>\d{2}))?T(?P<hour>\d{2})(?P<minute>\d{2})(?P<second>\d{2}(?:\.\d+)?)\s*$",
    )
});

static ISO_EXTENDED: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)^\s*P(?:(?P<year>[+-]?\d+)-(?P<month>[+-]?\d+)-(?P<day>[+-]?\d+))?T(?P<hour>[+-]?\d+):(?P<minute>[+-]?\d+):(?P<second>[+-]?\d+(?:\.\d+)?)\s*$",
    )
});

static SQL_YEAR_TO_SECOND: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)^\s*(?P<ysign>[+-])?(?P<year>\d+)-(?P<month>\d+)(?:-|\s+)(?P<day>[+-]?\d+)\s+(?P<tsign>[+-])?(?P<hour>\d+):(?P<minute>\d+):(?P<second>\d+(?:\.\d+)?)\s*$",
    )
});

static SQL_YEAR_TO_MONTH: Lazy<Regex> =
    Lazy::new(|| compile(r"^\s*(?P<ysign>[+-])?(?P<year>\d+)-(?P<month>\d+)\s*$"));

static SQL_DAY_TO_SECOND: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)^\s*(?P<day>[+-]?\d+)\s+(?P<tsign>[+-])?(?P<hour>\d+):(?P<minute>\d+)(?::(?P<second>\d+(?:\.\d+)?))?(?P<ago>\s+ago)?\s*$",
    )
});

static SQL_HOUR_TO_SECOND: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)^\s*(?P<tsign>[+-])?(?P<hour>\d+):(?P<minute>\d+):(?P<second>\d+(?:\.\d+)?)(?P<ago>\s+ago)?\s*$",
    )
});

static SQL_HOUR_TO_MINUTE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)^\s*(?P<tsign>[+-])?(?P<hour>\d+):(?P<minute>\d+)(?P<ago>\s+ago)?\s*$"));

static SQL_SECOND: Lazy<Regex> =
    Lazy::new(|| compile(concat!(r"(?i)^\s*(?P<second>", number!(), r")(?P<ago>\s+ago)?\s*$")));

/// Units a captured component can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Millennium,
    Century,
    Decade,
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
    Microsecond,
}

impl Unit {
    pub const ALL: [Unit; 12] = [
        Unit::Millennium,
        Unit::Century,
        Unit::Decade,
        Unit::Year,
        Unit::Month,
        Unit::Week,
        Unit::Day,
        Unit::Hour,
        Unit::Minute,
        Unit::Second,
        Unit::Millisecond,
        Unit::Microsecond,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Unit::Millennium => "millennium",
            Unit::Century => "century",
            Unit::Decade => "decade",
            Unit::Year => "year",
            Unit::Month => "month",
            Unit::Week => "week",
            Unit::Day => "day",
            Unit::Hour => "hour",
            Unit::Minute => "minute",
            Unit::Second => "second",
            Unit::Millisecond => "millisecond",
            Unit::Microsecond => "microsecond",
        }
    }

    /// Resolve a unit word as written in the traditional grammar.
    fn from_token(token: &str) -> Option<Unit> {
        let unit = match token.to_ascii_lowercase().as_str() {
            "millennium" | "millenniums" | "millennia" => Unit::Millennium,
            "century" | "centuries" => Unit::Century,
            "decade" | "decades" => Unit::Decade,
            "year" | "years" | "yr" | "yrs" => Unit::Year,
            "month" | "months" | "mon" | "mons" => Unit::Month,
            "week" | "weeks" => Unit::Week,
            "day" | "days" => Unit::Day,
            "hour" | "hours" | "hr" | "hrs" => Unit::Hour,
            "minute" | "minutes" | "min" | "mins" => Unit::Minute,
            "second" | "seconds" | "sec" | "secs" => Unit::Second,
            "millisecond" | "milliseconds" | "msec" | "msecs" => Unit::Millisecond,
            "microsecond" | "microseconds" => Unit::Microsecond,
            _ => return None,
        };
        Some(unit)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw captured text per unit. Every unit is always present; units a grammar
/// did not capture hold `"0"`.
#[derive(Debug, Clone, PartialEq)]
pub struct Components {
    values: IndexMap<Unit, String>,
}

impl Default for Components {
    fn default() -> Self {
        Components {
            values: Unit::ALL.iter().map(|unit| (*unit, "0".to_string())).collect(),
        }
    }
}

impl Components {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, unit: Unit) -> &str {
        self.values.get(&unit).map(String::as_str).unwrap_or("0")
    }

    pub fn set<S: Into<String>>(&mut self, unit: Unit, text: S) {
        self.values.insert(unit, text.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (Unit, &str)> {
        self.values.iter().map(|(unit, text)| (*unit, text.as_str()))
    }

    fn set_capture(&mut self, unit: Unit, caps: &Captures, group: &str) {
        if let Some(m) = caps.name(group) {
            self.set(unit, m.as_str());
        }
    }

    /// Prefix a leading sign, shared by several fields, onto one captured field.
    fn set_signed(&mut self, unit: Unit, caps: &Captures, sign: &str, group: &str) {
        if let Some(m) = caps.name(group) {
            let text = match caps.name(sign).map(|s| s.as_str()) {
                Some("-") => format!("-{}", m.as_str()),
                _ => m.as_str().to_string(),
            };
            self.set(unit, text);
        }
    }

    /// Attach a trailing `ago` to the last field the grammar captured.
    fn append_ago(&mut self, caps: &Captures, candidates: &[(Unit, &str)]) {
        if caps.name("ago").is_none() {
            return;
        }
        if let Some((unit, _)) = candidates.iter().rev().find(|(_, group)| caps.name(group).is_some()) {
            let text = format!("{} ago", self.get(*unit));
            self.set(*unit, text);
        }
    }

    /// Read `<number><unit>` tokens, rejecting a unit that appears twice.
    fn read_tokens(&mut self, text: &str) -> Option<()> {
        let mut seen = HashSet::new();
        for caps in TOKEN.captures_iter(text) {
            let unit = Unit::from_token(caps.name("unit")?.as_str())?;
            if !seen.insert(unit) {
                return None;
            }
            let value = caps.name("value")?.as_str();
            match caps.name("ago") {
                Some(_) => self.set(unit, format!("{} ago", value)),
                None => self.set(unit, value),
            }
        }
        Some(())
    }
}

/// The recognised interval syntaxes, in trial order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    Traditional,
    TraditionalWithTime,
    IsoDesignators,
    IsoBasic,
    IsoExtended,
    SqlYearToSecond,
    SqlYearToMonth,
    SqlDayToSecond,
    SqlHourToSecond,
    SqlHourToMinute,
    SqlSecond,
}

impl Grammar {
    pub const ORDER: [Grammar; 11] = [
        Grammar::Traditional,
        Grammar::TraditionalWithTime,
        Grammar::IsoDesignators,
        Grammar::IsoBasic,
        Grammar::IsoExtended,
        Grammar::SqlYearToSecond,
        Grammar::SqlYearToMonth,
        Grammar::SqlDayToSecond,
        Grammar::SqlHourToSecond,
        Grammar::SqlHourToMinute,
        Grammar::SqlSecond,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Grammar::Traditional => "traditional",
            Grammar::TraditionalWithTime => "traditional_with_time",
            Grammar::IsoDesignators => "iso_8601_designators",
            Grammar::IsoBasic => "iso_8601_basic",
            Grammar::IsoExtended => "iso_8601_extended",
            Grammar::SqlYearToSecond => "sql_year_to_second",
            Grammar::SqlYearToMonth => "sql_year_to_month",
            Grammar::SqlDayToSecond => "sql_day_to_second",
            Grammar::SqlHourToSecond => "sql_hour_to_second",
            Grammar::SqlHourToMinute => "sql_hour_to_minute",
            Grammar::SqlSecond => "sql_second",
        }
    }

    /// Match `candidate` against this grammar alone.
    pub fn matches(&self, candidate: &str) -> Option<Components> {
        let mut components = Components::new();
        match self {
            Grammar::Traditional => {
                if !TRADITIONAL.is_match(candidate) {
                    return None;
                }
                components.read_tokens(candidate)?;
            }
            Grammar::TraditionalWithTime => {
                let caps = TRADITIONAL_WITH_TIME.captures(candidate)?;
                components.read_tokens(caps.name("date")?.as_str())?;
                components.set_signed(Unit::Hour, &caps, "tsign", "hour");
                components.set_signed(Unit::Minute, &caps, "tsign", "minute");
                components.set_signed(Unit::Second, &caps, "tsign", "second");
            }
            Grammar::IsoDesignators => {
                let caps = ISO_DESIGNATORS.captures(candidate)?;
                let has = |groups: &[&str]| groups.iter().any(|g| caps.name(g).is_some());
                if !has(&["year", "month", "week", "day", "hour", "minute", "second"]) {
                    return None;
                }
                if caps.name("time").is_some() && !has(&["hour", "minute", "second"]) {
                    return None;
                }
                components.set_capture(Unit::Year, &caps, "year");
                components.set_capture(Unit::Month, &caps, "month");
                components.set_capture(Unit::Week, &caps, "week");
                components.set_capture(Unit::Day, &caps, "day");
                components.set_capture(Unit::Hour, &caps, "hour");
                components.set_capture(Unit::Minute, &caps, "minute");
                components.set_capture(Unit::Second, &caps, "second");
            }
            Grammar::IsoBasic | Grammar::IsoExtended => {
                let pattern = if *self == Grammar::IsoBasic { &ISO_BASIC } else { &ISO_EXTENDED };
                let caps = pattern.captures(candidate)?;
                components.set_capture(Unit::Year, &caps, "year");
                components.set_capture(Unit::Month, &caps, "month");
                components.set_capture(Unit::Day, &caps, "day");
                components.set_capture(Unit::Hour, &caps, "hour");
                components.set_capture(Unit::Minute, &caps, "minute");
                components.set_capture(Unit::Second, &caps, "second");
            }
            Grammar::SqlYearToSecond => {
                let caps = SQL_YEAR_TO_SECOND.captures(candidate)?;
                components.set_signed(Unit::Year, &caps, "ysign", "year");
                components.set_signed(Unit::Month, &caps, "ysign", "month");
                components.set_capture(Unit::Day, &caps, "day");
                components.set_signed(Unit::Hour, &caps, "tsign", "hour");
                components.set_signed(Unit::Minute, &caps, "tsign", "minute");
                components.set_signed(Unit::Second, &caps, "tsign", "second");
            }
            Grammar::SqlYearToMonth => {
                let caps = SQL_YEAR_TO_MONTH.captures(candidate)?;
                components.set_signed(Unit::Year, &caps, "ysign", "year");
                components.set_signed(Unit::Month, &caps, "ysign", "month");
            }
            Grammar::SqlDayToSecond => {
                let caps = SQL_DAY_TO_SECOND.captures(candidate)?;
                components.set_capture(Unit::Day, &caps, "day");
                components.set_signed(Unit::Hour, &caps, "tsign", "hour");
                components.set_signed(Unit::Minute, &caps, "tsign", "minute");
                components.set_signed(Unit::Second, &caps, "tsign", "second");
                components.append_ago(&caps, &[(Unit::Minute, "minute"), (Unit::Second, "second")]);
            }
            Grammar::SqlHourToSecond => {
                let caps = SQL_HOUR_TO_SECOND.captures(candidate)?;
                components.set_signed(Unit::Hour, &caps, "tsign", "hour");
                components.set_signed(Unit::Minute, &caps, "tsign", "minute");
                components.set_signed(Unit::Second, &caps, "tsign", "second");
                components.append_ago(&caps, &[(Unit::Second, "second")]);
            }
            Grammar::SqlHourToMinute => {
                let caps = SQL_HOUR_TO_MINUTE.captures(candidate)?;
                components.set_signed(Unit::Hour, &caps, "tsign", "hour");
                components.set_signed(Unit::Minute, &caps, "tsign", "minute");
                components.append_ago(&caps, &[(Unit::Minute, "minute")]);
            }
            Grammar::SqlSecond => {
                let caps = SQL_SECOND.captures(candidate)?;
                components.set_capture(Unit::Second, &caps, "second");
                components.append_ago(&caps, &[(Unit::Second, "second")]);
            }
        }
        Some(components)
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Find the first grammar, in trial order, that accepts `text`.
pub fn match_grammar(text: &str) -> Option<(Grammar, Components)> {
    let candidate = format!(" {}", text);
    Grammar::ORDER
        .iter()
        .find_map(|grammar| grammar.matches(&candidate).map(|components| (*grammar, components)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(text: &str) -> (Grammar, Components) {
        match_grammar(text).unwrap_or_else(|| panic!("no grammar matched '{}'", text))
    }

    #[test]
    fn test_unmatched_units_default_to_zero() {
        let (grammar, components) = matched("1 year 2 months");
        assert_eq!(grammar, Grammar::Traditional);
        assert_eq!(components.iter().count(), 12);
        assert_eq!(components.get(Unit::Year), "1");
        assert_eq!(components.get(Unit::Month), "2");
        assert_eq!(components.get(Unit::Microsecond), "0");
    }

    #[test]
    fn test_traditional_tokens() {
        let (grammar, components) = matched("@ 2 centuries 3.5 hrs -4 mins 1 millennium 6 msecs 7 weeks");
        assert_eq!(grammar, Grammar::Traditional);
        assert_eq!(components.get(Unit::Century), "2");
        assert_eq!(components.get(Unit::Hour), "3.5");
        assert_eq!(components.get(Unit::Minute), "-4");
        assert_eq!(components.get(Unit::Millennium), "1");
        assert_eq!(components.get(Unit::Millisecond), "6");
        assert_eq!(components.get(Unit::Week), "7");
    }

    #[test]
    fn test_traditional_ago_and_case() {
        let (_, components) = matched("1 YEAR 2 Days ago");
        assert_eq!(components.get(Unit::Year), "1");
        assert_eq!(components.get(Unit::Day), "2 ago");
    }

    #[test]
    fn test_traditional_rejects_duplicates_and_glued_tokens() {
        assert!(Grammar::Traditional.matches(" 1 day 2 days").is_none());
        assert!(Grammar::Traditional.matches(" 1year2months").is_none());
        assert!(Grammar::Traditional.matches(" 1 fortnight").is_none());
    }

    #[test]
    fn test_traditional_with_time() {
        let (grammar, components) = matched("1 year 2 days -04:05:06.5");
        assert_eq!(grammar, Grammar::TraditionalWithTime);
        assert_eq!(components.get(Unit::Year), "1");
        assert_eq!(components.get(Unit::Day), "2");
        assert_eq!(components.get(Unit::Hour), "-04");
        assert_eq!(components.get(Unit::Minute), "-05");
        assert_eq!(components.get(Unit::Second), "-06.5");
    }

    #[test]
    fn test_iso_forms() {
        let (grammar, components) = matched("P1Y2M3DT4H5M6S");
        assert_eq!(grammar, Grammar::IsoDesignators);
        assert_eq!(components.get(Unit::Day), "3");
        assert_eq!(components.get(Unit::Minute), "5");

        let (grammar, components) = matched("P2W");
        assert_eq!(grammar, Grammar::IsoDesignators);
        assert_eq!(components.get(Unit::Week), "2");

        let (grammar, components) = matched("P00010203T040506");
        assert_eq!(grammar, Grammar::IsoBasic);
        assert_eq!(components.get(Unit::Year), "0001");
        assert_eq!(components.get(Unit::Second), "06");

        let (grammar, components) = matched("P0001-02-03T04:05:06.25");
        assert_eq!(grammar, Grammar::IsoExtended);
        assert_eq!(components.get(Unit::Month), "02");
        assert_eq!(components.get(Unit::Second), "06.25");
    }

    #[test]
    fn test_iso_designators_require_a_component() {
        assert!(match_grammar("P").is_none());
        assert!(match_grammar("PT").is_none());
        assert!(match_grammar("P1YT").is_none());
    }

    #[test]
    fn test_sql_forms() {
        assert_eq!(matched("1-2 3 04:05:06").0, Grammar::SqlYearToSecond);
        assert_eq!(matched("1-2-3 04:05:06").0, Grammar::SqlYearToSecond);
        assert_eq!(matched("1-2").0, Grammar::SqlYearToMonth);
        assert_eq!(matched("3 04:05:06").0, Grammar::SqlDayToSecond);
        assert_eq!(matched("3 04:05").0, Grammar::SqlDayToSecond);
        assert_eq!(matched("04:05:06").0, Grammar::SqlHourToSecond);
        assert_eq!(matched("04:05").0, Grammar::SqlHourToMinute);
        assert_eq!(matched("-12.5").0, Grammar::SqlSecond);
    }

    #[test]
    fn test_sql_signs_spread_over_fields() {
        let (_, components) = matched("-1-2");
        assert_eq!(components.get(Unit::Year), "-1");
        assert_eq!(components.get(Unit::Month), "-2");

        let (_, components) = matched("-04:05:06");
        assert_eq!(components.get(Unit::Hour), "-04");
        assert_eq!(components.get(Unit::Minute), "-05");
        assert_eq!(components.get(Unit::Second), "-06");
    }

    #[test]
    fn test_ago_attaches_to_last_field() {
        let (_, components) = matched("3 04:05:06 ago");
        assert_eq!(components.get(Unit::Second), "06 ago");
        assert_eq!(components.get(Unit::Day), "3");

        let (_, components) = matched("3 04:05 ago");
        assert_eq!(components.get(Unit::Minute), "05 ago");

        let (grammar, components) = matched("04:05 ago");
        assert_eq!(grammar, Grammar::SqlHourToMinute);
        assert_eq!(components.get(Unit::Minute), "05 ago");

        let (_, components) = matched("10 ago");
        assert_eq!(components.get(Unit::Second), "10 ago");
    }

    #[test]
    fn test_garbage_matches_nothing() {
        assert!(match_grammar("").is_none());
        assert!(match_grammar("yesterday").is_none());
        assert!(match_grammar("1:2:3:4").is_none());
    }
}
