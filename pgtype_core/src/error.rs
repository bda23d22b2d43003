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

use serde::{Deserialize, Serialize};

/// Discriminant carried by every [`Issue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    InvalidType,
    InvalidString,
    NotWhole,
    TooBig,
    TooSmall,
    UnrecognizedKeys,
    MissingKeys,
    InvalidKeyType,
}

impl IssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCode::InvalidType => "invalid_type",
            IssueCode::InvalidString => "invalid_string",
            IssueCode::NotWhole => "not_whole",
            IssueCode::TooBig => "too_big",
            IssueCode::TooSmall => "too_small",
            IssueCode::UnrecognizedKeys => "unrecognized_keys",
            IssueCode::MissingKeys => "missing_keys",
            IssueCode::InvalidKeyType => "invalid_key_type",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a `too_big` / `too_small` issue is counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeKind {
    Arguments,
}

impl fmt::Display for SizeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeKind::Arguments => f.write_str("arguments"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Issue {
    InvalidType {
        expected: Vec<String>,
        received: String,
    },
    InvalidString {
        expected: String,
        received: String,
    },
    NotWhole {
        received: f64,
    },
    TooBig {
        kind: SizeKind,
        maximum: usize,
        received: usize,
    },
    TooSmall {
        kind: SizeKind,
        minimum: usize,
        received: usize,
    },
    UnrecognizedKeys {
        keys: Vec<String>,
    },
    MissingKeys {
        keys: Vec<String>,
    },
    InvalidKeyType {
        key: String,
        expected: String,
        received: String,
    },
}

impl Issue {
    pub fn code(&self) -> IssueCode {
        match self {
            Issue::InvalidType { .. } => IssueCode::InvalidType,
            Issue::InvalidString { .. } => IssueCode::InvalidString,
            Issue::NotWhole { .. } => IssueCode::NotWhole,
            Issue::TooBig { .. } => IssueCode::TooBig,
            Issue::TooSmall { .. } => IssueCode::TooSmall,
            Issue::UnrecognizedKeys { .. } => IssueCode::UnrecognizedKeys,
            Issue::MissingKeys { .. } => IssueCode::MissingKeys,
            Issue::InvalidKeyType { .. } => IssueCode::InvalidKeyType,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::InvalidType { expected, received } => write!(
                f,
                "Expected {}, received {}",
                expected.join(" | "),
                received
            ),
            Issue::InvalidString { expected, received } => {
                write!(f, "Invalid string: expected {}, received '{}'", expected, received)
            }
            Issue::NotWhole { received } => write!(f, "Expected a whole number, received {}", received),
            Issue::TooBig { kind, maximum, received } => write!(
                f,
                "Too many {}: expected at most {}, received {}",
                kind, maximum, received
            ),
            Issue::TooSmall { kind, minimum, received } => write!(
                f,
                "Too few {}: expected at least {}, received {}",
                kind, minimum, received
            ),
            Issue::UnrecognizedKeys { keys } => write!(f, "Unrecognized key(s): {}", keys.join(", ")),
            Issue::MissingKeys { keys } => write!(f, "Missing key(s): {}", keys.join(", ")),
            Issue::InvalidKeyType { key, expected, received } => write!(
                f,
                "Invalid type for key '{}': expected {}, received {}",
                key, expected, received
            ),
        }
    }
}

/// Failure of a parse or validation step, tagged with the value type that raised it.
#[derive(Debug, Clone, PartialEq)]
pub struct PgTypeError {
    pub type_name: String,
    pub issue: Issue,
}

pub type PgResult<T> = Result<T, PgTypeError>;

impl PgTypeError {
    pub fn new<T: Into<String>>(type_name: T, issue: Issue) -> Self {
        Self {
            type_name: type_name.into(),
            issue,
        }
    }

    pub fn code(&self) -> IssueCode {
        self.issue.code()
    }

    pub fn invalid_type_error<T: Into<String>, R: Into<String>>(type_name: T, expected: &[&str], received: R) -> Self {
        Self::new(type_name, Issue::InvalidType {
            expected: expected.iter().map(|e| e.to_string()).collect(),
            received: received.into(),
        })
    }

    pub fn invalid_string_error<T: Into<String>, E: Into<String>, R: Into<String>>(type_name: T, expected: E, received: R) -> Self {
        Self::new(type_name, Issue::InvalidString {
            expected: expected.into(),
            received: received.into(),
        })
    }

    pub fn not_whole_error<T: Into<String>>(type_name: T, received: f64) -> Self {
        Self::new(type_name, Issue::NotWhole { received })
    }

    pub fn too_big_error<T: Into<String>>(type_name: T, maximum: usize, received: usize) -> Self {
        Self::new(type_name, Issue::TooBig {
            kind: SizeKind::Arguments,
            maximum,
            received,
        })
    }

    pub fn too_small_error<T: Into<String>>(type_name: T, minimum: usize, received: usize) -> Self {
        Self::new(type_name, Issue::TooSmall {
            kind: SizeKind::Arguments,
            minimum,
            received,
        })
    }

    pub fn unrecognized_keys_error<T: Into<String>>(type_name: T, keys: Vec<String>) -> Self {
        Self::new(type_name, Issue::UnrecognizedKeys { keys })
    }

    pub fn invalid_key_type_error<T: Into<String>, K: Into<String>, E: Into<String>, R: Into<String>>(
        type_name: T,
        key: K,
        expected: E,
        received: R,
    ) -> Self {
        Self::new(type_name, Issue::InvalidKeyType {
            key: key.into(),
            expected: expected.into(),
            received: received.into(),
        })
    }
}

impl fmt::Display for PgTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.type_name, self.issue.code(), self.issue)
    }
}

impl std::error::Error for PgTypeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_codes() {
        let err = PgTypeError::too_small_error("Interval", 7, 3);
        assert_eq!(err.code(), IssueCode::TooSmall);
        assert_eq!(err.code().as_str(), "too_small");
        assert!(matches!(err.issue, Issue::TooSmall { kind: SizeKind::Arguments, minimum: 7, received: 3 }));
    }

    #[test]
    fn test_display() {
        let err = PgTypeError::invalid_string_error("Interval", "P1Y2M3DT4H5M6S", "nope");
        assert_eq!(
            err.to_string(),
            "Interval [invalid_string]: Invalid string: expected P1Y2M3DT4H5M6S, received 'nope'"
        );
        let err = PgTypeError::invalid_type_error("Interval", &["string", "object"], "boolean");
        assert_eq!(err.issue.to_string(), "Expected string | object, received boolean");
    }

    #[test]
    fn test_code_serializes_snake_case() {
        let json = serde_json::to_string(&IssueCode::UnrecognizedKeys).unwrap();
        assert_eq!(json, "\"unrecognized_keys\"");
    }
}
