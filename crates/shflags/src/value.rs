//! Flag types, typed values and the literal validators.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagType {
    Boolean,
    Integer,
    String,
}

impl FlagType {
    /// Whether the flag consumes an attached value on the command line.
    pub fn takes_value(self) -> bool {
        !matches!(self, Self::Boolean)
    }
}

impl fmt::Display for FlagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::String => "string",
        })
    }
}

/// A parsed or default flag value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Boolean(bool),
    Integer(i64),
    String(String),
}

impl FlagValue {
    /// Coerce a raw literal into a value of `flag_type`, or `None` if it is invalid.
    pub fn coerce(flag_type: FlagType, raw: &str) -> Option<Self> {
        match flag_type {
            FlagType::Boolean => normalize_boolean(raw).map(Self::Boolean),
            FlagType::Integer => parse_integer(raw).map(Self::Integer),
            FlagType::String => Some(Self::String(raw.to_string())),
        }
    }

    pub fn flag_type(&self) -> FlagType {
        match self {
            Self::Boolean(_) => FlagType::Boolean,
            Self::Integer(_) => FlagType::Integer,
            Self::String(_) => FlagType::String,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Rendering used by the usage text: `true`/`false`, integers as-is,
    /// strings single-quoted.
    pub fn help_display(&self) -> String {
        match self {
            Self::Boolean(b) => b.to_string(),
            Self::Integer(i) => i.to_string(),
            Self::String(s) => format!("'{s}'"),
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

/// Whether `v` is one of the accepted boolean literals.
///
/// `0` is true and `1` is false, matching shell exit-status semantics.
pub fn valid_boolean(v: &str) -> bool {
    normalize_boolean(v).is_some()
}

pub fn normalize_boolean(v: &str) -> Option<bool> {
    match v {
        "true" | "t" | "0" => Some(true),
        "false" | "f" | "1" => Some(false),
        _ => None,
    }
}

/// Whether `v` is an optionally negative run of decimal digits.
pub fn valid_integer(v: &str) -> bool {
    let digits = v.strip_prefix('-').unwrap_or(v);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn parse_integer(v: &str) -> Option<i64> {
    if !valid_integer(v) {
        return None;
    }
    v.parse().ok()
}
