//! Tenant-scoped configuration entries with a typed-value discriminator.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Discriminator describing how a stored setting value must be interpreted.
///
/// Closed set; parsing any other string fails with `InvalidValueType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Bool,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "string" => Ok(Self::String),
            "bool" => Ok(Self::Bool),
            other => Err(Error::InvalidValueType(other.to_owned())),
        }
    }
}

/// A configuration row.
///
/// `locked` is recorded at write time but not enforced by the store; if a
/// locked key must refuse overwrites, that policy belongs to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub value_type: ValueType,
    pub locked: bool,
    /// Principal that wrote the row, taken from the unit of work.
    pub created_by: String,
}

impl Setting {
    /// Read the value as a string. Hard failure unless the discriminator
    /// says `string`.
    pub fn as_string(&self) -> Result<&str> {
        match self.value_type {
            ValueType::String => Ok(&self.value),
            actual => Err(Error::TypeMismatch {
                key: self.key.clone(),
                expected: ValueType::String,
                actual,
            }),
        }
    }

    /// Read the value as a bool.
    ///
    /// Returns true only when the discriminator is `bool` and the stored
    /// text is exactly `"true"`. Every other case, including a type
    /// mismatch, yields `false` rather than an error. Existing callers
    /// depend on this soft fallback, so it stays asymmetric with
    /// `as_string` on purpose.
    pub fn as_bool(&self) -> bool {
        self.value_type == ValueType::Bool && self.value == "true"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setting(value: &str, value_type: ValueType) -> Setting {
        Setting {
            key: "feature".into(),
            value: value.into(),
            value_type,
            locked: false,
            created_by: "tests".into(),
        }
    }

    #[test]
    fn value_type_parses_known_values() {
        assert_eq!("string".parse::<ValueType>().unwrap(), ValueType::String);
        assert_eq!("bool".parse::<ValueType>().unwrap(), ValueType::Bool);
    }

    #[test]
    fn value_type_rejects_unknown_value() {
        let err = "int".parse::<ValueType>().unwrap_err();
        assert!(matches!(err, Error::InvalidValueType(s) if s == "int"));
    }

    #[test]
    fn as_string_matches_discriminator() {
        assert_eq!(setting("hi", ValueType::String).as_string().unwrap(), "hi");
    }

    #[test]
    fn as_string_hard_fails_on_mismatch() {
        let err = setting("true", ValueType::Bool).as_string().unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn as_bool_true_only_for_literal_true() {
        assert!(setting("true", ValueType::Bool).as_bool());
        assert!(!setting("false", ValueType::Bool).as_bool());
        assert!(!setting("TRUE", ValueType::Bool).as_bool());
        assert!(!setting("1", ValueType::Bool).as_bool());
    }

    #[test]
    fn as_bool_soft_falls_back_on_mismatch() {
        // Wrong discriminator is not an error, just false.
        assert!(!setting("true", ValueType::String).as_bool());
    }
}
