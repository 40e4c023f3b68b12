//! Runtime type tags and validation outcomes
//!
//! Payloads are plain `serde_json::Value`s. A value that is not there at all
//! (a missing property, an absent array slot) is passed around as `None` and
//! reports the `undefined` tag.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::SchemaError;

/// Basic runtime type of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BasicType {
    Undefined,
    Boolean,
    Number,
    String,
    Symbol,
    BigInt,
    Object,
    Function,
}

impl BasicType {
    /// All tags, in declaration order
    pub const ALL: [BasicType; 8] = [
        BasicType::Undefined,
        BasicType::Boolean,
        BasicType::Number,
        BasicType::String,
        BasicType::Symbol,
        BasicType::BigInt,
        BasicType::Object,
        BasicType::Function,
    ];

    /// Runtime tag of a (possibly absent) value.
    ///
    /// Follows `typeof` conventions: `null` and arrays are both `object`.
    /// JSON never produces `symbol`, `bigint` or `function`.
    pub fn of(value: Option<&Value>) -> Self {
        match value {
            None => BasicType::Undefined,
            Some(Value::Bool(_)) => BasicType::Boolean,
            Some(Value::Number(_)) => BasicType::Number,
            Some(Value::String(_)) => BasicType::String,
            Some(Value::Null | Value::Array(_) | Value::Object(_)) => BasicType::Object,
        }
    }

    /// The lowercase tag name
    pub fn as_str(&self) -> &'static str {
        match self {
            BasicType::Undefined => "undefined",
            BasicType::Boolean => "boolean",
            BasicType::Number => "number",
            BasicType::String => "string",
            BasicType::Symbol => "symbol",
            BasicType::BigInt => "bigint",
            BasicType::Object => "object",
            BasicType::Function => "function",
        }
    }
}

impl fmt::Display for BasicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BasicType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BasicType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownBasicType(s.to_string()))
    }
}

/// Why a value did not conform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    reason: String,
}

impl Failure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }

    /// Human-readable reason text
    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn into_reason(self) -> String {
        self.reason
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

impl std::error::Error for Failure {}

/// Outcome of a single validation call
pub type Validation = std::result::Result<(), Failure>;

/// Reason text of an outcome, empty on success
pub fn failure_reason(outcome: &Validation) -> &str {
    match outcome {
        Ok(()) => "",
        Err(failure) => failure.reason(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_of_json_values() {
        assert_eq!(BasicType::of(None), BasicType::Undefined);
        assert_eq!(BasicType::of(Some(&json!(true))), BasicType::Boolean);
        assert_eq!(BasicType::of(Some(&json!(1.5))), BasicType::Number);
        assert_eq!(BasicType::of(Some(&json!("x"))), BasicType::String);
        assert_eq!(BasicType::of(Some(&json!(null))), BasicType::Object);
        assert_eq!(BasicType::of(Some(&json!([1, 2]))), BasicType::Object);
        assert_eq!(BasicType::of(Some(&json!({"a": 1}))), BasicType::Object);
    }

    #[test]
    fn test_parse_tags() {
        for tag in BasicType::ALL {
            assert_eq!(tag.as_str().parse::<BasicType>().unwrap(), tag);
        }
        assert!(matches!(
            "integer".parse::<BasicType>(),
            Err(SchemaError::UnknownBasicType(t)) if t == "integer"
        ));
    }

    #[test]
    fn test_serde_tag_names() {
        let parsed: BasicType = serde_json::from_value(json!("bigint")).unwrap();
        assert_eq!(parsed, BasicType::BigInt);
        assert!(serde_json::from_value::<BasicType>(json!("float")).is_err());
    }

    #[test]
    fn test_failure_reason() {
        let ok: Validation = Ok(());
        assert_eq!(failure_reason(&ok), "");
        let err: Validation = Err(Failure::new("nope"));
        assert_eq!(failure_reason(&err), "nope");
    }
}
