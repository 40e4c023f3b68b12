//! Value rules
//!
//! A [`ValueRule`] is a predicate over one value. Rules carry a complexity
//! score used purely as an evaluation-order key: when several rules are
//! alternatives, the cheapest is tried first.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::schema::Schema;
use crate::value::{BasicType, Failure, Validation};

/// A single-value validation rule
#[derive(Debug, Clone)]
pub enum ValueRule {
    /// Value's runtime tag equals the expected one
    Type(BasicType),
    /// Value is an array whose elements each match one of the child rules
    Array(ArrayRule),
    /// Value is exactly `null`
    Null,
    /// Wrapped rule does not match
    Inverse(Box<ValueRule>),
    /// Value is an object conforming to a nested schema
    SubSchema(Arc<Schema>),
}

/// Child rules of an array check, sorted ascending by complexity
#[derive(Debug, Clone, Default)]
pub struct ArrayRule {
    items: Vec<ValueRule>,
}

impl ArrayRule {
    pub fn new(items: Vec<ValueRule>) -> Self {
        Self { items: sort_by_complexity(items) }
    }

    pub fn items(&self) -> &[ValueRule] {
        &self.items
    }

    fn check(&self, value: Option<&Value>) -> Validation {
        let Some(Value::Array(elements)) = value else {
            return Err(Failure::new("Supplied value was not an array"));
        };
        if self.items.is_empty() {
            return Ok(());
        }

        for (index, element) in elements.iter().enumerate() {
            let matched = self
                .items
                .iter()
                .any(|rule| rule.check(Some(element)).is_ok());
            if !matched {
                return Err(Failure::new(format!(
                    "Array value at index {} failed conditions [{}]",
                    index,
                    join_displays(&self.items),
                )));
            }
        }
        Ok(())
    }
}

impl ValueRule {
    /// Type check rule
    pub fn of_type(expected: BasicType) -> Self {
        ValueRule::Type(expected)
    }

    /// Array check accepting any contents
    pub fn array() -> Self {
        ValueRule::Array(ArrayRule::default())
    }

    /// Array check whose elements must each match one of `items`
    pub fn array_of(items: Vec<ValueRule>) -> Self {
        ValueRule::Array(ArrayRule::new(items))
    }

    pub fn null() -> Self {
        ValueRule::Null
    }

    /// Negation of `rule`
    pub fn not(rule: ValueRule) -> Self {
        ValueRule::Inverse(Box::new(rule))
    }

    /// Nested schema check
    pub fn schema(schema: impl Into<Arc<Schema>>) -> Self {
        ValueRule::SubSchema(schema.into())
    }

    /// Evaluation cost; always positive
    pub fn complexity(&self) -> usize {
        match self {
            ValueRule::Type(_) => 2,
            ValueRule::Array(array) => {
                2 + array.items.iter().map(ValueRule::complexity).sum::<usize>()
            }
            ValueRule::Null => 1,
            ValueRule::Inverse(inner) => 1 + inner.complexity(),
            ValueRule::SubSchema(schema) => schema.complexity(),
        }
    }

    /// Static description of what the rule accepts
    pub fn display_string(&self) -> String {
        match self {
            ValueRule::Type(expected) => format!("type '{}'", expected),
            ValueRule::Array(array) if array.items.is_empty() => "array".to_string(),
            ValueRule::Array(array) => format!("array of [{}]", join_displays(&array.items)),
            ValueRule::Null => "null".to_string(),
            ValueRule::Inverse(inner) => format!("not {}", inner.display_string()),
            ValueRule::SubSchema(schema) => schema.display_string(),
        }
    }

    /// Validate a possibly absent value
    pub fn check(&self, value: Option<&Value>) -> Validation {
        match self {
            ValueRule::Type(expected) => {
                let actual = BasicType::of(value);
                if actual == *expected {
                    Ok(())
                } else {
                    Err(Failure::new(format!(
                        "Value was of type '{}' when was expecting '{}'",
                        actual, expected
                    )))
                }
            }
            ValueRule::Array(array) => array.check(value),
            ValueRule::Null => match value {
                Some(Value::Null) => Ok(()),
                _ => Err(Failure::new(format!(
                    "Value was of type '{}' when was expecting null",
                    BasicType::of(value)
                ))),
            },
            ValueRule::Inverse(inner) => match inner.check(value) {
                Ok(()) => Err(Failure::new(format!("{} was valid", inner.display_string()))),
                Err(_) => Ok(()),
            },
            ValueRule::SubSchema(schema) => schema.validate(value.unwrap_or(&Value::Null)),
        }
    }

    pub fn is_value_valid(&self, value: Option<&Value>) -> bool {
        self.check(value).is_ok()
    }
}

impl fmt::Display for ValueRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_string())
    }
}

/// Stable ascending sort on complexity
pub(crate) fn sort_by_complexity(mut rules: Vec<ValueRule>) -> Vec<ValueRule> {
    rules.sort_by_key(ValueRule::complexity);
    rules
}

fn join_displays(rules: &[ValueRule]) -> String {
    rules
        .iter()
        .map(ValueRule::display_string)
        .collect::<Vec<_>>()
        .join(" | ")
}
