//! Schema properties
//!
//! A property binds a name to a set of alternative value rules (any one may
//! match), or asserts that a name must not appear at all.

use std::fmt;

use serde_json::{Map, Value};

use crate::rule::{sort_by_complexity, ValueRule};
use crate::value::{Failure, Validation};

/// A named slot in a schema
#[derive(Debug, Clone)]
pub enum SchemaProperty {
    /// Property that must (or may) be present with a matching value
    Property(Property),
    /// Property that must be absent
    Excluded(String),
}

/// Declared property with OR-combined rules
#[derive(Debug, Clone)]
pub struct Property {
    name: String,
    rules: Vec<ValueRule>,
    optional: bool,
    default: Option<Value>,
}

impl Property {
    /// Create a property; `rules` are re-ordered ascending by complexity
    pub fn new(
        name: impl Into<String>,
        rules: Vec<ValueRule>,
        optional: bool,
        default: Option<Value>,
    ) -> Self {
        Self {
            name: name.into(),
            rules: sort_by_complexity(rules),
            optional,
            default,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[ValueRule] {
        &self.rules
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Default value; `None` means no default (undefined)
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    fn check(&self, object: &Value) -> Validation {
        let Some(value) = field(object, &self.name) else {
            if self.optional {
                return Ok(());
            }
            return Err(Failure::new(format!(
                "Value is missing property '{}'",
                self.name
            )));
        };
        if self.rules.is_empty() {
            return Ok(());
        }

        let mut reasons = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            match rule.check(Some(value)) {
                Ok(()) => return Ok(()),
                Err(failure) => reasons.push(failure.into_reason()),
            }
        }
        Err(Failure::new(format!(
            "'{}' failed conditions [{}]",
            self.name,
            reasons.join(" | ")
        )))
    }

    fn display_string(&self) -> String {
        let rules = self
            .rules
            .iter()
            .map(ValueRule::display_string)
            .collect::<Vec<_>>()
            .join(" | ");
        let mut out = format!("{}: [{}]", self.name, rules);
        if self.optional {
            out.push_str(" (optional)");
        }
        if let Some(default) = &self.default {
            out.push_str(&format!(" (default {})", default));
        }
        out
    }
}

impl SchemaProperty {
    /// Required property with no rules: presence alone suffices
    pub fn required(name: impl Into<String>) -> Self {
        SchemaProperty::Property(Property::new(name, Vec::new(), false, None))
    }

    /// Property that must not be present
    pub fn excluded(name: impl Into<String>) -> Self {
        SchemaProperty::Excluded(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            SchemaProperty::Property(property) => property.name(),
            SchemaProperty::Excluded(name) => name,
        }
    }

    pub fn complexity(&self) -> usize {
        match self {
            SchemaProperty::Property(property) => {
                1 + property.rules.iter().map(ValueRule::complexity).sum::<usize>()
            }
            SchemaProperty::Excluded(_) => 1,
        }
    }

    pub fn display_string(&self) -> String {
        match self {
            SchemaProperty::Property(property) => property.display_string(),
            SchemaProperty::Excluded(name) => format!("{}: excluded", name),
        }
    }

    /// Check this property against an object.
    ///
    /// Non-object values have no properties.
    pub fn validate(&self, object: &Value) -> Validation {
        match self {
            SchemaProperty::Property(property) => property.check(object),
            SchemaProperty::Excluded(name) => match field(object, name) {
                None => Ok(()),
                Some(_) => Err(Failure::new(format!(
                    "Value has excluded property '{}'",
                    name
                ))),
            },
        }
    }

    pub fn is_valid(&self, object: &Value) -> bool {
        self.validate(object).is_ok()
    }

    /// Repair the object in place when this property does not hold.
    ///
    /// A declared property gets its default (or is removed when there is no
    /// default); an excluded property is removed.
    pub fn apply_default(&self, object: &mut Value) {
        if self.is_valid(object) {
            return;
        }
        let Some(map) = object.as_object_mut() else {
            tracing::trace!(property = self.name(), "skipping default on non-object value");
            return;
        };
        match self {
            SchemaProperty::Property(property) => {
                set_or_remove(map, &property.name, property.default.clone());
            }
            SchemaProperty::Excluded(name) => {
                map.remove(name);
            }
        }
    }
}

impl From<Property> for SchemaProperty {
    fn from(property: Property) -> Self {
        SchemaProperty::Property(property)
    }
}

impl fmt::Display for SchemaProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_string())
    }
}

fn field<'a>(object: &'a Value, name: &str) -> Option<&'a Value> {
    object.as_object().and_then(|map| map.get(name))
}

fn set_or_remove(map: &mut Map<String, Value>, name: &str, value: Option<Value>) {
    match value {
        Some(value) => {
            tracing::trace!(property = name, "applying default");
            map.insert(name.to_string(), value);
        }
        None => {
            map.remove(name);
        }
    }
}
