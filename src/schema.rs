//! Schema: an AND-combination of properties describing one object shape

use std::fmt;

use serde_json::Value;

use crate::error::{Result, SchemaError};
use crate::property::SchemaProperty;
use crate::value::{Failure, Validation};

/// A complete object shape
#[derive(Debug, Clone)]
pub struct Schema {
    properties: Vec<SchemaProperty>,
    complexity: usize,
}

impl Schema {
    /// Create a schema from a non-empty, ordered property list.
    ///
    /// Duplicate names are kept; every entry is evaluated.
    pub fn new(properties: Vec<SchemaProperty>) -> Result<Self> {
        if properties.is_empty() {
            return Err(SchemaError::EmptySchema);
        }
        let complexity = 1 + properties.iter().map(SchemaProperty::complexity).sum::<usize>();
        Ok(Self { properties, complexity })
    }

    pub fn properties(&self) -> &[SchemaProperty] {
        &self.properties
    }

    pub fn complexity(&self) -> usize {
        self.complexity
    }

    /// Validate every property; the failure lists all failing properties
    /// in declaration order, one per line.
    pub fn validate(&self, object: &Value) -> Validation {
        let reasons: Vec<String> = self
            .properties
            .iter()
            .filter_map(|property| property.validate(object).err())
            .map(Failure::into_reason)
            .collect();

        if reasons.is_empty() {
            Ok(())
        } else {
            Err(Failure::new(reasons.join("\n")))
        }
    }

    pub fn is_valid(&self, object: &Value) -> bool {
        self.validate(object).is_ok()
    }

    /// Apply every property's default in declaration order.
    ///
    /// Does not validate afterwards.
    pub fn apply_default_properties(&self, object: &mut Value) {
        for property in &self.properties {
            property.apply_default(object);
        }
    }

    pub fn display_string(&self) -> String {
        let properties = self
            .properties
            .iter()
            .map(SchemaProperty::display_string)
            .collect::<Vec<_>>()
            .join("; ");
        format!("{{ {} }}", properties)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::Property;
    use crate::rule::ValueRule;
    use crate::value::BasicType;
    use serde_json::json;

    fn person() -> Schema {
        Schema::new(vec![
            Property::new("name", vec![ValueRule::of_type(BasicType::String)], false, None).into(),
            Property::new("age", vec![ValueRule::of_type(BasicType::Number)], true, None).into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_schema_rejected() {
        assert!(matches!(Schema::new(Vec::new()), Err(SchemaError::EmptySchema)));
    }

    #[test]
    fn test_complexity() {
        // 1 + (1 + 2) + (1 + 2)
        assert_eq!(person().complexity(), 7);
    }

    #[test]
    fn test_and_semantics_collects_all_failures() {
        let schema = Schema::new(vec![
            SchemaProperty::required("id"),
            Property::new("kind", vec![ValueRule::of_type(BasicType::String)], false, None).into(),
            SchemaProperty::excluded("legacy"),
        ])
        .unwrap();

        assert!(schema.is_valid(&json!({"id": 1, "kind": "a"})));

        let failure = schema.validate(&json!({"kind": 2, "legacy": true})).unwrap_err();
        assert_eq!(
            failure.reason(),
            "Value is missing property 'id'\n\
             'kind' failed conditions [Value was of type 'number' when was expecting 'string']\n\
             Value has excluded property 'legacy'"
        );
    }

    #[test]
    fn test_validation_is_repeatable() {
        let schema = person();
        let payload = json!({"age": "x"});
        let first = schema.validate(&payload);
        let second = schema.validate(&payload);
        assert_eq!(first, second);
        assert!(first.is_err());
    }

    #[test]
    fn test_duplicate_names_all_evaluated() {
        let schema = Schema::new(vec![
            Property::new("v", vec![ValueRule::of_type(BasicType::Number)], false, None).into(),
            Property::new("v", vec![ValueRule::of_type(BasicType::String)], false, None).into(),
        ])
        .unwrap();
        assert!(!schema.is_valid(&json!({"v": 1})));
        assert!(!schema.is_valid(&json!({"v": "1"})));
    }

    #[test]
    fn test_apply_defaults_then_validate() {
        let schema = Schema::new(vec![
            Property::new(
                "count",
                vec![ValueRule::of_type(BasicType::Number)],
                false,
                Some(json!(0)),
            )
            .into(),
            Property::new(
                "label",
                vec![ValueRule::of_type(BasicType::String)],
                false,
                Some(json!("none")),
            )
            .into(),
            SchemaProperty::excluded("debug"),
        ])
        .unwrap();

        let mut payload = json!({"label": 4, "debug": true});
        assert!(!schema.is_valid(&payload));
        schema.apply_default_properties(&mut payload);
        assert_eq!(payload, json!({"count": 0, "label": "none"}));
        assert!(schema.is_valid(&payload));
    }

    #[test]
    fn test_display_string() {
        assert_eq!(
            person().to_string(),
            "{ name: [type 'string']; age: [type 'number'] (optional) }"
        );
    }
}
