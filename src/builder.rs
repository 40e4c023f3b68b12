//! Fluent builders for schemas and schema collections
//!
//! Builders stage at most one open schema and one open property at a time.
//! Opening a new property (or schema) flushes whatever was pending. Each step
//! consumes the builder and hands it back, so errors surface through `?` and
//! a finished builder cannot be reused.
//!
//! ```
//! use payload_schemas::{BasicType, SchemaBuilder, ValueRule};
//! use serde_json::json;
//!
//! let schema = SchemaBuilder::new()
//!     .add_property("name")?
//!     .add_value_validation(ValueRule::of_type(BasicType::String))?
//!     .add_property("age")?
//!     .is_optional(true)?
//!     .add_value_validation(ValueRule::of_type(BasicType::Number))?
//!     .build()?;
//!
//! assert!(schema.is_valid(&json!({"name": "Ann"})));
//! # Ok::<(), payload_schemas::SchemaError>(())
//! ```

use serde_json::Value;

use crate::collection::SchemaCollection;
use crate::error::{Result, SchemaError};
use crate::property::{Property, SchemaProperty};
use crate::rule::ValueRule;
use crate::schema::Schema;

/// Which property variant to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertyKind {
    #[default]
    Property,
    Excluded,
}

/// Property staged in a builder
#[derive(Debug)]
enum PendingProperty {
    Property {
        name: String,
        optional: bool,
        default: Option<Value>,
        rules: Vec<ValueRule>,
    },
    Excluded(String),
}

impl PendingProperty {
    fn open(name: String, kind: PropertyKind) -> Self {
        match kind {
            PropertyKind::Property => PendingProperty::Property {
                name,
                optional: false,
                default: None,
                rules: Vec::new(),
            },
            PropertyKind::Excluded => PendingProperty::Excluded(name),
        }
    }

    fn finish(self) -> SchemaProperty {
        match self {
            PendingProperty::Property { name, optional, default, rules } => {
                Property::new(name, rules, optional, default).into()
            }
            PendingProperty::Excluded(name) => SchemaProperty::excluded(name),
        }
    }
}

/// Builds a single [`Schema`]
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    properties: Vec<SchemaProperty>,
    pending: Option<PendingProperty>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a regular property
    pub fn add_property(self, name: impl Into<String>) -> Result<Self> {
        self.add_property_of_kind(name, PropertyKind::Property)
    }

    /// Open a property that must be absent
    pub fn add_excluded_property(self, name: impl Into<String>) -> Result<Self> {
        self.add_property_of_kind(name, PropertyKind::Excluded)
    }

    pub fn add_property_of_kind(mut self, name: impl Into<String>, kind: PropertyKind) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(SchemaError::EmptyName { what: "property" });
        }
        self.flush();
        self.pending = Some(PendingProperty::open(name, kind));
        Ok(self)
    }

    pub fn is_optional(mut self, optional: bool) -> Result<Self> {
        let (flag, _, _) = self.open_property("is_optional")?;
        *flag = optional;
        Ok(self)
    }

    pub fn with_default(mut self, value: Value) -> Result<Self> {
        let (_, default, _) = self.open_property("with_default")?;
        *default = Some(value);
        Ok(self)
    }

    /// Add an alternative rule to the open property
    pub fn add_value_validation(mut self, rule: ValueRule) -> Result<Self> {
        let (_, _, rules) = self.open_property("add_value_validation")?;
        rules.push(rule);
        Ok(self)
    }

    /// Flush the open property and construct the schema
    pub fn build(mut self) -> Result<Schema> {
        self.flush();
        Schema::new(self.properties)
    }

    fn flush(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.properties.push(pending.finish());
        }
    }

    fn open_property(
        &mut self,
        operation: &'static str,
    ) -> Result<(&mut bool, &mut Option<Value>, &mut Vec<ValueRule>)> {
        match self.pending.as_mut() {
            None => Err(SchemaError::NoOpenProperty { operation }),
            Some(PendingProperty::Excluded(name)) => Err(SchemaError::WrongPropertyKind {
                operation,
                name: name.clone(),
            }),
            Some(PendingProperty::Property { optional, default, rules, .. }) => {
                Ok((optional, default, rules))
            }
        }
    }
}

/// Builds a [`SchemaCollection`]
#[derive(Debug, Default)]
pub struct SchemaCollectionBuilder {
    collection: SchemaCollection,
    pending: Option<(String, SchemaBuilder)>,
}

impl SchemaCollectionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finish the open schema (if any) and open a new one under `name`
    pub fn add_schema(mut self, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(SchemaError::EmptyName { what: "schema" });
        }
        self.flush()?;
        self.pending = Some((name, SchemaBuilder::new()));
        Ok(self)
    }

    pub fn add_property(self, name: impl Into<String>) -> Result<Self> {
        self.add_property_of_kind(name, PropertyKind::Property)
    }

    pub fn add_excluded_property(self, name: impl Into<String>) -> Result<Self> {
        self.add_property_of_kind(name, PropertyKind::Excluded)
    }

    pub fn add_property_of_kind(self, name: impl Into<String>, kind: PropertyKind) -> Result<Self> {
        let name = name.into();
        self.step("add_property", |builder| builder.add_property_of_kind(name, kind))
    }

    pub fn is_optional(self, optional: bool) -> Result<Self> {
        self.step("is_optional", |builder| builder.is_optional(optional))
    }

    pub fn with_default(self, value: Value) -> Result<Self> {
        self.step("with_default", |builder| builder.with_default(value))
    }

    pub fn add_value_validation(self, rule: ValueRule) -> Result<Self> {
        self.step("add_value_validation", |builder| builder.add_value_validation(rule))
    }

    /// Flush everything pending and return the collection
    pub fn build(mut self) -> Result<SchemaCollection> {
        self.flush()?;
        Ok(self.collection)
    }

    fn step(
        mut self,
        operation: &'static str,
        apply: impl FnOnce(SchemaBuilder) -> Result<SchemaBuilder>,
    ) -> Result<Self> {
        let (name, builder) = self
            .pending
            .take()
            .ok_or(SchemaError::NoOpenSchema { operation })?;
        self.pending = Some((name, apply(builder)?));
        Ok(self)
    }

    fn flush(&mut self) -> Result<()> {
        if let Some((name, builder)) = self.pending.take() {
            let schema = builder.build()?;
            self.collection.add_schema(name, schema)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::BasicType;
    use serde_json::json;

    #[test]
    fn test_build_person_schema() {
        let schema = SchemaBuilder::new()
            .add_property("name")
            .unwrap()
            .add_value_validation(ValueRule::of_type(BasicType::String))
            .unwrap()
            .add_property("age")
            .unwrap()
            .is_optional(true)
            .unwrap()
            .add_value_validation(ValueRule::of_type(BasicType::Number))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(schema.properties().len(), 2);
        assert!(schema.is_valid(&json!({"name": "Ann", "age": 30})));
        assert!(schema.is_valid(&json!({"name": "Ann"})));
        assert!(!schema.is_valid(&json!({"age": 30})));
    }

    #[test]
    fn test_empty_builder_fails() {
        assert!(matches!(SchemaBuilder::new().build(), Err(SchemaError::EmptySchema)));
    }

    #[test]
    fn test_empty_property_name_fails() {
        let result = SchemaBuilder::new().add_property("");
        assert!(matches!(result, Err(SchemaError::EmptyName { what: "property" })));
    }

    #[test]
    fn test_settings_require_open_property() {
        assert!(matches!(
            SchemaBuilder::new().is_optional(true),
            Err(SchemaError::NoOpenProperty { operation: "is_optional" })
        ));
        assert!(matches!(
            SchemaBuilder::new().with_default(json!(1)),
            Err(SchemaError::NoOpenProperty { operation: "with_default" })
        ));
        assert!(matches!(
            SchemaBuilder::new().add_value_validation(ValueRule::null()),
            Err(SchemaError::NoOpenProperty { .. })
        ));
    }

    #[test]
    fn test_settings_rejected_on_excluded_property() {
        let result = SchemaBuilder::new()
            .add_excluded_property("legacy")
            .unwrap()
            .with_default(json!(true));
        assert!(matches!(
            result,
            Err(SchemaError::WrongPropertyKind { name, .. }) if name == "legacy"
        ));
    }

    #[test]
    fn test_multiple_validations_accumulate() {
        let schema = SchemaBuilder::new()
            .add_property("id")
            .unwrap()
            .add_value_validation(ValueRule::of_type(BasicType::String))
            .unwrap()
            .add_value_validation(ValueRule::of_type(BasicType::Number))
            .unwrap()
            .with_default(json!(0))
            .unwrap()
            .build()
            .unwrap();

        assert!(schema.is_valid(&json!({"id": "a"})));
        assert!(schema.is_valid(&json!({"id": 1})));
        assert!(!schema.is_valid(&json!({"id": null})));

        let mut payload = json!({"id": null});
        schema.apply_default_properties(&mut payload);
        assert_eq!(payload, json!({"id": 0}));
    }

    #[test]
    fn test_collection_builder() {
        let collection = SchemaCollectionBuilder::new()
            .add_schema("greeting")
            .unwrap()
            .add_property("message")
            .unwrap()
            .add_value_validation(ValueRule::of_type(BasicType::String))
            .unwrap()
            .add_excluded_property("items")
            .unwrap()
            .add_schema("batch")
            .unwrap()
            .add_property("items")
            .unwrap()
            .add_value_validation(ValueRule::array())
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(collection.schema_keys(), vec!["greeting", "batch"]);
        assert_eq!(
            collection.validate_object_schema(&json!({"message": "hi"})),
            Some("greeting")
        );
        assert_eq!(
            collection.validate_object_schema(&json!({"message": "hi", "items": []})),
            Some("batch")
        );
    }

    #[test]
    fn test_collection_builder_requires_open_schema() {
        assert!(matches!(
            SchemaCollectionBuilder::new().add_property("x"),
            Err(SchemaError::NoOpenSchema { operation: "add_property" })
        ));
        assert!(matches!(
            SchemaCollectionBuilder::new().add_schema(""),
            Err(SchemaError::EmptyName { what: "schema" })
        ));
    }

    #[test]
    fn test_collection_builder_surfaces_schema_errors() {
        let empty = SchemaCollectionBuilder::new()
            .add_schema("a")
            .unwrap()
            .add_schema("b");
        assert!(matches!(empty, Err(SchemaError::EmptySchema)));

        let duplicate = SchemaCollectionBuilder::new()
            .add_schema("a")
            .unwrap()
            .add_property("x")
            .unwrap()
            .add_schema("a")
            .unwrap()
            .add_property("y")
            .unwrap()
            .build();
        assert!(matches!(duplicate, Err(SchemaError::DuplicateSchema(k)) if k == "a"));
    }

    #[test]
    fn test_collection_builder_empty_is_ok() {
        let collection = SchemaCollectionBuilder::new().build().unwrap();
        assert!(collection.is_empty());
    }
}
