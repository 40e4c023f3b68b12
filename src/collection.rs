//! Schema Collection
//!
//! A named registry of schemas used to classify an object against several
//! shapes. Registration order is significant: the first matching schema wins.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{Result, SchemaError};
use crate::schema::Schema;
use crate::value::Failure;

/// Registry of named schemas, in registration order
#[derive(Debug, Clone, Default)]
pub struct SchemaCollection {
    schemas: IndexMap<String, Arc<Schema>>,
}

impl SchemaCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema; fails if the key is taken
    pub fn add_schema(&mut self, key: impl Into<String>, schema: impl Into<Arc<Schema>>) -> Result<()> {
        let key = key.into();
        if self.schemas.contains_key(&key) {
            return Err(SchemaError::DuplicateSchema(key));
        }
        self.schemas.insert(key, schema.into());
        Ok(())
    }

    /// Insert or overwrite a schema. An existing key keeps its position.
    pub fn replace_schema(&mut self, key: impl Into<String>, schema: impl Into<Arc<Schema>>) {
        self.schemas.insert(key.into(), schema.into());
    }

    /// Remove a schema, returning whether one was registered
    pub fn remove_schema(&mut self, key: &str) -> bool {
        self.schemas.shift_remove(key).is_some()
    }

    pub fn has_schema(&self, key: &str) -> bool {
        self.schemas.contains_key(key)
    }

    pub fn get_schema(&self, key: &str) -> Option<&Schema> {
        self.schemas.get(key).map(Arc::as_ref)
    }

    /// Shared handle to a schema, for nesting it inside another one
    pub fn get_shared(&self, key: &str) -> Option<Arc<Schema>> {
        self.schemas.get(key).cloned()
    }

    /// Keys in registration order
    pub fn schema_keys(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.schemas.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Key of the first registered schema the object conforms to
    pub fn validate_object_schema(&self, object: &Value) -> Option<&str> {
        let matched = self
            .schemas
            .iter()
            .find(|(_, schema)| schema.is_valid(object))
            .map(|(key, _)| key.as_str());
        tracing::debug!(matched = ?matched, candidates = self.schemas.len(), "classified object");
        matched
    }

    /// Every schema's verdict for the object, in registration order
    pub fn failures(&self, object: &Value) -> Vec<(&str, Option<Failure>)> {
        self.schemas
            .iter()
            .map(|(key, schema)| (key.as_str(), schema.validate(object).err()))
            .collect()
    }

    /// Registered keys ranked by fuzzy similarity to `query`
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<&str> {
        use fuzzy_matcher::skim::SkimMatcherV2;
        use fuzzy_matcher::FuzzyMatcher;

        let matcher = SkimMatcherV2::default().ignore_case();
        let mut results: Vec<(i64, &str)> = self
            .schemas
            .keys()
            .filter_map(|key| {
                matcher
                    .fuzzy_match(key, query)
                    .map(|score| (score, key.as_str()))
            })
            .collect();

        results.sort_by(|a, b| b.0.cmp(&a.0));
        results.into_iter().take(limit).map(|(_, key)| key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{Property, SchemaProperty};
    use crate::rule::ValueRule;
    use crate::value::BasicType;
    use serde_json::json;

    fn requires(name: &str) -> Schema {
        Schema::new(vec![SchemaProperty::required(name)]).unwrap()
    }

    #[test]
    fn test_add_rejects_duplicates() {
        let mut collection = SchemaCollection::new();
        collection.add_schema("a", requires("x")).unwrap();
        let result = collection.add_schema("a", requires("y"));
        assert!(matches!(result, Err(SchemaError::DuplicateSchema(k)) if k == "a"));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_replace_is_upsert() {
        let mut collection = SchemaCollection::new();
        collection.replace_schema("a", requires("x"));
        collection.replace_schema("b", requires("y"));
        collection.replace_schema("a", requires("z"));

        assert_eq!(collection.schema_keys(), vec!["a", "b"]);
        assert!(collection.get_schema("a").unwrap().is_valid(&json!({"z": 1})));
    }

    #[test]
    fn test_remove_and_lookup() {
        let mut collection = SchemaCollection::new();
        collection.add_schema("a", requires("x")).unwrap();
        collection.add_schema("b", requires("y")).unwrap();
        collection.add_schema("c", requires("z")).unwrap();

        assert!(collection.remove_schema("b"));
        assert!(!collection.remove_schema("b"));
        assert!(!collection.has_schema("b"));
        assert!(collection.get_schema("b").is_none());
        assert_eq!(collection.schema_keys(), vec!["a", "c"]);
    }

    #[test]
    fn test_first_registered_match_wins() {
        let mut collection = SchemaCollection::new();
        collection.add_schema("zeta", requires("id")).unwrap();
        collection.add_schema("alpha", requires("id")).unwrap();

        assert_eq!(collection.validate_object_schema(&json!({"id": 1})), Some("zeta"));
        assert_eq!(collection.validate_object_schema(&json!({})), None);
    }

    #[test]
    fn test_classify_distinguishes_shapes() {
        let mut collection = SchemaCollection::new();
        collection
            .add_schema(
                "text",
                Schema::new(vec![Property::new(
                    "body",
                    vec![ValueRule::of_type(BasicType::String)],
                    false,
                    None,
                )
                .into()])
                .unwrap(),
            )
            .unwrap();
        collection
            .add_schema(
                "list",
                Schema::new(vec![Property::new("body", vec![ValueRule::array()], false, None).into()])
                    .unwrap(),
            )
            .unwrap();

        assert_eq!(collection.validate_object_schema(&json!({"body": "hi"})), Some("text"));
        assert_eq!(collection.validate_object_schema(&json!({"body": []})), Some("list"));

        let failures = collection.failures(&json!({"body": 1}));
        assert_eq!(failures.len(), 2);
        assert!(failures.iter().all(|(_, f)| f.is_some()));
    }

    #[test]
    fn test_suggest() {
        let mut collection = SchemaCollection::new();
        collection.add_schema("createUser", requires("a")).unwrap();
        collection.add_schema("deleteUser", requires("a")).unwrap();
        collection.add_schema("listOrders", requires("a")).unwrap();

        let suggestions = collection.suggest("creatuser", 2);
        assert_eq!(suggestions.first(), Some(&"createUser"));
        assert!(!suggestions.contains(&"listOrders"));
    }
}
