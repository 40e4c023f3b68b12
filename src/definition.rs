//! Declarative schema definitions
//!
//! Collections can be described in TOML or JSON documents and compiled into
//! a [`SchemaCollection`] through the builders.
//!
//! ## Example definition file (payloads.toml):
//! ```toml
//! [[schemas]]
//! name = "address"
//! properties = [
//!     { name = "city", rules = [{ rule = "type", of = "string" }] },
//! ]
//!
//! [[schemas]]
//! name = "person"
//! properties = [
//!     { name = "name", rules = [{ rule = "type", of = "string" }] },
//!     { name = "age", optional = true, default = 0, rules = [{ rule = "type", of = "number" }] },
//!     { name = "address", optional = true, rules = [{ rule = "schema", name = "address" }] },
//!     { name = "legacyFlag", excluded = true },
//! ]
//! ```
//!
//! `rule = "schema"` may only reference schemas defined earlier, so nested
//! schemas can never form a cycle.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use walkdir::WalkDir;

use crate::builder::{PropertyKind, SchemaBuilder};
use crate::collection::SchemaCollection;
use crate::error::{Result, SchemaError};
use crate::rule::ValueRule;
use crate::schema::Schema;
use crate::value::BasicType;

/// A document declaring any number of schemas
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionDefinition {
    #[serde(default)]
    pub schemas: Vec<SchemaDefinition>,
}

/// One named schema
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDefinition {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,
}

/// One property entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyDefinition {
    pub name: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Property must be absent
    #[serde(default)]
    pub excluded: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleDefinition>,
}

/// A value rule, tagged by `rule`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleDefinition {
    Type { of: BasicType },
    Array {
        #[serde(default)]
        items: Vec<RuleDefinition>,
    },
    Null,
    Not { inner: Box<RuleDefinition> },
    Schema { name: String },
}

impl RuleDefinition {
    fn compile(&self, owner: &str, known: &SchemaCollection) -> Result<ValueRule> {
        Ok(match self {
            RuleDefinition::Type { of } => ValueRule::of_type(*of),
            RuleDefinition::Array { items } => ValueRule::array_of(
                items
                    .iter()
                    .map(|item| item.compile(owner, known))
                    .collect::<Result<Vec<_>>>()?,
            ),
            RuleDefinition::Null => ValueRule::null(),
            RuleDefinition::Not { inner } => ValueRule::not(inner.compile(owner, known)?),
            RuleDefinition::Schema { name } => {
                let schema = known.get_shared(name).ok_or_else(|| {
                    SchemaError::UnknownSchemaReference {
                        schema: owner.to_string(),
                        reference: name.clone(),
                    }
                })?;
                ValueRule::schema(schema)
            }
        })
    }
}

impl SchemaDefinition {
    fn compile(&self, known: &SchemaCollection) -> Result<Schema> {
        let mut builder = SchemaBuilder::new();
        for property in &self.properties {
            let kind = if property.excluded {
                PropertyKind::Excluded
            } else {
                PropertyKind::Property
            };
            // Settings on an excluded entry are rejected by the builder.
            builder = builder.add_property_of_kind(property.name.clone(), kind)?;
            if property.optional {
                builder = builder.is_optional(true)?;
            }
            if let Some(default) = &property.default {
                builder = builder.with_default(default.clone())?;
            }
            for rule in &property.rules {
                builder = builder.add_value_validation(rule.compile(&self.name, known)?)?;
            }
        }
        builder.build()
    }
}

impl CollectionDefinition {
    /// Parse a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse a JSON document
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a single definition file, picking the format by extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let parsed: std::result::Result<Self, String> = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&content).map_err(|e| e.to_string()),
            Some("json") => serde_json::from_str(&content).map_err(|e| e.to_string()),
            _ => Err("expected a .toml or .json file".to_string()),
        };
        parsed.map_err(|message| SchemaError::InvalidDefinition {
            path: path.display().to_string(),
            message,
        })
    }

    /// Load a file, or every `.toml`/`.json` file under a directory in path order
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.is_file() {
            return Self::from_file(path);
        }

        if !path.exists() {
            return Err(SchemaError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("definition path {} does not exist", path.display()),
            )));
        }

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(path) {
            let entry = entry.map_err(std::io::Error::from)?;
            let file = entry.into_path();
            let is_definition = file
                .extension()
                .map(|ext| ext == "toml" || ext == "json")
                .unwrap_or(false);
            if file.is_file() && is_definition {
                files.push(file);
            }
        }
        files.sort();

        let mut merged = Self::default();
        for file in files {
            tracing::debug!(path = %file.display(), "loading schema definitions");
            merged.merge(Self::from_file(&file)?);
        }
        Ok(merged)
    }

    /// Append another document's schemas after this one's
    pub fn merge(&mut self, other: CollectionDefinition) {
        self.schemas.extend(other.schemas);
    }

    /// Compile every schema in order into a collection
    pub fn compile(&self) -> Result<SchemaCollection> {
        let mut collection = SchemaCollection::new();
        for definition in &self.schemas {
            if definition.name.is_empty() {
                return Err(SchemaError::EmptyName { what: "schema" });
            }
            let schema = definition.compile(&collection)?;
            tracing::debug!(
                schema = %definition.name,
                complexity = schema.complexity(),
                "compiled schema"
            );
            collection.add_schema(definition.name.clone(), schema)?;
        }
        Ok(collection)
    }
}
