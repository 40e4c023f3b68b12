//! Payload Schemas
//!
//! A small object-schema validation engine for JSON-like request and
//! response payloads.
//!
//! ## Features
//!
//! - **Value Rules**: type, array, null, negation and nested-schema checks
//! - **Properties**: required, optional and excluded properties with defaults
//! - **Schemas**: AND-combined properties with complete failure diagnostics
//! - **Collections**: classify a payload against several named shapes
//! - **Definitions**: declare collections in TOML or JSON files
//!
//! ## Architecture
//!
//! ```text
//! SchemaCollection ── name → Schema (first registered match wins)
//!   └── Schema ── every SchemaProperty must hold
//!         └── SchemaProperty ── any ValueRule may match (cheapest first)
//!               └── ValueRule ── Type | Array | Null | Inverse | SubSchema
//! ```
//!
//! Validation returns `Result<(), Failure>`; schemas hold no per-call state
//! and can be shared freely across threads.

pub mod builder;
pub mod collection;
pub mod config;
pub mod definition;
pub mod error;
pub mod property;
pub mod rule;
pub mod schema;
pub mod value;

pub use builder::{PropertyKind, SchemaBuilder, SchemaCollectionBuilder};
pub use collection::SchemaCollection;
pub use config::ValidatorConfig;
pub use definition::{CollectionDefinition, PropertyDefinition, RuleDefinition, SchemaDefinition};
pub use error::{Result, SchemaError};
pub use property::{Property, SchemaProperty};
pub use rule::{ArrayRule, ValueRule};
pub use schema::Schema;
pub use value::{failure_reason, BasicType, Failure, Validation};
