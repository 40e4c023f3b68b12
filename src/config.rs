//! Configuration for the schema validator
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (validator.toml)
//! - Environment variables (SCHEMAS__*)
//!
//! ## Example config file (validator.toml):
//! ```toml
//! [definitions]
//! paths = ["schemas", "extra/payloads.toml"]
//!
//! [validation]
//! apply_defaults = true
//! report_failures = true
//!
//! [output]
//! format = "pretty"
//!
//! [search]
//! suggestion_limit = 3
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::collection::SchemaCollection;
use crate::definition::CollectionDefinition;

/// Main configuration for the validator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Where schema definitions live
    #[serde(default)]
    pub definitions: DefinitionsConfig,

    /// Validation behaviour
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Schema name search
    #[serde(default)]
    pub search: SearchConfig,
}

/// Definition sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefinitionsConfig {
    /// Files or directories, loaded in order
    #[serde(default = "default_definition_paths")]
    pub paths: Vec<PathBuf>,
}

/// Validation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Apply declared defaults before validating
    #[serde(default)]
    pub apply_defaults: bool,

    /// Print every schema's failure when nothing matches
    #[serde(default = "default_true")]
    pub report_failures: bool,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum "did you mean" suggestions
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
}

// Default value functions
fn default_definition_paths() -> Vec<PathBuf> {
    vec![PathBuf::from("schemas")]
}

fn default_true() -> bool {
    true
}

fn default_suggestion_limit() -> usize {
    3
}

impl Default for DefinitionsConfig {
    fn default() -> Self {
        Self {
            paths: default_definition_paths(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            apply_defaults: false,
            report_failures: true,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            suggestion_limit: default_suggestion_limit(),
        }
    }
}

impl ValidatorConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, layering a specific file over the defaults
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "validator.toml",
            ".validator.toml",
            "config/validator.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "payload", "schemas") {
            let xdg_config = config_dir.config_dir().join("validator.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // SCHEMAS__VALIDATION__APPLY_DEFAULTS=true etc.
        builder = builder.add_source(
            Environment::with_prefix("SCHEMAS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Definition paths with relative entries resolved against the working directory
    pub fn definition_paths(&self) -> std::io::Result<Vec<PathBuf>> {
        let paths = &self.definitions.paths;
        let cwd = if paths.iter().any(|p| !p.is_absolute()) {
            std::env::current_dir()?
        } else {
            PathBuf::new()
        };
        Ok(paths
            .iter()
            .map(|p| if p.is_absolute() { p.clone() } else { cwd.join(p) })
            .collect())
    }

    /// Load and compile every configured definition source
    pub fn load_collection(&self) -> crate::Result<SchemaCollection> {
        let mut definition = CollectionDefinition::default();
        for path in self.definition_paths()? {
            tracing::debug!(path = %path.display(), "reading definitions");
            definition.merge(CollectionDefinition::load(&path)?);
        }
        definition.compile()
    }
}
