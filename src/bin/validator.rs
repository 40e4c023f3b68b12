//! Schema Validator CLI
//!
//! Validates and classifies JSON payloads against schema definitions.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use payload_schemas::config::OutputFormat;
use payload_schemas::{CollectionDefinition, SchemaCollection, ValidatorConfig};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-validator")]
#[command(about = "Validate JSON payloads against schema definitions")]
struct Cli {
    /// Config file (defaults to validator.toml and friends)
    #[arg(short, long)]
    config: Option<String>,

    /// Definition file or directory; overrides the configured paths
    #[arg(short, long)]
    definitions: Vec<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered schemas in classification order
    List,

    /// Show what a schema accepts
    Describe {
        name: String,
    },

    /// Validate a payload against one schema
    Check {
        /// JSON payload file
        payload: PathBuf,
        /// Schema name
        #[arg(short, long)]
        schema: String,
        /// Apply declared defaults before validating
        #[arg(long)]
        apply_defaults: bool,
        /// Write the (defaulted) payload here
        #[arg(short, long)]
        write: Option<PathBuf>,
    },

    /// Find the first schema a payload matches
    Classify {
        payload: PathBuf,
        #[arg(long)]
        apply_defaults: bool,
    },

    /// Classify several payloads and emit a JSON report
    Report {
        payloads: Vec<PathBuf>,
        /// Output file (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether every payload conformed
fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = ValidatorConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?;
    let collection = load_collection(&config, &cli.definitions)?;

    match cli.command {
        Commands::List => {
            for (name, schema) in collection.iter() {
                println!("{:<32} complexity {}", name, schema.complexity());
            }
            Ok(true)
        }

        Commands::Describe { name } => {
            let schema = lookup(&collection, &config, &name)?;
            println!("{} {}", name, schema.display_string());
            Ok(true)
        }

        Commands::Check { payload, schema, apply_defaults, write } => {
            let target = lookup(&collection, &config, &schema)?;
            let mut value = read_payload(&payload)?;
            if apply_defaults || config.validation.apply_defaults {
                target.apply_default_properties(&mut value);
            }

            let outcome = target.validate(&value);
            if let Some(path) = write {
                std::fs::write(&path, render(&value, config.output.format)?)
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }

            match outcome {
                Ok(()) => {
                    println!("✅ {} conforms to '{}'", payload.display(), schema);
                    Ok(true)
                }
                Err(failure) => {
                    println!("❌ {} does not conform to '{}'", payload.display(), schema);
                    for line in failure.reason().lines() {
                        println!("   └─ {}", line);
                    }
                    Ok(false)
                }
            }
        }

        Commands::Classify { payload, apply_defaults } => {
            let value = read_payload(&payload)?;
            let apply = apply_defaults || config.validation.apply_defaults;
            match classify(&collection, &value, apply) {
                Some(name) => {
                    println!("✅ {} matches '{}'", payload.display(), name);
                    Ok(true)
                }
                None => {
                    println!("❌ {} matches no schema", payload.display());
                    if config.validation.report_failures {
                        for (name, failure) in collection.failures(&value) {
                            if let Some(failure) = failure {
                                println!("  {}", name);
                                for line in failure.reason().lines() {
                                    println!("    └─ {}", line);
                                }
                            }
                        }
                    }
                    Ok(false)
                }
            }
        }

        Commands::Report { payloads, output } => {
            let mut results = serde_json::Map::new();
            let mut all_matched = true;
            for path in &payloads {
                let value = read_payload(path)?;
                let matched = classify(&collection, &value, config.validation.apply_defaults);
                all_matched &= matched.is_some();
                results.insert(path.display().to_string(), serde_json::json!(matched));
            }

            let report = serde_json::json!({
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "schemas": collection.schema_keys(),
                "payloads": results,
            });
            let report_json = render(&report, config.output.format)?;

            if let Some(path) = output {
                std::fs::write(&path, &report_json)?;
                println!("✅ Report written to {:?}", path);
            } else {
                println!("{}", report_json);
            }
            Ok(all_matched)
        }
    }
}

fn load_collection(config: &ValidatorConfig, overrides: &[PathBuf]) -> anyhow::Result<SchemaCollection> {
    if overrides.is_empty() {
        return config
            .load_collection()
            .context("failed to load configured schema definitions");
    }

    let mut definition = CollectionDefinition::default();
    for path in overrides {
        let loaded = CollectionDefinition::load(path)
            .with_context(|| format!("failed to load definitions from {}", path.display()))?;
        definition.merge(loaded);
    }
    Ok(definition.compile()?)
}

fn lookup<'a>(
    collection: &'a SchemaCollection,
    config: &ValidatorConfig,
    name: &str,
) -> anyhow::Result<&'a payload_schemas::Schema> {
    if let Some(schema) = collection.get_schema(name) {
        return Ok(schema);
    }
    let suggestions = collection.suggest(name, config.search.suggestion_limit);
    if suggestions.is_empty() {
        bail!("unknown schema '{}'", name);
    }
    bail!("unknown schema '{}' (did you mean: {}?)", name, suggestions.join(", "))
}

fn classify(collection: &SchemaCollection, value: &Value, apply_defaults: bool) -> Option<String> {
    if !apply_defaults {
        return collection.validate_object_schema(value).map(String::from);
    }
    // Defaults differ per schema, so each candidate gets a fresh copy.
    collection.iter().find_map(|(name, schema)| {
        let mut candidate = value.clone();
        schema.apply_default_properties(&mut candidate);
        schema.is_valid(&candidate).then(|| name.to_string())
    })
}

fn read_payload(path: &Path) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("{} is not valid JSON", path.display()))
}

fn render(value: &Value, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Pretty => serde_json::to_string_pretty(value),
        OutputFormat::Compact => serde_json::to_string(value),
    }
}
