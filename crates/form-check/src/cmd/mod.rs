pub mod inspect;
pub mod schema;
pub mod validate;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Args;
use form_spec::{EngineOptions, FormSchema, FormValues, ValidationEngine, values_from_json};
use serde_json::Value;
use tracing::debug;

use crate::output::OutputFormat;

/// Settings shared by every subcommand after config and flags are merged.
#[derive(Debug, Clone, Copy)]
pub struct CommandContext {
    pub options: EngineOptions,
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
pub struct SchemaArgs {
    /// Form schema document
    #[arg(long = "schema", value_name = "schema.json")]
    pub schema: PathBuf,
    /// Values document; treated as empty when omitted
    #[arg(long = "values", value_name = "values.json")]
    pub values: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Form schema document
    #[arg(long = "schema", value_name = "schema.json")]
    pub schema: PathBuf,
}

pub fn load_engine(path: &Path, options: EngineOptions) -> Result<ValidationEngine> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read form schema {}", path.display()))?;
    let schema = FormSchema::from_json(&raw)
        .with_context(|| format!("failed to load form schema {}", path.display()))?;
    let engine = ValidationEngine::with_options(schema, options)
        .with_context(|| format!("invalid form schema {}", path.display()))?;
    debug!(path = %path.display(), "loaded form schema");
    Ok(engine)
}

pub fn load_values(path: Option<&Path>) -> Result<FormValues> {
    let Some(path) = path else {
        return Ok(FormValues::new());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read values {}", path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("values {} are not valid JSON", path.display()))?;
    if !value.is_object() {
        bail!("values {} must be a JSON object keyed by field id", path.display());
    }
    Ok(values_from_json(value))
}

pub fn load_target(
    args: &SchemaArgs,
    ctx: &CommandContext,
) -> Result<(ValidationEngine, FormValues)> {
    let engine = load_engine(&args.schema, ctx.options)?;
    let values = load_values(args.values.as_deref())?;
    Ok((engine, values))
}
