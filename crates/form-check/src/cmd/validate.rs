use std::io;
use std::process::ExitCode;

use anyhow::{Result, bail};
use clap::Args;
use tracing::info;

use crate::cmd::{CommandContext, SchemaArgs, load_target};
use crate::output;

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub target: SchemaArgs,
    /// Validate a single field, ignoring visibility
    #[arg(long = "field", value_name = "FIELD_ID")]
    pub field: Option<String>,
}

pub fn run(args: &ValidateArgs, ctx: &CommandContext) -> Result<ExitCode> {
    let (engine, values) = load_target(&args.target, ctx)?;
    let mut out = io::stdout().lock();

    if let Some(field_id) = &args.field {
        if engine.field(field_id).is_none() {
            bail!("form '{}' has no field '{field_id}'", engine.schema().id);
        }
        let errors = engine.validate_field(field_id, values.get(field_id));
        info!(field_id = %field_id, errors = errors.len(), "validated field");
        output::write_field_errors(&mut out, field_id, &errors, ctx.format)?;
        return Ok(exit_code(errors.is_empty()));
    }

    let result = engine.validate_form(&values);
    info!(
        form_id = %engine.schema().id,
        valid = result.is_valid,
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "validated form"
    );
    output::write_validation(&mut out, engine.schema(), &result, ctx.format)?;
    Ok(exit_code(result.is_valid))
}

fn exit_code(valid: bool) -> ExitCode {
    if valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
