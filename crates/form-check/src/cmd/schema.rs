use std::io;
use std::process::ExitCode;

use anyhow::Result;
use form_spec::FormSchema;

use crate::cmd::{CheckArgs, CommandContext, SchemaArgs, load_engine, load_target};
use crate::output::{self, CheckReport};

pub fn answers_schema(args: &SchemaArgs, ctx: &CommandContext) -> Result<ExitCode> {
    let (engine, values) = load_target(args, ctx)?;
    output::emit_json(&mut io::stdout().lock(), &engine.answers_schema(&values))?;
    Ok(ExitCode::SUCCESS)
}

pub fn schema_format() -> Result<ExitCode> {
    let schema = schemars::schema_for!(FormSchema);
    output::emit_json(&mut io::stdout().lock(), &schema)?;
    Ok(ExitCode::SUCCESS)
}

pub fn check(args: &CheckArgs, ctx: &CommandContext) -> Result<ExitCode> {
    let engine = load_engine(&args.schema, ctx.options)?;
    let schema = engine.schema();
    let report = CheckReport {
        form_id: schema.id.clone(),
        version: schema.version.clone(),
        fields: schema.fields.len(),
        conditional_fields: schema
            .fields
            .iter()
            .filter(|field| field.visible_if.is_some())
            .count(),
    };
    output::write_check(&mut io::stdout().lock(), &report, ctx.format)?;
    Ok(ExitCode::SUCCESS)
}
