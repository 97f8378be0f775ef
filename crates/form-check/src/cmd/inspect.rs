use std::io;
use std::process::ExitCode;

use anyhow::Result;

use crate::cmd::{CommandContext, SchemaArgs, load_target};
use crate::output::{self, ProgressReport};

pub fn visible(args: &SchemaArgs, ctx: &CommandContext) -> Result<ExitCode> {
    let (engine, values) = load_target(args, ctx)?;
    let fields = engine.visible_fields(&values);
    output::write_visible(&mut io::stdout().lock(), &fields, ctx.format)?;
    Ok(ExitCode::SUCCESS)
}

pub fn progress(args: &SchemaArgs, ctx: &CommandContext) -> Result<ExitCode> {
    let (engine, values) = load_target(args, ctx)?;
    let report = ProgressReport {
        form_id: engine.schema().id.clone(),
        completion: engine.completion_percentage(&values),
        complete: engine.is_form_complete(&values),
        next_field: engine.next_field(&values).map(|field| field.id.clone()),
    };
    output::write_progress(&mut io::stdout().lock(), &report, ctx.format)?;
    Ok(ExitCode::SUCCESS)
}
