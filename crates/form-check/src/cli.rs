use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing::info;

use crate::cmd::{self, CheckArgs, CommandContext, SchemaArgs, validate::ValidateArgs};
use crate::config::CheckConfig;
use crate::logging;
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "form-check",
    about = "Check form schemas and validate submitted values against them",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Configuration file (defaults to ./form-check.toml when present)
    #[arg(long = "config", value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Print machine-readable JSON instead of text
    #[arg(long = "json", global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a values document (exit 1 when invalid)
    Validate(ValidateArgs),
    /// List the fields visible for a values document
    Visible(SchemaArgs),
    /// Report completion percentage and the next field to fill
    Progress(SchemaArgs),
    /// Print a JSON Schema for the currently visible answers
    AnswersSchema(SchemaArgs),
    /// Print the JSON Schema of the form schema document format
    SchemaFormat,
    /// Load and compile a form schema without validating values
    Check(CheckArgs),
}

pub fn main() -> Result<ExitCode> {
    run(Cli::parse())
}

pub fn run(cli: Cli) -> Result<ExitCode> {
    logging::init(cli.verbose);

    let config = CheckConfig::load(cli.config.as_deref())?;
    let format = if cli.json {
        OutputFormat::Json
    } else {
        config.output.format
    };
    info!(?format, command = ?cli.command, "running form-check");

    let ctx = CommandContext {
        options: config.engine,
        format,
    };
    match cli.command {
        Commands::Validate(args) => cmd::validate::run(&args, &ctx),
        Commands::Visible(args) => cmd::inspect::visible(&args, &ctx),
        Commands::Progress(args) => cmd::inspect::progress(&args, &ctx),
        Commands::AnswersSchema(args) => cmd::schema::answers_schema(&args, &ctx),
        Commands::SchemaFormat => cmd::schema::schema_format(),
        Commands::Check(args) => cmd::schema::check(&args, &ctx),
    }
}
