mod emit;
mod manifest;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt};

use shflags::{FlagRegistry, ParseError, Settings, Status};

use crate::manifest::{DEFAULT_MANIFEST_NAME, Manifest};

#[derive(Parser)]
#[command(name = "shflags")]
#[command(version, about = "Typed flag parsing for shell scripts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse script arguments and print shell assignments
    Parse(ParseArgs),

    /// Print the usage text for a manifest to stderr
    Usage(ManifestArgs),

    /// Validate the flag definitions in a manifest
    Check(ManifestArgs),
}

#[derive(clap::Args)]
struct ManifestArgs {
    /// Path to the flag manifest
    #[arg(short, long, default_value = DEFAULT_MANIFEST_NAME, value_name = "FILE")]
    manifest: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// `FLAGS_name=value` lines for `eval`
    Shell,
    /// A JSON object with flags, positional arguments and argc
    Json,
}

#[derive(clap::Args)]
struct ParseArgs {
    #[command(flatten)]
    target: ManifestArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Shell)]
    format: Format,

    /// External getopt command to tokenize with (default: built-in tokenizer)
    #[arg(long, env = "FLAGS_GETOPT_CMD", value_name = "CMD")]
    getopt: Option<String>,

    /// Script arguments, after `--`
    #[arg(last = true, value_name = "ARGS")]
    args: Vec<String>,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse(args) => parse_command(args),
        Commands::Usage(args) => usage_command(args),
        Commands::Check(args) => check_command(args),
    };

    match result {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("flags:FATAL {err:#}");
            Status::Error.into()
        }
    }
}

fn parse_command(args: ParseArgs) -> Result<Status> {
    tracing::debug!("executing parse command");

    let manifest = Manifest::from_file(&args.target.manifest)?;
    let mut settings = Settings::from_env();
    if let Some(cmd) = args.getopt.filter(|c| !c.trim().is_empty()) {
        settings = settings.with_getopt_command(cmd);
    }
    let mut registry = manifest.build_registry(settings)?;

    match registry.parse(args.args.as_slice()) {
        Ok(()) => {}
        // Usage was already written to stderr.
        Err(ParseError::HelpRequested) => return Ok(Status::False),
        Err(err) => {
            eprintln!("flags:FATAL {err}");
            return Ok(err.status());
        }
    }

    let out = match args.format {
        Format::Shell => emit::shell(&registry),
        Format::Json => emit::json(&registry)?,
    };
    print!("{out}");
    Ok(Status::True)
}

fn usage_command(args: ManifestArgs) -> Result<Status> {
    tracing::debug!("executing usage command");

    let manifest = Manifest::from_file(&args.manifest)?;
    let registry = manifest.build_registry(Settings::from_env())?;
    registry.print_help();
    Ok(Status::True)
}

fn check_command(args: ManifestArgs) -> Result<Status> {
    tracing::debug!("executing check command");

    let manifest = Manifest::from_file(&args.manifest)?;
    let mut registry = FlagRegistry::with_settings(manifest.settings(Settings::from_env()));
    let rejected = manifest.define_all(&mut registry);

    // Duplicates were already logged as warnings by the registry.
    let mut status = Status::True;
    for r in &rejected {
        if r.error.status() == Status::Error {
            eprintln!("flags:ERROR {}: {}", r.name, r.error);
            status = Status::Error;
        } else if status == Status::True {
            status = Status::False;
        }
    }

    // The built-in help flag is not part of the manifest.
    let defined = registry.len().saturating_sub(1);
    if rejected.is_empty() {
        eprintln!("OK: {defined} flag(s) defined");
    } else {
        eprintln!(
            "{defined} flag(s) defined, {} definition(s) rejected",
            rejected.len()
        );
    }
    Ok(status)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
