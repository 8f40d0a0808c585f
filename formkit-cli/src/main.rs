mod error;
mod scenario;

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::LevelFilter;
use simplelog::{Config, WriteLogger};

use crate::error::CliError;
use crate::scenario::{Scenario, WidgetKind};

#[derive(Parser)]
#[command(name = "formkit")]
#[command(about = "Drive headless form widgets from JSON scenarios")]
struct Cli {
    /// Write a debug log to this file
    #[arg(long, global = true)]
    log: Option<PathBuf>,

    /// Log at trace level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario file and print the report as JSON
    Run {
        scenario: PathBuf,

        /// Reject hosts declaring more than one binding marker
        #[arg(long)]
        strict: bool,

        /// Print the report on a single line
        #[arg(long)]
        compact: bool,
    },
    /// Validate a widget option bag
    Check {
        #[arg(value_enum)]
        widget: WidgetKind,

        config: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    if let Some(path) = &cli.log {
        let level = if cli.verbose {
            LevelFilter::Trace
        } else {
            LevelFilter::Debug
        };
        let file = File::create(path).map_err(|e| CliError::io(path, e))?;
        WriteLogger::init(level, Config::default(), file)?;
    }

    match cli.command {
        Commands::Run {
            scenario,
            strict,
            compact,
        } => {
            let parsed: Scenario = serde_json::from_str(&read(&scenario)?)?;
            log::info!("Running {} ({:?})", scenario.display(), parsed.widget);
            let report = scenario::run(parsed, strict)?;
            let out = if compact {
                serde_json::to_string(&report)?
            } else {
                serde_json::to_string_pretty(&report)?
            };
            println!("{}", out);
        }
        Commands::Check { widget, config } => {
            let value = serde_json::from_str(&read(&config)?)?;
            scenario::check_config(widget, value)?;
            println!("{}: ok", config.display());
        }
    }
    Ok(())
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|e| CliError::io(path, e))
}
