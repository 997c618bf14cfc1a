//! Remap CLI - Command-line interface for rule-driven JSON reshaping
//!
//! This is the main entry point for the Remap CLI application, providing
//! commands for transforming documents, streaming large objects, checking
//! rule sets, and trying out expressions.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Configuration decides color and logging, so load it first and
    // report a failure only once logging is up
    let config = Config::load_with_file(cli.config.as_deref());
    let use_color = cli.use_color() && config.as_ref().map_or(true, |c| c.output.color);
    control::set_override(use_color);

    if let Err(e) = init_logging(&cli, config.as_ref().ok()) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let result = config.and_then(|config| run(cli, &config, use_color));

    match result {
        Ok(()) => {
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}", error::format_error(&e, use_color));

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip_all, fields(command = ?cli.command))]
fn run(cli: Cli, config: &Config, use_color: bool) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let format = cli.output_format(config.output.format);
    let mut output = OutputWriter::new(format, use_color, cli.quiet, config.output.progress);

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        "Executing command"
    );

    match cli.command {
        Commands::Transform(args) => handlers::handle_transform(args, config, &mut output),
        Commands::Stream(args) => handlers::handle_stream(args, config, &mut output),
        Commands::Check(args) => handlers::handle_check(args, &mut output),
        Commands::Eval(args) => handlers::handle_eval(args, &mut output),
        Commands::Catalog => handlers::handle_catalog(&mut output),
        Commands::Config(args) => handlers::handle_config(args, config, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: Option<&Config>) -> Result<()> {
    let verbosity = cli.verbosity_level();
    let mut logging_config = LoggingConfig::from_verbosity(verbosity);

    if let Some(config) = config {
        logging_config.merge_with_file(&config.logging, verbosity);
    }

    // Environment overrides the file
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}
