//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Remap CLI - Rule-driven reshaping of JSON documents
///
/// Applies mapping rules to JSON documents in batch, rewrites large
/// objects in a single streaming pass, and checks rule sets before they
/// are deployed.
#[derive(Parser, Debug)]
#[command(
    name = "remap",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "REMAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results [default: human, or output.format from the config file]
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply mapping rules to a document or a batch of records
    Transform(TransformArgs),

    /// Rewrite one large JSON object entry by entry with bounded memory
    Stream(StreamArgs),

    /// Load and validate a rule set
    Check(CheckArgs),

    /// Evaluate a rule expression
    Eval(EvalArgs),

    /// List the named transforms rules can refer to
    Catalog,

    /// Manage configuration files and settings
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the transform command
#[derive(Parser, Debug)]
pub struct TransformArgs {
    /// Rule file (JSON or YAML)
    #[arg(short, long, value_name = "RULES")]
    pub rules: PathBuf,

    /// Input document, or '-' for stdin
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Fill absent required sources with their rule defaults first
    #[arg(long)]
    pub apply_defaults: bool,

    /// Report the outcome of every rule against the input
    #[arg(long)]
    pub explain: bool,

    /// Save the transformed document to a file
    #[arg(long, value_name = "FILE")]
    pub save_to: Option<PathBuf>,
}

/// Arguments for the stream command
#[derive(Parser, Debug)]
pub struct StreamArgs {
    /// Rule file (JSON or YAML)
    #[arg(short, long, value_name = "RULES")]
    pub rules: PathBuf,

    /// Input object, or '-' for stdin
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Write the rewritten object to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub save_to: Option<PathBuf>,

    /// Read buffer size in bytes (overrides engine.stream.chunk_size)
    #[arg(long, value_name = "BYTES")]
    pub chunk_size: Option<usize>,

    /// Reject keys or top-level values larger than this many bytes
    #[arg(long, value_name = "BYTES")]
    pub max_value_bytes: Option<usize>,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Rule file (JSON or YAML)
    #[arg(value_name = "RULES")]
    pub rules: PathBuf,

    /// Treat warnings (unknown transforms, shadowed streaming rules) as failures
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the eval command
#[derive(Parser, Debug)]
pub struct EvalArgs {
    /// Expression to evaluate
    #[arg(value_name = "EXPR")]
    pub expression: String,

    /// JSON bound to `value`
    #[arg(long, value_name = "JSON")]
    pub value: Option<String>,

    /// Document bound to `input`; its top-level keys are also bare names
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show(ConfigShowArgs),

    /// Write a configuration file with default values
    Init(ConfigInitArgs),
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "yaml")]
    pub format: ConfigFormat,
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Where to write the file; the extension selects the format
    #[arg(value_name = "PATH", default_value = ".remap.yaml")]
    pub path: PathBuf,

    /// Key holding the records of a batch request
    #[arg(long, value_name = "KEY")]
    pub collection_key: Option<String>,

    /// Key the transformed records are written under
    #[arg(long, value_name = "KEY")]
    pub output_key: Option<String>,

    /// Read buffer size for streaming
    #[arg(long, value_name = "BYTES")]
    pub chunk_size: Option<usize>,

    /// Force overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Human-readable formatted output
    #[default]
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }

    /// The output format, falling back to the configured one
    pub fn output_format(&self, configured: OutputFormat) -> OutputFormat {
        self.output.unwrap_or(configured)
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli::parse_from(["remap", "-vv", "catalog"]);
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::parse_from(["remap", "--quiet", "catalog"]);
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["remap", "-q", "-v", "catalog"]).is_err());
    }

    #[test]
    fn test_transform_args() {
        let cli = Cli::parse_from([
            "remap",
            "transform",
            "--rules",
            "rules.yaml",
            "input.json",
            "--apply-defaults",
            "-o",
            "json",
        ]);
        assert_eq!(cli.output, Some(OutputFormat::Json));
        match cli.command {
            Commands::Transform(args) => {
                assert_eq!(args.rules, PathBuf::from("rules.yaml"));
                assert_eq!(args.input, Some(PathBuf::from("input.json")));
                assert!(args.apply_defaults);
                assert!(!args.explain);
                assert!(args.save_to.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_stream_reads_stdin_by_default() {
        let cli = Cli::parse_from(["remap", "stream", "-r", "rules.json"]);
        match cli.command {
            Commands::Stream(args) => {
                assert!(args.input.is_none());
                assert!(args.chunk_size.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_output_format_falls_back_to_config() {
        let cli = Cli::parse_from(["remap", "catalog"]);
        assert_eq!(cli.output_format(OutputFormat::Yaml), OutputFormat::Yaml);

        let cli = Cli::parse_from(["remap", "--output", "json-pretty", "catalog"]);
        assert_eq!(cli.output_format(OutputFormat::Yaml), OutputFormat::JsonPretty);
    }

    #[test]
    fn test_config_init_default_path() {
        let cli = Cli::parse_from(["remap", "config", "init"]);
        match cli.command {
            Commands::Config(ConfigArgs {
                action: ConfigAction::Init(args),
            }) => {
                assert_eq!(args.path, PathBuf::from(".remap.yaml"));
                assert!(args.collection_key.is_none());
                assert!(!args.force);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_missing_rules_is_rejected() {
        assert!(Cli::try_parse_from(["remap", "transform", "input.json"]).is_err());
    }
}
