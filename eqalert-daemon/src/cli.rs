//! CLI argument definitions for eqalert-daemon.
//!
//! Uses `clap` v4 derive macros. Purely declarative, no I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// eqalert log classification daemon.
///
/// Reads game client log lines, classifies each one into a semantic
/// category and writes one JSON event per line to stdout.
#[derive(Parser, Debug)]
#[command(name = "eqalert-daemon")]
#[command(version, about, long_about = None)]
pub struct DaemonCli {
    /// Path to eqalert.toml configuration file.
    ///
    /// Without it, built-in defaults plus `EQALERT_*` environment variables are used.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Validate configuration and exit without starting the daemon.
    #[arg(long)]
    pub validate: bool,

    /// Output format for the `classify` and `categories` reports.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Supported report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the classification pipeline (default).
    Run(RunArgs),

    /// Classify one or more lines and print the result.
    Classify(ClassifyArgs),

    /// List the category taxonomy grouped by rule group.
    Categories(CategoriesArgs),
}

impl Default for Commands {
    fn default() -> Self {
        Self::Run(RunArgs::default())
    }
}

/// Run the classification pipeline.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Read lines from this file until EOF instead of stdin.
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

/// Classify lines without starting the pipeline.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Lines to classify.
    #[arg(required = true)]
    pub text: Vec<String>,

    /// Treat each argument as a bare payload (no `[timestamp] ` prefix).
    #[arg(long)]
    pub payload: bool,
}

/// List categories.
#[derive(Args, Debug)]
pub struct CategoriesArgs {
    /// Only list categories of this rule group (e.g. `melee`, `who`).
    #[arg(short, long)]
    pub group: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_defaults_to_run() {
        let cli = DaemonCli::try_parse_from(["eqalert-daemon"]).unwrap();
        assert!(cli.command.is_none());
        assert!(matches!(Commands::default(), Commands::Run(RunArgs { input: None })));
        assert_eq!(cli.output, OutputFormat::Text);
    }

    #[test]
    fn run_with_input_file() {
        let cli =
            DaemonCli::try_parse_from(["eqalert-daemon", "run", "--input", "/tmp/eqlog.txt"])
                .unwrap();
        match cli.command {
            Some(Commands::Run(args)) => {
                assert_eq!(args.input, Some(PathBuf::from("/tmp/eqlog.txt")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn classify_requires_text() {
        assert!(DaemonCli::try_parse_from(["eqalert-daemon", "classify"]).is_err());

        let cli = DaemonCli::try_parse_from([
            "eqalert-daemon",
            "classify",
            "--payload",
            "Welcome to level 10!",
            "--output",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.output, OutputFormat::Json);
        match cli.command {
            Some(Commands::Classify(args)) => {
                assert!(args.payload);
                assert_eq!(args.text, vec!["Welcome to level 10!".to_owned()]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_overrides_after_subcommand() {
        let cli = DaemonCli::try_parse_from([
            "eqalert-daemon",
            "categories",
            "--group",
            "who",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Some(Commands::Categories(args)) => assert_eq!(args.group.as_deref(), Some("who")),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
