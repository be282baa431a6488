//! CLI parse: clap types for loadtree. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Loadtree CLI - rebuild resource and frame state from load notifications
#[derive(Parser)]
#[command(name = "loadtree")]
#[command(about = "Replay browser load notifications into a resource frame tree")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a JSON-lines notification log and print the resulting resources
    Replay {
        /// Notification log, one {"method", "params"} object per line ("-" for stdin)
        input: PathBuf,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,

        /// Fail on the first line that does not decode instead of skipping it
        #[arg(long)]
        strict: bool,
    },

    /// Print the effective configuration (defaults, file, environment) as TOML
    Config,
}
