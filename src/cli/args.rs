//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Playground state sync and compile orchestration CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: playsync.toml)
    #[arg(short = 'C', long, global = true, default_value = "playsync.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive session reading commands from stdin
    #[command(visible_alias = "s")]
    Session {
        /// Shareable URL to restore state from
        #[arg(short, long, value_hint = clap::ValueHint::Url)]
        url: Option<String>,

        /// Compile and lint this file on every change
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        watch: Option<PathBuf>,
    },

    /// List the available branches
    #[command(visible_alias = "b")]
    Branches,

    /// Decode a shareable URL and print its state as JSON
    Share {
        /// URL produced by a session
        #[arg(value_hint = clap::ValueHint::Url)]
        url: String,
    },
}
