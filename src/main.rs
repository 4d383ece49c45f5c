//! playsync - state synchronization and single-flight compile orchestration
//! for code playgrounds.

mod branch;
mod cli;
mod compile;
mod config;
mod core;
mod editor;
mod logger;
mod persist;
mod sync;
mod utils;

#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{PlaysyncConfig, init_config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    init_config(PlaysyncConfig::load(&cli)?);
    let config = config::cfg();

    // One thread: the session loop owns all state
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(async {
        match &cli.command {
            Commands::Session { url, watch } => {
                cli::session::run_session(&config, url.as_deref(), watch.as_deref()).await
            }
            Commands::Branches => cli::branches::list_branches(&config).await,
            Commands::Share { url } => cli::share::print_shared_state(url, &config),
        }
    })
}
