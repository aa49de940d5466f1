//! # vmdash — live VM metrics dashboard
//!
//! Subscribes to a metrics producer's realtime stream and renders each
//! batch as a table plus CPU and memory bar charts.

mod commands;
mod output;

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::commands::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;
    commands::execute(cli)
}

/// Logs go to stderr, except while the full-screen dashboard owns the
/// terminal; then they go to a file.
fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    let log_file = match (&cli.command, &cli.global.log_file) {
        (_, Some(path)) => Some(path.clone()),
        (Command::Watch(_), None) => Some(vmdash_common::constants::default_log_file()),
        _ => None,
    };

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}
