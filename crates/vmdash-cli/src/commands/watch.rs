//! `vmdash watch` — Full-screen dashboard.

use anyhow::Context;
use clap::Args;
use vmdash_common::config::DashConfig;

/// Arguments for the `watch` command.
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Fetch the current batch before the first push arrives.
    #[arg(long)]
    pub snapshot: bool,

    /// Give up after this many consecutive failed reconnects.
    #[arg(long)]
    pub max_reconnects: Option<u32>,
}

/// Executes the `watch` command.
///
/// # Errors
///
/// Returns an error if the dashboard cannot start or the terminal fails.
pub fn execute(args: WatchArgs, mut config: DashConfig) -> anyhow::Result<()> {
    config.initial_snapshot |= args.snapshot;
    if args.max_reconnects.is_some() {
        config.max_reconnects = args.max_reconnects;
    }
    vmdash_tui::session::run(&config).context("dashboard failed")
}
