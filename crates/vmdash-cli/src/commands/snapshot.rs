//! `vmdash snapshot` — Fetch and print the producer's current batch.

use anyhow::Context;
use clap::Args;
use vmdash_common::config::DashConfig;
use vmdash_feed::snapshot::fetch_snapshot;
use vmdash_tui::renderer::MetricsRenderer;

use crate::output;

/// Arguments for the `snapshot` command.
#[derive(Args, Debug)]
pub struct SnapshotArgs {
    /// Print the validated samples as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Executes the `snapshot` command.
///
/// # Errors
///
/// Returns an error if the producer is unreachable or the payload is
/// rejected.
pub fn execute(args: SnapshotArgs, config: &DashConfig) -> anyhow::Result<()> {
    let batch = fetch_snapshot(config).context("failed to fetch snapshot")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(batch.samples())?);
        return Ok(());
    }

    let mut renderer = MetricsRenderer::new();
    renderer.apply(&batch);
    print!("{}", output::format_table(renderer.table()));
    if batch.skipped() > 0 {
        eprintln!("{} malformed sample(s) skipped", batch.skipped());
    }
    Ok(())
}
