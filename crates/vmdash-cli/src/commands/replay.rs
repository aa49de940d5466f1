//! `vmdash replay` — Render a recorded event stream.
//!
//! The file holds raw server-sent events, e.g. captured with
//! `curl -N http://producer:5000/events > capture.sse`.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use vmdash_common::config::DashConfig;
use vmdash_feed::message::{next_message, FeedMessage};
use vmdash_feed::source::SseSource;
use vmdash_tui::renderer::MetricsRenderer;

use crate::output;

/// Arguments for the `replay` command.
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Recorded event stream.
    pub file: PathBuf,

    /// Print only the state after the last batch.
    #[arg(long)]
    pub last: bool,
}

/// Executes the `replay` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn execute(args: ReplayArgs, config: &DashConfig) -> anyhow::Result<()> {
    let mut source = SseSource::open(&args.file)
        .with_context(|| format!("failed to open recording {}", args.file.display()))?;
    let mut renderer = MetricsRenderer::new();
    let mut batches = 0_usize;
    let mut rejected = 0_usize;

    while let Some(message) = next_message(&mut source, &config.event_name, config.malformed_policy)
        .context("failed to read recording")?
    {
        match message {
            FeedMessage::Batch { batch, received_at } => {
                renderer.apply(&batch);
                batches += 1;
                if !args.last {
                    println!("{}", output::batch_header(batches, received_at, batch.skipped()));
                    print!("{}", output::format_table(renderer.table()));
                }
            }
            FeedMessage::Rejected { reason } => {
                rejected += 1;
                eprintln!("rejected payload: {reason}");
            }
            _ => {}
        }
    }

    if args.last {
        print!("{}", output::format_table(renderer.table()));
    }
    eprintln!("{batches} batch(es) rendered, {rejected} rejected");
    Ok(())
}

#[cfg(test)]
mod tests {
    use vmdash_common::error::VmdashError;

    use super::*;

    #[test]
    fn replay_renders_recorded_stream() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("capture.sse");
        std::fs::write(
            &file,
            "event: metrics_update\n\
             data: [{\"name\":\"vm1\",\"namespace\":\"default\",\"cpu\":0.5,\"memory\":1048576}]\n\n\
             event: metrics_update\n\
             data: not json\n\n",
        )
        .expect("write");

        let args = ReplayArgs { file, last: true };
        assert!(execute(args, &DashConfig::default()).is_ok());
    }

    #[test]
    fn replay_missing_file_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = ReplayArgs {
            file: dir.path().join("missing.sse"),
            last: false,
        };
        let err = execute(args, &DashConfig::default()).expect_err("should fail");
        assert!(err.to_string().contains("missing.sse"));
        assert!(matches!(
            err.downcast_ref::<VmdashError>(),
            Some(VmdashError::Io { .. })
        ));
    }
}
