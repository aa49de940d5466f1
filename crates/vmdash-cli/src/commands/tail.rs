//! `vmdash tail` — Print every batch as it arrives.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use tokio::sync::mpsc::error::TryRecvError;
use vmdash_common::config::DashConfig;
use vmdash_feed::message::FeedMessage;
use vmdash_feed::subscription::Subscription;
use vmdash_tui::renderer::MetricsRenderer;

use crate::output;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Arguments for the `tail` command.
#[derive(Args, Debug)]
pub struct TailArgs {
    /// Exit after this many batches.
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Give up after this many consecutive failed reconnects.
    #[arg(long)]
    pub max_reconnects: Option<u32>,
}

/// Executes the `tail` command.
///
/// # Errors
///
/// Returns an error if the Ctrl+C handler or the feed thread cannot be
/// installed.
pub fn execute(args: TailArgs, mut config: DashConfig) -> anyhow::Result<()> {
    if args.max_reconnects.is_some() {
        config.max_reconnects = args.max_reconnects;
    }

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {e}"))?;

    let (tx, mut rx) = tokio::sync::mpsc::channel::<FeedMessage>(config.channel_capacity);
    let subscription = Subscription::from_config(&config);
    eprintln!("Subscribing to {} ({})", subscription.url(), config.event_name);
    let _feed = subscription.spawn(tx).context("failed to start feed")?;

    let mut renderer = MetricsRenderer::new();
    let mut batches = 0_usize;

    while running.load(Ordering::SeqCst) {
        let message = match rx.try_recv() {
            Ok(message) => message,
            Err(TryRecvError::Empty) => {
                std::thread::sleep(POLL_INTERVAL);
                continue;
            }
            Err(TryRecvError::Disconnected) => break,
        };

        match message {
            FeedMessage::Connected { url } => eprintln!("Connected to {url}"),
            FeedMessage::Batch { batch, received_at } => {
                renderer.apply(&batch);
                batches += 1;
                println!("{}", output::batch_header(batches, received_at, batch.skipped()));
                print!("{}", output::format_table(renderer.table()));
                if args.count.is_some_and(|n| batches >= n) {
                    break;
                }
            }
            FeedMessage::Rejected { reason } => eprintln!("Rejected payload: {reason}"),
            FeedMessage::Disconnected { reason, retry_in } => {
                eprintln!("Disconnected ({reason}); retrying in {:.1}s", retry_in.as_secs_f64());
            }
            FeedMessage::Finished { reason } => {
                eprintln!("Feed stopped: {reason}");
                break;
            }
        }
    }

    Ok(())
}
