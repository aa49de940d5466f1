//! Full-screen dashboard session.
//!
//! Wires the feed thread and the input thread into one bounded channel,
//! then runs the single consumer loop until the user quits.

use chrono::Local;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc::Receiver;
use vmdash_common::config::DashConfig;
use vmdash_common::error::{Result, VmdashError};
use vmdash_feed::snapshot::fetch_snapshot;
use vmdash_feed::subscription::Subscription;

use crate::app::App;
use crate::event::{self, AppEvent};
use crate::ui;

/// Runs the dashboard against the configured producer.
///
/// # Errors
///
/// Returns an error if a worker thread cannot be started or the terminal
/// cannot be drawn.
pub fn run(config: &DashConfig) -> Result<()> {
    let subscription = Subscription::from_config(config);
    let mut app = App::new(subscription.url());

    if config.initial_snapshot {
        match fetch_snapshot(config) {
            Ok(batch) => app.apply_batch(&batch, Local::now()),
            Err(e) => {
                tracing::warn!(error = %e, "initial snapshot failed");
                app.last_error = Some(e.to_string());
            }
        }
    }

    let (tx, mut rx) = tokio::sync::mpsc::channel::<AppEvent>(config.channel_capacity);
    let _feed = subscription.spawn(tx.clone())?;
    let _input = event::spawn_input(tx, config.tick_rate())?;

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut app, &mut rx);
    ratatui::restore();

    tracing::info!(batches = app.batches, "dashboard closed");
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    rx: &mut Receiver<AppEvent>,
) -> Result<()> {
    while app.running {
        if app.needs_redraw() {
            let _ = terminal
                .draw(|frame| ui::draw(frame, app))
                .map_err(|e| VmdashError::Io {
                    path: "terminal".into(),
                    source: e,
                })?;
            app.mark_drawn();
        }

        let Some(event) = rx.blocking_recv() else {
            tracing::debug!("all producers stopped");
            break;
        };
        app.handle(event);
    }
    Ok(())
}
