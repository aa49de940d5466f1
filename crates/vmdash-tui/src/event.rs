//! Terminal and feed events.
//!
//! Keyboard input and feed messages travel through one bounded channel so
//! the UI loop sees a single ordered stream of work.

use std::thread::JoinHandle;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc::Sender;
use vmdash_common::error::{Result, VmdashError};
use vmdash_feed::message::FeedMessage;

const THREAD_NAME: &str = "vmdash-input";

/// Terminal input events.
#[derive(Debug, Clone)]
pub enum TerminalEvent {
    /// A key was pressed.
    Key(crossterm::event::KeyEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// No input arrived within one tick.
    Tick,
}

/// Everything the UI loop consumes.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Input from the terminal.
    Terminal(TerminalEvent),
    /// A message from the metrics feed.
    Feed(FeedMessage),
}

impl From<FeedMessage> for AppEvent {
    fn from(message: FeedMessage) -> Self {
        Self::Feed(message)
    }
}

impl From<TerminalEvent> for AppEvent {
    fn from(event: TerminalEvent) -> Self {
        Self::Terminal(event)
    }
}

/// Polls the terminal on a dedicated thread, emitting a tick whenever
/// `tick_rate` passes without input.
///
/// # Errors
///
/// Returns an error if the thread cannot be spawned.
pub fn spawn_input(tx: Sender<AppEvent>, tick_rate: Duration) -> Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name(THREAD_NAME.into())
        .spawn(move || {
            loop {
                let next = match event::poll(tick_rate) {
                    Ok(true) => match event::read() {
                        Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                            Some(TerminalEvent::Key(key))
                        }
                        Ok(Event::Resize(width, height)) => Some(TerminalEvent::Resize(width, height)),
                        Ok(_) => None,
                        Err(e) => {
                            tracing::error!(error = %e, "failed to read terminal event");
                            return;
                        }
                    },
                    Ok(false) => Some(TerminalEvent::Tick),
                    Err(e) => {
                        tracing::error!(error = %e, "failed to poll terminal");
                        return;
                    }
                };
                if let Some(event) = next {
                    if tx.blocking_send(AppEvent::Terminal(event)).is_err() {
                        return;
                    }
                }
            }
        })
        .map_err(|e| VmdashError::Spawn {
            name: THREAD_NAME,
            source: e,
        })
}
