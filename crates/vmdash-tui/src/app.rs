//! TUI application state.
//!
//! Owns the renderer and the connection status, and turns each
//! [`AppEvent`] into a state change.

use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use vmdash_common::types::MetricsBatch;
use vmdash_feed::message::FeedMessage;

use crate::event::{AppEvent, TerminalEvent};
use crate::renderer::MetricsRenderer;

/// State of the realtime channel as last reported by the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// No connection established yet.
    Connecting,
    /// The stream is open.
    Connected,
    /// The stream dropped and a reconnect is scheduled.
    Reconnecting {
        /// Delay before the next attempt.
        retry_in: Duration,
    },
    /// The feed stopped for good.
    Finished,
}

/// Root application state for the TUI.
#[derive(Debug)]
pub struct App {
    /// Whether the app should continue running.
    pub running: bool,
    /// Realtime channel status.
    pub status: ConnectionStatus,
    /// Where batches come from, shown in the header.
    pub source: String,
    /// Index of the selected row in the results table.
    pub selected_index: usize,
    /// Time the current batch was received.
    pub last_update: Option<DateTime<Local>>,
    /// Most recent rejection or disconnect reason.
    pub last_error: Option<String>,
    /// Entries dropped from the current batch.
    pub skipped: usize,
    /// Batches rendered since start.
    pub batches: u64,
    renderer: MetricsRenderer,
    dirty: bool,
}

impl App {
    /// Creates a new application state.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            running: true,
            status: ConnectionStatus::Connecting,
            source: source.into(),
            selected_index: 0,
            last_update: None,
            last_error: None,
            skipped: 0,
            batches: 0,
            renderer: MetricsRenderer::new(),
            dirty: true,
        }
    }

    /// Signals the app to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// The renderer holding table and chart state.
    #[must_use]
    pub const fn renderer(&self) -> &MetricsRenderer {
        &self.renderer
    }

    /// Whether a frame should be drawn.
    #[must_use]
    pub const fn needs_redraw(&self) -> bool {
        self.dirty || self.renderer.needs_redraw()
    }

    /// Clears pending redraw requests.
    pub fn mark_drawn(&mut self) {
        self.dirty = false;
        self.renderer.mark_drawn();
    }

    /// Processes one event to completion.
    pub fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::Terminal(TerminalEvent::Key(key)) => self.handle_key(key),
            AppEvent::Terminal(TerminalEvent::Resize(..)) => self.dirty = true,
            AppEvent::Terminal(TerminalEvent::Tick) => {}
            AppEvent::Feed(message) => self.handle_feed(message),
        }
    }

    /// Renders a batch and records when it arrived.
    pub fn apply_batch(&mut self, batch: &MetricsBatch, received_at: DateTime<Local>) {
        self.renderer.apply(batch);
        self.last_update = Some(received_at);
        self.skipped = batch.skipped();
        self.last_error = None;
        self.batches += 1;
        self.selected_index = self.selected_index.min(batch.len().saturating_sub(1));
        self.dirty = true;
    }

    fn handle_feed(&mut self, message: FeedMessage) {
        match message {
            FeedMessage::Connected { url } => {
                tracing::info!(%url, "feed connected");
                self.status = ConnectionStatus::Connected;
                self.last_error = None;
            }
            FeedMessage::Batch { batch, received_at } => {
                self.apply_batch(&batch, received_at);
            }
            FeedMessage::Rejected { reason } => {
                self.last_error = Some(reason);
            }
            FeedMessage::Disconnected { reason, retry_in } => {
                self.status = ConnectionStatus::Reconnecting { retry_in };
                self.last_error = Some(reason);
            }
            FeedMessage::Finished { reason } => {
                self.status = ConnectionStatus::Finished;
                self.last_error = Some(reason);
            }
        }
        self.dirty = true;
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit(),
            KeyCode::Down | KeyCode::Char('j') => {
                let last = self.renderer.table().len().saturating_sub(1);
                self.selected_index = (self.selected_index + 1).min(last);
                self.dirty = true;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_index = self.selected_index.saturating_sub(1);
                self.dirty = true;
            }
            _ => {}
        }
    }
}
