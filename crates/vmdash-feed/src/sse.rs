//! Server-sent events line decoder.
//!
//! Follows the EventSource processing model: fields accumulate until a
//! blank line dispatches the event. The decoder is fed one line at a time
//! with the line terminator already removed.

use std::time::Duration;

use vmdash_common::constants::DEFAULT_SSE_EVENT_NAME;

/// A dispatched server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Event name (`message` when the server sent no `event:` field).
    pub name: String,
    /// Data lines joined with `\n`.
    pub data: String,
    /// Last event id seen on the stream when this event was dispatched.
    pub id: Option<String>,
}

/// Incremental decoder state for one stream.
#[derive(Debug, Default)]
pub struct SseDecoder {
    event: Option<String>,
    data: Vec<String>,
    last_event_id: Option<String>,
    retry: Option<Duration>,
}

impl SseDecoder {
    /// Creates a decoder with empty buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes one line and returns an event if the line dispatched one.
    pub fn feed_line(&mut self, line: &str) -> Option<SseEvent> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            "id" if !value.contains('\0') => self.last_event_id = Some(value.to_string()),
            "retry" => {
                if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
                    if let Ok(ms) = value.parse::<u64>() {
                        self.retry = Some(Duration::from_millis(ms));
                    }
                }
            }
            other => tracing::trace!(field = other, "ignoring unknown SSE field"),
        }
        None
    }

    /// Id of the most recent `id:` field, sent back on reconnect.
    #[must_use]
    pub fn last_event_id(&self) -> Option<&str> {
        self.last_event_id.as_deref()
    }

    /// Reconnection delay requested by the server, if any.
    #[must_use]
    pub const fn retry(&self) -> Option<Duration> {
        self.retry
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let name = self.event.take();
        if self.data.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseEvent {
            name: name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| DEFAULT_SSE_EVENT_NAME.to_string()),
            data,
            id: self.last_event_id.clone(),
        })
    }
}
