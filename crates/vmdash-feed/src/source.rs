//! Event sources.
//!
//! An [`EventSource`] yields decoded server-sent events one at a time.
//! [`SseSource`] decodes any buffered reader, so the same code path serves
//! a live HTTP body and a recorded stream on disk.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;
use std::time::Duration;

use vmdash_common::error::{Result, VmdashError};

use crate::sse::{SseDecoder, SseEvent};

/// A stream of server-sent events.
pub trait EventSource {
    /// Blocks until the next event is dispatched.
    ///
    /// Returns `Ok(None)` once the stream has ended.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying stream fails or carries invalid
    /// UTF-8.
    fn next_event(&mut self) -> Result<Option<SseEvent>>;

    /// Reconnection delay requested by the server.
    fn retry_hint(&self) -> Option<Duration> {
        None
    }

    /// Id to resume from after a reconnect.
    fn last_event_id(&self) -> Option<&str> {
        None
    }
}

/// Decodes server-sent events from a buffered reader.
#[derive(Debug)]
pub struct SseSource<R> {
    reader: R,
    origin: String,
    decoder: SseDecoder,
    line: String,
}

impl<R: BufRead> SseSource<R> {
    /// Wraps a reader. `origin` names the stream in errors and logs.
    pub fn new(reader: R, origin: impl Into<String>) -> Self {
        Self {
            reader,
            origin: origin.into(),
            decoder: SseDecoder::new(),
            line: String::new(),
        }
    }
}

impl SseSource<BufReader<File>> {
    /// Opens a recorded event stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| VmdashError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::new(BufReader::new(file), path.display().to_string()))
    }
}

impl<R: BufRead> EventSource for SseSource<R> {
    fn next_event(&mut self) -> Result<Option<SseEvent>> {
        loop {
            self.line.clear();
            let read = self.reader.read_line(&mut self.line).map_err(|e| {
                if e.kind() == ErrorKind::InvalidData {
                    VmdashError::Protocol {
                        message: format!("{}: stream is not valid UTF-8", self.origin),
                    }
                } else {
                    VmdashError::Transport {
                        url: self.origin.clone(),
                        message: e.to_string(),
                    }
                }
            })?;
            if read == 0 {
                tracing::debug!(origin = %self.origin, "event stream ended");
                return Ok(None);
            }
            let line = self.line.strip_suffix('\n').unwrap_or(&self.line);
            if let Some(event) = self.decoder.feed_line(line) {
                tracing::trace!(origin = %self.origin, event = %event.name, bytes = event.data.len(), "event dispatched");
                return Ok(Some(event));
            }
        }
    }

    fn retry_hint(&self) -> Option<Duration> {
        self.decoder.retry()
    }

    fn last_event_id(&self) -> Option<&str> {
        self.decoder.last_event_id()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn reader_yields_events_in_order_then_none() {
        let input = "event: a\ndata: 1\n\nevent: b\ndata: 2\n\n";
        let mut source = SseSource::new(Cursor::new(input), "test");
        assert_eq!(source.next_event().expect("a").map(|e| e.name), Some("a".into()));
        assert_eq!(source.next_event().expect("b").map(|e| e.name), Some("b".into()));
        assert!(source.next_event().expect("end").is_none());
    }

    #[test]
    fn invalid_utf8_is_protocol_error() {
        let input: &[u8] = b"data: \xff\xfe\n\n";
        let mut source = SseSource::new(Cursor::new(input), "test");
        assert!(matches!(source.next_event(), Err(VmdashError::Protocol { .. })));
    }

    #[test]
    fn hints_are_exposed_after_reading() {
        let input = "retry: 250\nid: 42\ndata: x\n\n";
        let mut source = SseSource::new(Cursor::new(input), "test");
        let _event = source.next_event().expect("event");
        assert_eq!(source.retry_hint(), Some(Duration::from_millis(250)));
        assert_eq!(source.last_event_id(), Some("42"));
    }

    #[test]
    fn open_reads_recording_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("capture.sse");
        std::fs::write(&path, "event: metrics_update\ndata: []\n\n").expect("write");

        let mut source = SseSource::open(&path).expect("open");
        let event = source.next_event().expect("read").expect("event");
        assert_eq!(event.name, "metrics_update");
    }

    #[test]
    fn open_missing_recording_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = SseSource::open(&dir.path().join("missing.sse"));
        assert!(matches!(result, Err(VmdashError::Io { .. })));
    }
}
