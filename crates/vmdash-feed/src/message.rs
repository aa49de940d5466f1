//! Messages delivered from the feed to its single consumer.

use std::time::Duration;

use chrono::{DateTime, Local};
use vmdash_common::error::Result;
use vmdash_common::types::{MalformedPolicy, MetricsBatch};

use crate::payload;
use crate::source::EventSource;

/// One unit of work for the consumer, in arrival order.
#[derive(Debug, Clone)]
pub enum FeedMessage {
    /// The stream is open.
    Connected {
        /// Stream URL.
        url: String,
    },
    /// A validated batch ready to render.
    Batch {
        /// The samples.
        batch: MetricsBatch,
        /// Local time the batch was decoded.
        received_at: DateTime<Local>,
    },
    /// An event arrived but its payload was rejected.
    Rejected {
        /// Why the payload was rejected.
        reason: String,
    },
    /// The stream dropped; a reconnect is scheduled.
    Disconnected {
        /// Why the stream dropped.
        reason: String,
        /// Delay before the next attempt.
        retry_in: Duration,
    },
    /// The feed gave up and will send nothing more.
    Finished {
        /// Why the feed stopped.
        reason: String,
    },
}

/// Reads events until one matches `event_name` and turns it into a message.
///
/// Events with other names are skipped. A payload that fails validation
/// becomes [`FeedMessage::Rejected`] rather than an error so the stream
/// stays open.
///
/// # Errors
///
/// Returns an error only if the source itself fails.
pub fn next_message<S: EventSource + ?Sized>(
    source: &mut S,
    event_name: &str,
    policy: MalformedPolicy,
) -> Result<Option<FeedMessage>> {
    while let Some(event) = source.next_event()? {
        if event.name != event_name {
            tracing::trace!(event = %event.name, "ignoring unsubscribed event");
            continue;
        }
        let message = match payload::decode_batch(&event.data, policy) {
            Ok(batch) => {
                tracing::debug!(samples = batch.len(), skipped = batch.skipped(), "batch decoded");
                FeedMessage::Batch {
                    batch,
                    received_at: Local::now(),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "rejecting metrics payload");
                FeedMessage::Rejected {
                    reason: e.to_string(),
                }
            }
        };
        return Ok(Some(message));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::source::SseSource;

    const STREAM: &str = "\
event: heartbeat\ndata: {}\n\n\
event: metrics_update\ndata: [{\"name\":\"vm1\",\"namespace\":\"default\",\"cpu\":1.5,\"memory\":1048576}]\n\n\
event: metrics_update\ndata: [{\"name\":\"vm1\"}]\n\n";

    #[test]
    fn filters_by_event_name_and_rejects_bad_payloads() {
        let mut source = SseSource::new(Cursor::new(STREAM), "test");

        let first = next_message(&mut source, "metrics_update", MalformedPolicy::Abort)
            .expect("read")
            .expect("message");
        match first {
            FeedMessage::Batch { batch, .. } => assert_eq!(batch.samples()[0].name, "vm1"),
            other => panic!("expected batch, got {other:?}"),
        }

        let second = next_message(&mut source, "metrics_update", MalformedPolicy::Abort)
            .expect("read")
            .expect("message");
        assert!(matches!(second, FeedMessage::Rejected { .. }));

        assert!(next_message(&mut source, "metrics_update", MalformedPolicy::Abort)
            .expect("read")
            .is_none());
    }

    #[test]
    fn other_subscription_sees_only_its_events() {
        let mut source = SseSource::new(Cursor::new(STREAM), "test");
        let message = next_message(&mut source, "update_vms", MalformedPolicy::Abort).expect("read");
        assert!(message.is_none());
    }
}
