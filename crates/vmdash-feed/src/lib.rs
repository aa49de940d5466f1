//! # vmdash-feed
//!
//! The realtime channel between a metrics producer and the dashboard.
//!
//! - [`sse`]: line decoder for server-sent events.
//! - [`source`]: the [`EventSource`](source::EventSource) seam and its
//!   reader-backed implementation, used for both HTTP bodies and recordings.
//! - [`payload`]: turns event data into a validated
//!   [`MetricsBatch`](vmdash_common::types::MetricsBatch).
//! - [`message`]: messages delivered to the single consumer.
//! - [`subscription`]: long-lived HTTP subscription with reconnection.
//! - [`snapshot`]: one-shot fetch of the current batch.

mod http;
pub mod message;
pub mod payload;
pub mod snapshot;
pub mod source;
pub mod sse;
pub mod subscription;
