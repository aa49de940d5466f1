//! Long-lived subscription to the producer's event stream.
//!
//! Runs on its own thread and pushes [`FeedMessage`]s into a bounded
//! channel. The consumer is the only reader, so batches are handled one at
//! a time in arrival order. The thread exits on its next send after the
//! receiver is dropped.

use std::io::BufReader;
use std::thread::JoinHandle;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use tokio::sync::mpsc::Sender;
use vmdash_common::config::DashConfig;
use vmdash_common::error::{Result, VmdashError};
use vmdash_common::types::MalformedPolicy;

use crate::http;
use crate::message::{next_message, FeedMessage};
use crate::source::{EventSource, SseSource};

const LAST_EVENT_ID: &str = "Last-Event-ID";
const THREAD_NAME: &str = "vmdash-feed";

/// Subscription parameters for one producer.
#[derive(Debug, Clone)]
pub struct Subscription {
    url: String,
    event_name: String,
    policy: MalformedPolicy,
    retry_delay: Duration,
    max_reconnects: Option<u32>,
    insecure_tls: bool,
}

impl Subscription {
    /// Builds a subscription from the dashboard configuration.
    #[must_use]
    pub fn from_config(config: &DashConfig) -> Self {
        Self {
            url: config.stream_url(),
            event_name: config.event_name.clone(),
            policy: config.malformed_policy,
            retry_delay: config.retry_delay(),
            max_reconnects: config.max_reconnects,
            insecure_tls: config.insecure_tls,
        }
    }

    /// Stream URL this subscription connects to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Starts the subscription on a dedicated thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn<T>(self, tx: Sender<T>) -> Result<JoinHandle<()>>
    where
        T: From<FeedMessage> + Send + 'static,
    {
        std::thread::Builder::new()
            .name(THREAD_NAME.into())
            .spawn(move || self.run(&tx))
            .map_err(|e| VmdashError::Spawn {
                name: THREAD_NAME,
                source: e,
            })
    }

    /// Connects, forwards messages and reconnects until the consumer hangs
    /// up or the reconnect budget is spent. Blocks the calling thread.
    pub fn run<T: From<FeedMessage>>(&self, tx: &Sender<T>) {
        let client = match http::build_client(self.insecure_tls, None) {
            Ok(client) => client,
            Err(e) => {
                let _ = send(tx, FeedMessage::Finished { reason: e.to_string() });
                return;
            }
        };

        let mut retry = self.retry_delay;
        let mut last_event_id: Option<String> = None;
        let mut failures: u32 = 0;

        loop {
            let reason = match self.connect(&client, last_event_id.as_deref()) {
                Ok(mut source) => {
                    failures = 0;
                    tracing::info!(url = %self.url, event = %self.event_name, "subscribed");
                    if send(tx, FeedMessage::Connected { url: self.url.clone() }).is_err() {
                        return;
                    }
                    let outcome = self.pump(&mut source, tx);
                    if let Some(hint) = source.retry_hint() {
                        retry = hint;
                    }
                    if let Some(id) = source.last_event_id() {
                        last_event_id = Some(id.to_string());
                    }
                    match outcome {
                        Ok(()) => "stream ended".to_string(),
                        Err(VmdashError::ChannelClosed) => return,
                        Err(e) => e.to_string(),
                    }
                }
                Err(e) => e.to_string(),
            };

            failures = failures.saturating_add(1);
            if self.max_reconnects.is_some_and(|max| failures > max) {
                tracing::error!(url = %self.url, %reason, failures, "giving up on event stream");
                let _ = send(tx, FeedMessage::Finished { reason });
                return;
            }

            tracing::warn!(url = %self.url, %reason, ?retry, "event stream lost");
            if send(tx, FeedMessage::Disconnected { reason, retry_in: retry }).is_err() {
                return;
            }
            std::thread::sleep(retry);
            if tx.is_closed() {
                return;
            }
        }
    }

    /// Forwards every subscribed event until the source ends.
    fn pump<S, T>(&self, source: &mut S, tx: &Sender<T>) -> Result<()>
    where
        S: EventSource + ?Sized,
        T: From<FeedMessage>,
    {
        while let Some(message) = next_message(source, &self.event_name, self.policy)? {
            send(tx, message)?;
        }
        Ok(())
    }

    fn connect(
        &self,
        client: &Client,
        last_event_id: Option<&str>,
    ) -> Result<SseSource<BufReader<Response>>> {
        tracing::debug!(url = %self.url, ?last_event_id, "connecting to event stream");
        let mut request = client
            .get(&self.url)
            .header(ACCEPT, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache");
        if let Some(id) = last_event_id {
            request = request.header(LAST_EVENT_ID, id);
        }

        let response = request.send().map_err(|e| http::transport_error(&self.url, &e))?;
        if !response.status().is_success() {
            return Err(VmdashError::Transport {
                url: self.url.clone(),
                message: format!("HTTP {}", response.status()),
            });
        }
        Ok(SseSource::new(BufReader::new(response), self.url.clone()))
    }
}

fn send<T: From<FeedMessage>>(tx: &Sender<T>, message: FeedMessage) -> Result<()> {
    tx.blocking_send(T::from(message))
        .map_err(|_| VmdashError::ChannelClosed)
}
