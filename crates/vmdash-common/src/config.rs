//! Dashboard configuration model.
//!
//! Loaded from an optional JSON file, then overridden field by field by
//! the CLI. Missing keys fall back to [`DashConfig::default`].

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{Result, VmdashError};
use crate::types::MalformedPolicy;

/// Root configuration for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    /// Base URL of the metrics producer.
    pub base_url: String,
    /// Path of the event stream relative to `base_url`.
    pub stream_path: String,
    /// Event name carrying metrics batches.
    pub event_name: String,
    /// Capacity of the bounded channel feeding the UI loop.
    pub channel_capacity: usize,
    /// Handling of samples that fail validation.
    pub malformed_policy: MalformedPolicy,
    /// Terminal input poll interval in milliseconds.
    pub tick_rate_ms: u64,
    /// Initial reconnection delay in milliseconds.
    pub retry_delay_ms: u64,
    /// Stop reconnecting after this many attempts. `None` retries forever.
    pub max_reconnects: Option<u32>,
    /// Accept self-signed certificates from the producer.
    pub insecure_tls: bool,
    /// Fetch one snapshot before the first pushed batch arrives.
    pub initial_snapshot: bool,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_BASE_URL.to_string(),
            stream_path: constants::DEFAULT_STREAM_PATH.to_string(),
            event_name: constants::DEFAULT_EVENT_NAME.to_string(),
            channel_capacity: constants::DEFAULT_CHANNEL_CAPACITY,
            malformed_policy: MalformedPolicy::default(),
            tick_rate_ms: constants::DEFAULT_TICK_RATE_MS,
            retry_delay_ms: constants::DEFAULT_RETRY_DELAY_MS,
            max_reconnects: None,
            insecure_tls: false,
            initial_snapshot: false,
        }
    }
}

impl DashConfig {
    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails [`DashConfig::validate`].
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "loading configuration");
        let content = std::fs::read_to_string(path).map_err(|e| VmdashError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values that would otherwise wedge the event loop.
    ///
    /// # Errors
    ///
    /// Returns `VmdashError::Config` naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.event_name.trim().is_empty() {
            return Err(config_error("event_name must not be empty"));
        }
        if self.channel_capacity == 0 {
            return Err(config_error("channel_capacity must be at least 1"));
        }
        if self.tick_rate_ms == 0 {
            return Err(config_error("tick_rate_ms must be at least 1"));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(config_error(&format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        Ok(())
    }

    /// Full URL of the event stream.
    #[must_use]
    pub fn stream_url(&self) -> String {
        join_url(&self.base_url, &self.stream_path)
    }

    /// Full URL of the snapshot endpoint.
    #[must_use]
    pub fn snapshot_url(&self) -> String {
        join_url(&self.base_url, constants::SNAPSHOT_PATH)
    }

    /// Input poll interval.
    #[must_use]
    pub const fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    /// Initial reconnection delay.
    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

fn config_error(message: &str) -> VmdashError {
    VmdashError::Config {
        message: message.to_string(),
    }
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.is_empty() {
        return base.to_string();
    }
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = DashConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.event_name, "metrics_update");
        assert_eq!(config.malformed_policy, MalformedPolicy::Abort);
    }

    #[test]
    fn urls_join_without_double_slash() {
        let config = DashConfig {
            base_url: "http://dash.local:5000/".into(),
            stream_path: "events".into(),
            ..DashConfig::default()
        };
        assert_eq!(config.stream_url(), "http://dash.local:5000/events");
        assert_eq!(config.snapshot_url(), "http://dash.local:5000/api/vms");
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let config = DashConfig {
            channel_capacity: 0,
            ..DashConfig::default()
        };
        assert!(matches!(config.validate(), Err(VmdashError::Config { .. })));
    }

    #[test]
    fn empty_event_name_is_rejected() {
        let config = DashConfig {
            event_name: "  ".into(),
            ..DashConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let config = DashConfig {
            base_url: "ws://dash.local".into(),
            ..DashConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("vmdash.json");
        std::fs::write(
            &path,
            r#"{"base_url": "https://api.cluster.local:6443", "malformed_policy": "skip", "insecure_tls": true}"#,
        )
        .expect("write config");

        let config = DashConfig::load(&path).expect("load");
        assert_eq!(config.base_url, "https://api.cluster.local:6443");
        assert_eq!(config.malformed_policy, MalformedPolicy::Skip);
        assert!(config.insecure_tls);
        assert_eq!(config.channel_capacity, constants::DEFAULT_CHANNEL_CAPACITY);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = DashConfig::load(&dir.path().join("absent.json")).expect_err("should fail");
        assert!(matches!(err, VmdashError::Io { .. }));
    }
}
