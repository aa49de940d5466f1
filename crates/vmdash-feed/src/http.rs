//! Shared blocking HTTP client construction.

use std::time::Duration;

use reqwest::blocking::Client;
use vmdash_common::error::{Result, VmdashError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds a client. `timeout` bounds the whole request; pass `None` for
/// long-lived streams.
pub(crate) fn build_client(insecure_tls: bool, timeout: Option<Duration>) -> Result<Client> {
    if insecure_tls {
        tracing::warn!("TLS certificate verification is disabled");
    }
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(timeout)
        .danger_accept_invalid_certs(insecure_tls)
        .build()
        .map_err(|e| VmdashError::Config {
            message: format!("failed to build HTTP client: {e}"),
        })
}

pub(crate) fn transport_error(url: &str, error: &reqwest::Error) -> VmdashError {
    VmdashError::Transport {
        url: url.to_string(),
        message: error.to_string(),
    }
}
