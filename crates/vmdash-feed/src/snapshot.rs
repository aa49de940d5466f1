//! One-shot fetch of the producer's current batch.

use std::time::Duration;

use reqwest::header::ACCEPT;
use vmdash_common::config::DashConfig;
use vmdash_common::error::{Result, VmdashError};
use vmdash_common::types::MetricsBatch;

use crate::http;
use crate::payload;

const SNAPSHOT_TIMEOUT: Duration = Duration::from_secs(5);

/// Fetches `GET {base_url}/api/vms` and validates it like a pushed batch.
///
/// # Errors
///
/// Returns `Transport` if the request fails or the status is not 2xx, and
/// any error from [`payload::decode_batch`].
pub fn fetch_snapshot(config: &DashConfig) -> Result<MetricsBatch> {
    let url = config.snapshot_url();
    tracing::debug!(%url, "fetching snapshot");

    let client = http::build_client(config.insecure_tls, Some(SNAPSHOT_TIMEOUT))?;
    let response = client
        .get(&url)
        .header(ACCEPT, "application/json")
        .send()
        .map_err(|e| http::transport_error(&url, &e))?;

    if !response.status().is_success() {
        return Err(VmdashError::Transport {
            url,
            message: format!("HTTP {}", response.status()),
        });
    }

    let body = response.text().map_err(|e| http::transport_error(&url, &e))?;
    let batch = payload::decode_batch(&body, config.malformed_policy)?;
    tracing::info!(%url, samples = batch.len(), "snapshot fetched");
    Ok(batch)
}
