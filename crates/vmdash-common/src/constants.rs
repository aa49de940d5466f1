//! System-wide constants and default endpoints.

use std::path::PathBuf;

/// Number of bytes in one megabyte as displayed by the dashboard.
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Decimal digits shown for CPU cores in the results table.
pub const CPU_DECIMALS: usize = 3;

/// Decimal digits shown for memory megabytes in the results table.
pub const MEMORY_DECIMALS: usize = 1;

/// Name of the realtime event carrying a metrics batch.
pub const DEFAULT_EVENT_NAME: &str = "metrics_update";

/// Event name assigned by the SSE decoder when no `event:` field is present.
pub const DEFAULT_SSE_EVENT_NAME: &str = "message";

/// Base URL of the metrics producer.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Path of the server-sent events stream on the producer.
pub const DEFAULT_STREAM_PATH: &str = "/events";

/// Path of the one-shot snapshot endpoint on the producer.
pub const SNAPSHOT_PATH: &str = "/api/vms";

/// Envelope key wrapping the sample array in snapshot responses.
pub const SNAPSHOT_ENVELOPE_KEY: &str = "vms";

/// Reconnection delay used until the server sends a `retry:` field.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 3000;

/// Capacity of the bounded channel between producers and the UI loop.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;

/// Terminal input poll interval.
pub const DEFAULT_TICK_RATE_MS: u64 = 250;

/// Title of the CPU bar chart.
pub const CPU_CHART_TITLE: &str = "CPU Usage (cores)";

/// Title of the memory bar chart.
pub const MEMORY_CHART_TITLE: &str = "Memory Usage (MB)";

/// Application name used in CLI output and log files.
pub const APP_NAME: &str = "vmdash";

/// Environment variable overriding the producer base URL.
pub const URL_ENV: &str = "VMDASH_URL";

/// Environment variable overriding the subscribed event name.
pub const EVENT_ENV: &str = "VMDASH_EVENT";

/// Returns the default log file used while the full-screen dashboard owns
/// the terminal.
pub fn default_log_file() -> PathBuf {
    std::env::temp_dir().join(format!("{APP_NAME}.log"))
}
