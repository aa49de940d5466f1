//! Domain primitive types used across the vmdash workspace.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{BYTES_PER_MB, CPU_DECIMALS, MEMORY_DECIMALS};
use crate::error::VmdashError;

/// One virtual machine's reported CPU and memory usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VmMetricSample {
    /// VM name, unique within a batch.
    pub name: String,
    /// Namespace the VM lives in.
    pub namespace: String,
    /// CPU usage in cores.
    pub cpu: f64,
    /// Memory usage in bytes.
    pub memory: u64,
}

impl VmMetricSample {
    /// Creates a new sample.
    #[must_use]
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, cpu: f64, memory: u64) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            cpu,
            memory,
        }
    }

    /// Memory usage converted to megabytes, unrounded.
    #[must_use]
    pub fn memory_mb(&self) -> f64 {
        bytes_to_mb(self.memory)
    }

    /// CPU usage as shown in the results table.
    #[must_use]
    pub fn cpu_display(&self) -> String {
        format_fixed(self.cpu, CPU_DECIMALS)
    }

    /// Memory usage in megabytes as shown in the results table.
    #[must_use]
    pub fn memory_display(&self) -> String {
        format_fixed(self.memory_mb(), MEMORY_DECIMALS)
    }
}

/// Formats `value` with `decimals` digits, rounding halfway cases away
/// from zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
#[must_use]
pub fn format_fixed(value: f64, decimals: usize) -> String {
    let scale = 10_f64.powi(decimals as i32);
    format!("{:.*}", decimals, (value * scale).round() / scale)
}

/// Converts a byte count to megabytes (1 MB = 1,048,576 bytes).
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB as f64
}

/// The full ordered sequence of samples delivered by one update event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsBatch {
    samples: Vec<VmMetricSample>,
    skipped: usize,
}

impl MetricsBatch {
    /// Creates a batch from already validated samples.
    #[must_use]
    pub const fn new(samples: Vec<VmMetricSample>) -> Self {
        Self { samples, skipped: 0 }
    }

    /// Creates a batch recording how many malformed entries were dropped.
    #[must_use]
    pub const fn with_skipped(samples: Vec<VmMetricSample>, skipped: usize) -> Self {
        Self { samples, skipped }
    }

    /// Samples in arrival order.
    #[must_use]
    pub fn samples(&self) -> &[VmMetricSample] {
        &self.samples
    }

    /// Number of samples in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the batch carries no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of entries dropped under [`MalformedPolicy::Skip`].
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    /// Consumes the batch, returning its samples.
    #[must_use]
    pub fn into_samples(self) -> Vec<VmMetricSample> {
        self.samples
    }
}

/// What to do with a sample that fails validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Reject the whole batch; nothing is rendered.
    #[default]
    Abort,
    /// Drop the offending sample and render the rest.
    Skip,
}

impl fmt::Display for MalformedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abort => write!(f, "abort"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

impl FromStr for MalformedPolicy {
    type Err = VmdashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            other => Err(VmdashError::Config {
                message: format!("unknown malformed-sample policy '{other}' (expected abort or skip)"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_mb_divides_by_mebibyte() {
        let s = VmMetricSample::new("vm1", "default", 0.0, 2_097_152);
        assert!((s.memory_mb() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn cpu_display_rounds_to_three_places() {
        let s = VmMetricSample::new("vm1", "default", 1.23456, 0);
        assert_eq!(s.cpu_display(), "1.235");
    }

    #[test]
    fn cpu_display_pads_zeros() {
        let s = VmMetricSample::new("vm1", "default", 2.0, 0);
        assert_eq!(s.cpu_display(), "2.000");
    }

    #[test]
    fn memory_display_rounds_to_one_place() {
        let s = VmMetricSample::new("vm1", "default", 0.0, 1_572_864);
        assert_eq!(s.memory_display(), "1.5");
        let s = VmMetricSample::new("vm2", "default", 0.0, 0);
        assert_eq!(s.memory_display(), "0.0");
    }

    #[test]
    fn halfway_memory_rounds_up() {
        let s = VmMetricSample::new("vm1", "default", 0.0, 1_310_720);
        assert_eq!(s.memory_display(), "1.3");
    }

    #[test]
    fn halfway_cpu_rounds_up() {
        let s = VmMetricSample::new("vm1", "default", 0.0625, 0);
        assert_eq!(s.cpu_display(), "0.063");
    }

    #[test]
    fn format_fixed_keeps_non_halfway_values() {
        assert_eq!(format_fixed(1.23456, 3), "1.235");
        assert_eq!(format_fixed(0.0, 1), "0.0");
        assert_eq!(format_fixed(2.5, 0), "3");
    }

    #[test]
    fn batch_reports_length_and_skips() {
        let batch = MetricsBatch::with_skipped(vec![VmMetricSample::new("a", "ns", 0.1, 1)], 2);
        assert_eq!(batch.len(), 1);
        assert!(!batch.is_empty());
        assert_eq!(batch.skipped(), 2);
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("Skip".parse::<MalformedPolicy>().ok(), Some(MalformedPolicy::Skip));
        assert_eq!("abort".parse::<MalformedPolicy>().ok(), Some(MalformedPolicy::Abort));
        assert!("ignore".parse::<MalformedPolicy>().is_err());
    }

    #[test]
    fn policy_defaults_to_abort() {
        assert_eq!(MalformedPolicy::default(), MalformedPolicy::Abort);
        assert_eq!(MalformedPolicy::Skip.to_string(), "skip");
    }
}
