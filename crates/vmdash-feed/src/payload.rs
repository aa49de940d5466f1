//! Payload decoding and sample validation.
//!
//! Accepts either a bare JSON array of samples or the `{"vms": [...]}`
//! envelope served by the snapshot endpoint. Extra fields on a sample are
//! ignored.

use serde_json::{Map, Value};
use vmdash_common::constants::SNAPSHOT_ENVELOPE_KEY;
use vmdash_common::error::{Result, VmdashError};
use vmdash_common::types::{MalformedPolicy, MetricsBatch, VmMetricSample};

/// Decodes the data of one event into a batch.
///
/// # Errors
///
/// Returns `Serialization` if the data is not JSON, `Protocol` if it is
/// neither an array nor an envelope, and `MalformedSample` for the first
/// invalid entry under [`MalformedPolicy::Abort`].
pub fn decode_batch(data: &str, policy: MalformedPolicy) -> Result<MetricsBatch> {
    let value: Value = serde_json::from_str(data)?;
    let entries = into_entries(value)?;

    let mut samples = Vec::with_capacity(entries.len());
    let mut skipped = 0;
    for (index, entry) in entries.iter().enumerate() {
        match parse_sample(index, entry) {
            Ok(sample) => samples.push(sample),
            Err(e) => match policy {
                MalformedPolicy::Abort => return Err(e),
                MalformedPolicy::Skip => {
                    tracing::warn!(error = %e, "skipping malformed sample");
                    skipped += 1;
                }
            },
        }
    }
    Ok(MetricsBatch::with_skipped(samples, skipped))
}

fn into_entries(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Array(entries) => Ok(entries),
        Value::Object(mut object) => match object.remove(SNAPSHOT_ENVELOPE_KEY) {
            Some(Value::Array(entries)) => Ok(entries),
            _ => Err(VmdashError::Protocol {
                message: format!("object payload has no '{SNAPSHOT_ENVELOPE_KEY}' array"),
            }),
        },
        other => Err(VmdashError::Protocol {
            message: format!("expected an array of samples, got {}", kind(&other)),
        }),
    }
}

/// Validates a single entry.
///
/// # Errors
///
/// Returns `MalformedSample` naming the first missing or invalid field.
pub fn parse_sample(index: usize, entry: &Value) -> Result<VmMetricSample> {
    let object = entry.as_object().ok_or_else(|| VmdashError::MalformedSample {
        index,
        reason: format!("expected an object, got {}", kind(entry)),
    })?;

    let name = string_field(index, object, "name")?;
    let namespace = string_field(index, object, "namespace")?;

    let cpu = number_field(index, object, "cpu")?;
    if cpu < 0.0 || !cpu.is_finite() {
        return Err(malformed(index, format!("cpu must be a non-negative number, got {cpu}")));
    }

    let memory = memory_field(index, object)?;

    Ok(VmMetricSample {
        name,
        namespace,
        cpu,
        memory,
    })
}

fn string_field(index: usize, object: &Map<String, Value>, field: &str) -> Result<String> {
    match object.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(malformed(index, format!("{field} must be a string, got {}", kind(other)))),
        None => Err(malformed(index, format!("missing field {field}"))),
    }
}

fn number_field(index: usize, object: &Map<String, Value>, field: &str) -> Result<f64> {
    match object.get(field) {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| malformed(index, format!("{field} is not representable as f64"))),
        Some(other) => Err(malformed(index, format!("{field} must be a number, got {}", kind(other)))),
        None => Err(malformed(index, format!("missing field {field}"))),
    }
}

/// Memory arrives as an integer byte count, or as a float from producers
/// that compute it in floating point. Floats are rounded to whole bytes.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn memory_field(index: usize, object: &Map<String, Value>) -> Result<u64> {
    if let Some(bytes) = object.get("memory").and_then(Value::as_u64) {
        return Ok(bytes);
    }
    let memory = number_field(index, object, "memory")?;
    if memory < 0.0 || !memory.is_finite() {
        return Err(malformed(index, format!("memory must be a non-negative byte count, got {memory}")));
    }
    Ok(memory.round() as u64)
}

fn malformed(index: usize, reason: String) -> VmdashError {
    VmdashError::MalformedSample { index, reason }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_array_is_decoded_in_order() {
        let data = r#"[
            {"name": "vm1", "namespace": "default", "cpu": 1.23456, "memory": 2097152},
            {"name": "vm2", "namespace": "dev", "cpu": 0, "memory": 0}
        ]"#;
        let batch = decode_batch(data, MalformedPolicy::Abort).expect("decode");
        let names: Vec<_> = batch.samples().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["vm1", "vm2"]);
        assert_eq!(batch.samples()[0].memory, 2_097_152);
        assert!((batch.samples()[1].cpu - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn envelope_with_extra_fields_is_accepted() {
        let data = r#"{"vms": [{"name": "vm1", "namespace": "default", "status": "Running",
            "ready": true, "runStrategy": "Always", "cpu": 0.5, "memory": 1048576}]}"#;
        let batch = decode_batch(data, MalformedPolicy::Abort).expect("decode");
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.samples()[0].namespace, "default");
    }

    #[test]
    fn float_memory_is_rounded_to_bytes() {
        let data = r#"[{"name": "vm1", "namespace": "ns", "cpu": 0.1, "memory": 2097152.0}]"#;
        let batch = decode_batch(data, MalformedPolicy::Abort).expect("decode");
        assert_eq!(batch.samples()[0].memory, 2_097_152);
    }

    #[test]
    fn empty_array_is_empty_batch() {
        let batch = decode_batch("[]", MalformedPolicy::Abort).expect("decode");
        assert!(batch.is_empty());
    }

    #[test]
    fn abort_rejects_batch_on_missing_field() {
        let data = r#"[
            {"name": "vm1", "namespace": "default", "cpu": 0.1, "memory": 1},
            {"name": "vm2", "namespace": "default", "memory": 1}
        ]"#;
        let err = decode_batch(data, MalformedPolicy::Abort).expect_err("should abort");
        match err {
            VmdashError::MalformedSample { index, reason } => {
                assert_eq!(index, 1);
                assert!(reason.contains("cpu"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn skip_drops_only_invalid_entries() {
        let data = r#"[
            {"name": "vm1", "namespace": "default", "cpu": 0.1, "memory": 1},
            {"name": "vm2", "namespace": "default", "cpu": "high", "memory": 1},
            {"name": "vm3", "namespace": "default", "cpu": 0.3, "memory": -5},
            {"name": "vm4", "namespace": "default", "cpu": 0.4, "memory": 4}
        ]"#;
        let batch = decode_batch(data, MalformedPolicy::Skip).expect("decode");
        let names: Vec<_> = batch.samples().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["vm1", "vm4"]);
        assert_eq!(batch.skipped(), 2);
    }

    #[test]
    fn negative_cpu_is_malformed() {
        let entry: Value = serde_json::json!({"name": "vm1", "namespace": "ns", "cpu": -0.5, "memory": 1});
        assert!(parse_sample(0, &entry).is_err());
    }

    #[test]
    fn non_string_name_is_malformed() {
        let entry: Value = serde_json::json!({"name": 7, "namespace": "ns", "cpu": 0.5, "memory": 1});
        let err = parse_sample(3, &entry).expect_err("should fail");
        assert!(err.to_string().contains("index 3"));
    }

    #[test]
    fn invalid_json_is_serialization_error() {
        assert!(matches!(
            decode_batch("not json", MalformedPolicy::Skip),
            Err(VmdashError::Serialization { .. })
        ));
    }

    #[test]
    fn scalar_payload_is_protocol_error_even_when_skipping() {
        assert!(matches!(
            decode_batch("42", MalformedPolicy::Skip),
            Err(VmdashError::Protocol { .. })
        ));
        assert!(matches!(
            decode_batch(r#"{"items": []}"#, MalformedPolicy::Skip),
            Err(VmdashError::Protocol { .. })
        ));
    }
}
