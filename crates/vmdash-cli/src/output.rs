//! Plain-text output helpers for CLI commands.
//!
//! Renders the results table with aligned columns: names left-aligned,
//! numbers right-aligned.

use std::fmt::Write;

use chrono::{DateTime, Local};
use vmdash_tui::renderer::ResultsTable;

const HEADERS: [&str; 4] = ["NAME", "NAMESPACE", "CPU (cores)", "MEMORY (MB)"];

/// Formats the table, one line per row, header first.
#[must_use]
pub fn format_table(table: &ResultsTable) -> String {
    let mut widths = HEADERS.map(str::len);
    for row in table.rows() {
        for (width, cell) in widths
            .iter_mut()
            .zip([&row.name, &row.namespace, &row.cpu, &row.memory])
        {
            *width = (*width).max(cell.chars().count());
        }
    }
    let [w_name, w_ns, w_cpu, w_mem] = widths;

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<w_name$}  {:<w_ns$}  {:>w_cpu$}  {:>w_mem$}",
        HEADERS[0], HEADERS[1], HEADERS[2], HEADERS[3]
    );
    if table.is_empty() {
        out.push_str("(no virtual machines)\n");
        return out;
    }
    for row in table.rows() {
        let _ = writeln!(
            out,
            "{:<w_name$}  {:<w_ns$}  {:>w_cpu$}  {:>w_mem$}",
            row.name, row.namespace, row.cpu, row.memory
        );
    }
    out
}

/// One-line banner printed above each batch.
#[must_use]
pub fn batch_header(sequence: usize, received_at: DateTime<Local>, skipped: usize) -> String {
    let mut header = format!("# batch {sequence} at {}", received_at.format("%Y-%m-%d %H:%M:%S"));
    if skipped > 0 {
        let _ = write!(header, " ({skipped} skipped)");
    }
    header
}

#[cfg(test)]
mod tests {
    use vmdash_common::types::{MetricsBatch, VmMetricSample};
    use vmdash_tui::renderer::MetricsRenderer;

    use super::*;

    fn render(samples: Vec<VmMetricSample>) -> String {
        let mut renderer = MetricsRenderer::new();
        renderer.apply(&MetricsBatch::new(samples));
        format_table(renderer.table())
    }

    #[test]
    fn format_table_aligns_columns() {
        let text = render(vec![
            VmMetricSample::new("vm1", "default", 1.23456, 2_097_152),
            VmMetricSample::new("database-primary", "prod", 12.0, 8_589_934_592),
        ]);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "NAME              NAMESPACE  CPU (cores)  MEMORY (MB)"
        );
        assert_eq!(
            lines[1],
            "vm1               default          1.235          2.0"
        );
        assert_eq!(
            lines[2],
            "database-primary  prod            12.000       8192.0"
        );
    }

    #[test]
    fn format_table_empty_batch() {
        let text = render(Vec::new());
        assert!(text.ends_with("(no virtual machines)\n"));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn batch_header_mentions_skips() {
        let at = Local::now();
        assert!(!batch_header(1, at, 0).contains("skipped"));
        assert!(batch_header(2, at, 3).ends_with("(3 skipped)"));
    }
}
