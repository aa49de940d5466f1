//! The metrics renderer.
//!
//! Owns the results table and the two chart models. Every batch fully
//! replaces what was there before; nothing is carried between batches.

use vmdash_common::constants::{CPU_CHART_TITLE, MEMORY_CHART_TITLE};
use vmdash_common::types::{MetricsBatch, VmMetricSample};

/// One formatted row of the results table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// VM name, as received.
    pub name: String,
    /// Namespace, as received.
    pub namespace: String,
    /// Cores, three decimals.
    pub cpu: String,
    /// Megabytes, one decimal.
    pub memory: String,
}

impl From<&VmMetricSample> for TableRow {
    fn from(sample: &VmMetricSample) -> Self {
        Self {
            name: sample.name.clone(),
            namespace: sample.namespace.clone(),
            cpu: sample.cpu_display(),
            memory: sample.memory_display(),
        }
    }
}

/// Rows currently shown in the results table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultsTable {
    rows: Vec<TableRow>,
}

impl ResultsTable {
    /// Rows in display order.
    #[must_use]
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn clear(&mut self) {
        self.rows.clear();
    }

    fn push(&mut self, row: TableRow) {
        self.rows.push(row);
    }
}

/// A bar chart with one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChartModel {
    title: &'static str,
    labels: Vec<String>,
    data: Vec<f64>,
    revision: u64,
}

impl BarChartModel {
    fn new(title: &'static str) -> Self {
        Self {
            title,
            labels: Vec::new(),
            data: Vec::new(),
            revision: 0,
        }
    }

    /// Chart title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        self.title
    }

    /// Bar labels.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Dataset values, unrounded.
    #[must_use]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Number of redraws requested so far.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    fn replace(&mut self, labels: Vec<String>, data: Vec<f64>) {
        self.labels = labels;
        self.data = data;
    }

    fn request_redraw(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

/// Maps batches onto the table and both charts.
#[derive(Debug, Clone)]
pub struct MetricsRenderer {
    table: ResultsTable,
    cpu_chart: BarChartModel,
    memory_chart: BarChartModel,
    dirty: bool,
}

impl MetricsRenderer {
    /// Creates a renderer with an empty table and empty charts.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: ResultsTable::default(),
            cpu_chart: BarChartModel::new(CPU_CHART_TITLE),
            memory_chart: BarChartModel::new(MEMORY_CHART_TITLE),
            dirty: true,
        }
    }

    /// Replaces the table rows and both charts' data with `batch`.
    pub fn apply(&mut self, batch: &MetricsBatch) {
        let samples = batch.samples();

        self.table.clear();
        for sample in samples {
            self.table.push(TableRow::from(sample));
        }

        let names: Vec<String> = samples.iter().map(|s| s.name.clone()).collect();

        self.cpu_chart
            .replace(names.clone(), samples.iter().map(|s| s.cpu).collect());
        self.cpu_chart.request_redraw();

        self.memory_chart
            .replace(names, samples.iter().map(VmMetricSample::memory_mb).collect());
        self.memory_chart.request_redraw();

        self.dirty = true;
        tracing::debug!(rows = self.table.len(), "batch rendered");
    }

    /// Current table contents.
    #[must_use]
    pub const fn table(&self) -> &ResultsTable {
        &self.table
    }

    /// CPU chart, values in cores.
    #[must_use]
    pub const fn cpu_chart(&self) -> &BarChartModel {
        &self.cpu_chart
    }

    /// Memory chart, values in megabytes.
    #[must_use]
    pub const fn memory_chart(&self) -> &BarChartModel {
        &self.memory_chart
    }

    /// Whether a redraw has been requested since the last frame.
    #[must_use]
    pub const fn needs_redraw(&self) -> bool {
        self.dirty
    }

    /// Clears the redraw request after a frame was drawn.
    pub fn mark_drawn(&mut self) {
        self.dirty = false;
    }
}

impl Default for MetricsRenderer {
    fn default() -> Self {
        Self::new()
    }
}
