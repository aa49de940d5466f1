//! Bar charts for CPU and memory.
//!
//! Bars need integer heights, so CPU is plotted in millicores and memory
//! in whole megabytes. The text on each bar is the unrounded dataset value
//! formatted for reading.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders};

use vmdash_common::types::format_fixed;

use crate::renderer::BarChartModel;

const BAR_GAP: u16 = 1;
const MAX_BAR_WIDTH: u16 = 12;

/// Renders the CPU chart.
pub fn render_cpu_chart(frame: &mut Frame, area: Rect, chart: &BarChartModel) {
    render_chart(frame, area, chart, 1000.0, 3, Color::Cyan);
}

/// Renders the memory chart.
pub fn render_memory_chart(frame: &mut Frame, area: Rect, chart: &BarChartModel) {
    render_chart(frame, area, chart, 1.0, 1, Color::Magenta);
}

fn render_chart(
    frame: &mut Frame,
    area: Rect,
    chart: &BarChartModel,
    scale: f64,
    decimals: usize,
    color: Color,
) {
    let bars: Vec<Bar> = chart
        .labels()
        .iter()
        .zip(chart.data())
        .map(|(label, value)| {
            Bar::default()
                .value(bar_height(*value, scale))
                .label(Line::from(label.as_str()))
                .text_value(format_fixed(*value, decimals))
        })
        .collect();

    let max = bars_max(chart.data(), scale);
    let widget = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", chart.title())),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width(area.width.saturating_sub(2), bars.len()))
        .bar_gap(BAR_GAP)
        .bar_style(Style::default().fg(color))
        .max(max);

    frame.render_widget(widget, area);
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bar_height(value: f64, scale: f64) -> u64 {
    (value * scale).round().max(0.0) as u64
}

fn bars_max(data: &[f64], scale: f64) -> u64 {
    data.iter().map(|v| bar_height(*v, scale)).max().unwrap_or(0).max(1)
}

/// Widest bar that still fits every bar into `inner_width` columns.
fn bar_width(inner_width: u16, bars: usize) -> u16 {
    let Ok(count) = u16::try_from(bars) else {
        return 1;
    };
    if count == 0 {
        return MAX_BAR_WIDTH;
    }
    ((inner_width + BAR_GAP) / count)
        .saturating_sub(BAR_GAP)
        .clamp(1, MAX_BAR_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_heights_are_millicores() {
        assert_eq!(bar_height(1.23456, 1000.0), 1235);
        assert_eq!(bar_height(0.0, 1000.0), 0);
    }

    #[test]
    fn max_is_never_zero() {
        assert_eq!(bars_max(&[], 1.0), 1);
        assert_eq!(bars_max(&[0.0, 0.2], 1.0), 1);
        assert_eq!(bars_max(&[2.0, 7.6], 1.0), 8);
    }

    #[test]
    fn bar_width_shrinks_with_count() {
        assert_eq!(bar_width(40, 2), 12);
        assert_eq!(bar_width(40, 10), 3);
        assert_eq!(bar_width(10, 50), 1);
        assert_eq!(bar_width(40, 0), MAX_BAR_WIDTH);
    }
}
