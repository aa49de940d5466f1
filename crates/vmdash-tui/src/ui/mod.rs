//! Frame layout and widgets.

pub mod dashboard;
pub mod metrics;
pub mod table;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::app::App;

/// Height of the chart row, borders included.
const CHART_HEIGHT: u16 = 14;

/// Draws the whole dashboard: status line, results table, then the CPU
/// and memory charts side by side.
pub fn draw(frame: &mut Frame, app: &App) {
    let [status, body, charts] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(CHART_HEIGHT),
    ])
    .areas(frame.area());
    let [cpu, memory] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(charts);

    dashboard::render_status(frame, status, app);
    table::render_table(frame, body, app);
    metrics::render_cpu_chart(frame, cpu, app.renderer().cpu_chart());
    metrics::render_memory_chart(frame, memory, app.renderer().memory_chart());
}
