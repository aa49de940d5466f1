//! Results table: one row per VM in the current batch.

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::app::App;

const HEADERS: [&str; 4] = ["NAME", "NAMESPACE", "CPU (cores)", "MEMORY (MB)"];

/// Renders the results table, or a placeholder until the first batch.
pub fn render_table(frame: &mut Frame, area: Rect, app: &App) {
    let table = app.renderer().table();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Virtual Machines ({}) ", table.len()));

    if app.last_update.is_none() {
        frame.render_widget(Paragraph::new("waiting for metrics...").block(block), area);
        return;
    }

    let header = HEADERS
        .iter()
        .map(|h| Cell::from(*h))
        .collect::<Row>()
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows = table.rows().iter().map(|row| {
        Row::new([
            Cell::from(row.name.as_str()),
            Cell::from(row.namespace.as_str()),
            Cell::from(row.cpu.as_str()),
            Cell::from(row.memory.as_str()),
        ])
    });

    let widget = Table::new(
        rows,
        [
            Constraint::Percentage(35),
            Constraint::Percentage(25),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default();
    if !table.is_empty() {
        state.select(Some(app.selected_index));
    }
    frame.render_stateful_widget(widget, area, &mut state);
}
