//! Status line across the top of the dashboard.
//!
//! Shows the source, connection state, time of the last batch and the
//! most recent error.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, ConnectionStatus};

/// Renders the status line.
pub fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let (state, color) = match &app.status {
        ConnectionStatus::Connecting => ("connecting".to_string(), Color::Yellow),
        ConnectionStatus::Connected => ("live".to_string(), Color::Green),
        ConnectionStatus::Reconnecting { retry_in } => (
            format!("reconnecting in {:.1}s", retry_in.as_secs_f64()),
            Color::Yellow,
        ),
        ConnectionStatus::Finished => ("disconnected".to_string(), Color::Red),
    };

    let mut spans = vec![
        Span::styled(" vmdash ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(app.source.clone()),
        Span::raw("  "),
        Span::styled(format!("[{state}]"), Style::default().fg(color)),
    ];

    if let Some(at) = app.last_update {
        spans.push(Span::raw(format!("  updated {}", at.format("%H:%M:%S"))));
    }
    if app.skipped > 0 {
        spans.push(Span::styled(
            format!("  {} skipped", app.skipped),
            Style::default().fg(Color::Yellow),
        ));
    }
    if let Some(error) = &app.last_error {
        spans.push(Span::styled(format!("  {error}"), Style::default().fg(Color::Red)));
    }
    spans.push(Span::styled("  q quit", Style::default().add_modifier(Modifier::DIM)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
