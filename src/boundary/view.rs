//! Fallback screen
//!
//! What a failed boundary draws in place of its child: a headline, a short
//! explanation, the recovery actions, and in debug builds the captured
//! fault details.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use super::FaultState;

pub fn render_default_fallback(frame: &mut Frame<'_>, area: Rect, state: &FaultState) {
    // Clear first so nothing the failed child managed to draw shows through.
    frame.render_widget(Clear, area);
    let paragraph = Paragraph::new(fallback_lines(state))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Lines of the default fallback screen. Pure so tests can check the copy
/// without a terminal.
pub fn fallback_lines(state: &FaultState) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            "Something went wrong",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("We encountered an unexpected error. This has been logged and we'll look into it."),
        Line::from(""),
    ];

    if cfg!(debug_assertions) {
        if let Some(report) = state.fault() {
            let detail_style = Style::default().fg(Color::DarkGray);
            lines.push(Line::from(Span::styled(
                "Error Details (Development)",
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                report.message.clone(),
                detail_style,
            )));
            if let Some(location) = &report.location {
                lines.push(Line::from(Span::styled(
                    format!("at {location}"),
                    detail_style,
                )));
            }
            if !report.component_trace.is_empty() {
                lines.push(Line::from(Span::styled("Component Stack:", detail_style)));
                for trace_line in report.component_trace.lines() {
                    lines.push(Line::from(Span::styled(
                        trace_line.to_string(),
                        detail_style,
                    )));
                }
            }
            if let Some(backtrace) = &report.backtrace {
                lines.push(Line::from(Span::styled("Stack Trace:", detail_style)));
                for backtrace_line in backtrace.lines() {
                    lines.push(Line::from(Span::styled(
                        backtrace_line.to_string(),
                        detail_style,
                    )));
                }
            }
            lines.push(Line::from(""));
        }
    }

    let mut actions: Vec<Span<'static>> = Vec::new();
    if state.attempts_left() > 0 {
        actions.push(key_span("r"));
        actions.push(Span::raw(format!(
            " Try Again ({} left)    ",
            state.attempts_left()
        )));
    }
    actions.push(key_span("R"));
    actions.push(Span::raw(" Reset    "));
    actions.push(key_span("h"));
    actions.push(Span::raw(" Home"));
    lines.push(Line::from(actions));

    if state.attempts_left() == 0 {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Maximum retry attempts reached. Please reset or return home.",
            Style::default().fg(Color::Yellow),
        )));
    }

    lines
}

fn key_span(key: &str) -> Span<'static> {
    Span::styled(
        format!("[{key}]"),
        Style::default().add_modifier(Modifier::BOLD),
    )
}
