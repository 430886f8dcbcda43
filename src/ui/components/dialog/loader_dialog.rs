//! Submission progress overlay

use super::base::centered_rect;
use crate::state::LoaderState;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};
use std::time::Instant;

pub fn render_loader_dialog(frame: &mut Frame, loader: &LoaderState) {
    let dialog_area = centered_rect(frame.area(), 50, 7);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(" Submitting ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Message
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Gauge
        ])
        .margin(1)
        .split(inner);

    frame.render_widget(
        Paragraph::new("Submitting your membership application...")
            .style(Style::default().fg(Color::White)),
        chunks[0],
    );

    let ratio = f64::from(loader.progress(Instant::now())).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(Color::Cyan)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .ratio(ratio);
    frame.render_widget(gauge, chunks[2]);
}
