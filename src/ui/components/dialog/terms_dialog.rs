//! Terms and conditions dialog

use super::base::{centered_rect, key_hint};
use crate::catalogue::{terms_width, TERMS_LINES};
use crate::state::TermsState;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Render the terms with their scroll position. Accept is only offered once
/// the last line has been shown.
pub fn render_terms_dialog(frame: &mut Frame, terms: &TermsState, accepted: bool) {
    let rows = terms.visible_rows() as u16;
    // border, title, blank, text, blank, status, hint, border
    let height = rows + 7;
    let width = terms_width() as u16 + 6;
    let dialog_area = centered_rect(frame.area(), width, height);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),    // Title
            Constraint::Length(rows), // Terms
            Constraint::Length(1),    // Spacer
            Constraint::Length(1),    // Status
            Constraint::Length(1),    // Hint
        ])
        .horizontal_margin(1)
        .split(inner);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "Terms & Conditions",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))),
        chunks[0],
    );

    let text: Vec<Line> = TERMS_LINES.iter().map(|l| Line::from(*l)).collect();
    frame.render_widget(
        Paragraph::new(text).scroll((terms.scroll() as u16, 0)),
        chunks[1],
    );

    let mut scrollbar_state = ScrollbarState::new(
        TERMS_LINES.len().saturating_sub(terms.visible_rows()),
    )
    .position(terms.scroll());
    frame.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight),
        chunks[1],
        &mut scrollbar_state,
    );

    let status = if !terms.can_accept() {
        Span::styled(
            "Please scroll to the bottom to continue",
            Style::default().fg(Color::Yellow),
        )
    } else if accepted {
        Span::styled("Accepted", Style::default().fg(Color::Green))
    } else {
        Span::styled("Not accepted yet", Style::default().fg(Color::Gray))
    };
    frame.render_widget(Paragraph::new(Line::from(status)), chunks[3]);

    let hint = if terms.can_accept() {
        key_hint(&[("Enter", "accept"), ("n", "decline"), ("Esc", "close")])
    } else {
        key_hint(&[("↓/PgDn", "scroll"), ("End", "last line"), ("Esc", "close")])
    };
    frame.render_widget(Paragraph::new(hint), chunks[4]);
}
