//! Button component for TUI

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Button height in rows (top border + content + bottom border)
pub const BUTTON_HEIGHT: u16 = 3;

/// Render a generic button with border
pub fn render_button(frame: &mut Frame, area: Rect, content: Line, is_enabled: bool, color: Color) {
    let border_style = if is_enabled {
        Style::default().fg(color)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let paragraph = Paragraph::new(content);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(paragraph.block(block), area);
}

/// Render an action button showing its label and the shortcut that runs it
pub fn render_action_button(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    shortcut: &str,
    is_enabled: bool,
    color: Color,
) {
    let label_style = if is_enabled {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let content = Line::from(vec![
        Span::styled(format!(" {label} "), label_style),
        Span::styled(shortcut.to_string(), Style::default().fg(Color::DarkGray)),
    ]);
    render_button(frame, area, content, is_enabled, color);
}
