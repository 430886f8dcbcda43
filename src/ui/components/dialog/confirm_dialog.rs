//! Confirmation dialog for deleting a membership

use super::base::{centered_rect, key_hint};
use crate::state::PendingDeleteAction;
use crate::ui::widgets::truncate_string;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Render a confirmation dialog for delete action
pub fn render_confirm_dialog(frame: &mut Frame, action: &PendingDeleteAction) {
    let dialog_width = 50u16;
    let dialog_area = centered_rect(frame.area(), dialog_width, 11);

    // Clear the area behind the dialog
    frame.render_widget(Clear, dialog_area);

    let max_display_len = (dialog_width - 6) as usize;
    let display_text = truncate_string(&action.display_name, max_display_len);

    let mut content = vec![
        Line::from(Span::styled(
            "Confirm Delete",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Permanently delete membership",
            Style::default().fg(Color::White),
        )),
        Line::from(vec![
            Span::styled(
                format!("{} ", action.membership_id),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(display_text, Style::default().fg(Color::White)),
        ]),
        Line::from(""),
    ];

    // Cancel first, so a stray Enter is harmless
    let options = [(false, "Cancel", Color::White), (true, "Delete", Color::Red)];
    for (is_delete, label, base_color) in options {
        let is_selected = action.selected_option == is_delete;
        let prefix = if is_selected { "▸ " } else { "  " };
        let style = if is_selected {
            Style::default().fg(base_color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        content.push(Line::from(Span::styled(format!("{prefix}{label}"), style)));
    }

    content.push(Line::from(""));
    content.push(key_hint(&[("↑↓", "select"), ("Enter", "confirm"), ("Esc", "cancel")]));

    let dialog = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::new().bg(Color::Black).fg(Color::White));

    frame.render_widget(dialog, dialog_area);
}
