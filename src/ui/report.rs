//! Printable report preview

use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let Some(report) = &app.state.report else {
        return;
    };
    let paragraph = Paragraph::new(report.render_text())
        .block(
            Block::default()
                .title(format!(" {} ", report.title()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .scroll((app.state.scroll_offset as u16, 0));
    frame.render_widget(paragraph, area);
}
