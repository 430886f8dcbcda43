//! Confirmation screen shown after a successful submission

use crate::admin::format_inr;
use crate::app::App;
use crate::gateway::{parse_leading_int, FlatFields};
use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Summary rows: label and the flattened fields joined to build the value
const SUMMARY: &[(&str, &[&str])] = &[
    ("Member", &["salutation", "firstName", "lastName"]),
    ("Email", &["contactEmail"]),
    ("Mobile", &["contactMobile"]),
    ("City", &["city"]),
    ("Category", &["membershipCategory"]),
    ("Years", &["membershipYears"]),
    ("Payment", &["paymentMode"]),
];

fn joined(data: &FlatFields, app: &App, names: &[&str]) -> String {
    names
        .iter()
        .filter_map(|name| {
            let text = data.get(*name)?.as_text()?;
            let field = app.wizard.catalogue().field(name);
            Some(
                field
                    .and_then(|f| f.option_label(text))
                    .unwrap_or(text)
                    .to_string(),
            )
        })
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let Some(receipt) = app.wizard.receipt() else {
        return;
    };

    let block = Block::default()
        .title(" Application Received ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let label_style = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::from(Span::styled(
            "Thank you! Your membership application has been submitted.",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{:<14}", "Membership ID"), label_style),
            Span::styled(
                receipt.id.clone(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled(format!("{:<14}", "Submitted"), label_style),
            Span::raw(
                receipt
                    .submitted_at
                    .with_timezone(&Local)
                    .format("%d %b %Y, %I:%M %p")
                    .to_string(),
            ),
        ]),
        Line::from(vec![
            Span::styled(format!("{:<14}", "Status"), label_style),
            Span::styled(receipt.status.to_uppercase(), Style::default().fg(Color::Yellow)),
        ]),
        Line::from(""),
    ];

    for (label, names) in SUMMARY {
        let value = joined(&receipt.data, app, names);
        if value.is_empty() {
            continue;
        }
        lines.push(Line::from(vec![
            Span::styled(format!("{label:<14}"), label_style),
            Span::raw(value),
        ]));
    }
    if let Some(price) = receipt
        .data
        .get("membershipPrice")
        .and_then(|v| v.as_text())
        .and_then(parse_leading_int)
    {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<14}", "Amount"), label_style),
            Span::raw(format_inr(price)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Our membership team will contact you shortly. Keep your membership ID for reference.",
        label_style,
    )));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0)])
        .margin(1)
        .split(inner);
    frame.render_widget(Paragraph::new(lines), chunks[0]);
}
