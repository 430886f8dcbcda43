//! Admin console rendering: statistics, member listing and record detail

use super::widgets::{render_scrollable_list, truncate_string};
use crate::admin::{format_inr, PageStats};
use crate::app::App;
use crate::gateway::{AdminListItem, FlatValue, PENDING_STATUS};
use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Draw the member listing with its statistics and pager
pub fn draw_list(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Stats
            Constraint::Length(3), // Search
            Constraint::Min(0),    // Listing
        ])
        .split(area);

    draw_stats(frame, chunks[0], app);
    draw_search(frame, chunks[1], app);
    draw_members(frame, chunks[2], app);
}

fn draw_stats(frame: &mut Frame, area: Rect, app: &App) {
    let stats = app
        .state
        .admin_page
        .as_ref()
        .map(|page| PageStats::compute(page, Local::now().date_naive()))
        .unwrap_or_default();

    let cards = [
        ("Total Members", stats.total_members.to_string(), Color::Cyan),
        ("Pending", stats.pending.to_string(), Color::Yellow),
        ("Revenue (page)", format_inr(stats.revenue), Color::Green),
        ("This Month", stats.this_month.to_string(), Color::Magenta),
    ];
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((label, value, color), rect) in cards.into_iter().zip(chunks.iter()) {
        let card = Paragraph::new(Line::from(vec![
            Span::styled(format!("{label}: "), Style::default().fg(Color::DarkGray)),
            Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(card, *rect);
    }
}

fn draw_search(frame: &mut Frame, area: Rect, app: &App) {
    let active = app.state.search_active;
    let border_color = if active { Color::Cyan } else { Color::DarkGray };
    let mut spans = vec![Span::raw(app.state.search_term.clone())];
    if active {
        spans.push(Span::styled("▌", Style::default().fg(Color::Cyan)));
    } else if app.state.search_term.is_empty() {
        spans.push(Span::styled(
            "Press / to search this page by name, email, ID or city",
            Style::default().fg(Color::DarkGray),
        ));
    }
    let search = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color)),
    );
    frame.render_widget(search, area);
}

fn member_row(item: &AdminListItem) -> Line<'static> {
    let status_color = if item.status == PENDING_STATUS {
        Color::Yellow
    } else {
        Color::Green
    };
    Line::from(vec![
        Span::styled(
            format!("{:<14} ", item.membership_id),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(format!("{:<22} ", truncate_string(&item.name, 22))),
        Span::raw(format!("{:<28} ", truncate_string(&item.email, 28))),
        Span::raw(format!("{:<10} ", item.membership_category.to_uppercase())),
        Span::raw(format!("{:>5} ", item.membership_years)),
        Span::raw(format!("{:>12} ", item.membership_price)),
        Span::raw(format!("{:<14} ", truncate_string(&item.city, 14))),
        Span::styled(format!("{:<9} ", item.status), Style::default().fg(status_color)),
        Span::styled(
            item.submitted_at
                .with_timezone(&Local)
                .format("%d %b %Y")
                .to_string(),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

fn draw_members(frame: &mut Frame, area: Rect, app: &App) {
    let pager = &app.pager;
    let (total, has_more) = app
        .state
        .admin_page
        .as_ref()
        .map(|p| (p.total, p.has_more))
        .unwrap_or((0, false));
    let title = format!(
        " Members  page {}  ({} total{})  sort: {} {} ",
        pager.page_number(),
        total,
        if has_more { ", more" } else { "" },
        pager.sort_field.label(),
        pager.sort_direction.symbol()
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let visible = app.state.visible_items();
    if visible.is_empty() {
        let message = if app.state.search_term.is_empty() {
            "No applications yet."
        } else {
            "No members on this page match the search."
        };
        frame.render_widget(
            Paragraph::new(message)
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            area,
        );
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let header = format!(
        "{:<14} {:<22} {:<28} {:<10} {:>5} {:>12} {:<14} {:<9} {}",
        "ID", "Name", "Email", "Category", "Years", "Price", "City", "Status", "Submitted"
    );
    frame.render_widget(
        Paragraph::new(header).style(
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
        ),
        chunks[0],
    );

    let items: Vec<ListItem> = visible
        .iter()
        .map(|item| ListItem::new(member_row(item)))
        .collect();
    let list = List::new(items).highlight_style(Style::default().bg(Color::DarkGray));
    render_scrollable_list(frame, chunks[1], list, app.state.selected_index);
}

/// Draw every stored field of one member
pub fn draw_detail(frame: &mut Frame, area: Rect, app: &App) {
    let Some(submission) = &app.state.detail else {
        return;
    };
    let catalogue = app.wizard.catalogue();

    let label_style = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("{:<32}", "Membership ID"), label_style),
            Span::styled(
                submission.id.clone(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled(format!("{:<32}", "Submitted"), label_style),
            Span::raw(
                submission
                    .submitted_at
                    .with_timezone(&Local)
                    .format("%d %b %Y, %H:%M")
                    .to_string(),
            ),
        ]),
        Line::from(vec![
            Span::styled(format!("{:<32}", "Status"), label_style),
            Span::raw(submission.status.clone()),
        ]),
        Line::from(""),
    ];

    // Catalogue order first, then anything the catalogue does not know
    let mut names: Vec<&str> = catalogue
        .fields()
        .iter()
        .map(|f| f.name.as_str())
        .filter(|name| submission.fields.contains_key(*name))
        .collect();
    names.extend(
        submission
            .fields
            .keys()
            .map(String::as_str)
            .filter(|name| catalogue.field(name).is_none()),
    );

    for name in names {
        let Some(value) = submission.fields.get(name) else {
            continue;
        };
        let field = catalogue.field(name);
        let label = field.map(|f| f.label.as_str()).unwrap_or(name);
        let option = |v: &str| {
            field
                .and_then(|f| f.option_label(v))
                .unwrap_or(v)
                .to_string()
        };
        let shown = match value {
            FlatValue::Text(text) => option(text.as_str()),
            FlatValue::List(values) => values
                .iter()
                .map(|v| option(v.as_str()))
                .collect::<Vec<_>>()
                .join(", "),
            FlatValue::Flag(true) => "Yes".to_string(),
            FlatValue::Flag(false) => "No".to_string(),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<32}", truncate_string(label, 31)), label_style),
            Span::raw(shown),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(format!(" {} ", submission.id))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .scroll((app.state.scroll_offset as u16, 0));
    frame.render_widget(paragraph, area);
}
