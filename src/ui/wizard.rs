//! Wizard step rendering: step list, fields of the current step and the
//! action panel

use super::components::{render_action_button, BUTTON_HEIGHT};
use super::forms::{draw_field, field_height, FieldView};
use crate::app::App;
use crate::platform::{NEXT_STEP_SHORTCUT, PREV_STEP_SHORTCUT, SUBMIT_SHORTCUT};
use crate::state::Form;
use crate::wizard::FieldValue;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Draw the wizard with step list, form and action panel
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(34), // Step list
            Constraint::Min(40),    // Form area
            Constraint::Length(22), // Action panel
        ])
        .split(area);

    draw_step_list(frame, chunks[0], app);
    draw_step_form(frame, chunks[1], app);
    draw_action_panel(frame, chunks[2], app);
}

fn draw_step_list(frame: &mut Frame, area: Rect, app: &App) {
    let current = app.wizard.current_step();
    let items: Vec<ListItem> = app
        .wizard
        .catalogue()
        .steps()
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let (marker, color) = if index == current {
                ("▸", Color::Cyan)
            } else if app.wizard.validate_step(index).is_empty() {
                ("✓", Color::Green)
            } else {
                ("•", Color::DarkGray)
            };
            let style = if index == current {
                Style::default().fg(color).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{marker} "), Style::default().fg(color)),
                Span::styled(format!("{}. {}", index + 1, step.title), style),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Steps (Alt+1-9) ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(list, area);
}

/// Index of the first field to draw so the focused field stays visible
fn first_visible(heights: &[u16], active: usize, available: u16) -> usize {
    let active = active.min(heights.len().saturating_sub(1));
    let mut start = 0;
    while start < active && heights[start..=active].iter().sum::<u16>() > available {
        start += 1;
    }
    start
}

fn draw_step_form(frame: &mut Frame, area: Rect, app: &App) {
    let step_index = app.wizard.current_step();
    let Some(step) = app.wizard.catalogue().step(step_index) else {
        return;
    };

    let block = Block::default()
        .title(format!(" {} ", step.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Description
            Constraint::Min(0),    // Fields
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(step.description.as_str())
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true }),
        chunks[0],
    );

    let fields = app.wizard.catalogue().step_fields(step_index);
    let fields_area = chunks[1];
    let heights: Vec<u16> = fields
        .iter()
        .map(|f| field_height(f, fields_area.width))
        .collect();
    let form = &app.state.form;
    let start = first_visible(&heights, form.active_field(), fields_area.height);
    let violations = app.wizard.violations();

    let mut y = fields_area.y;
    let bottom = fields_area.y + fields_area.height;
    for (index, field) in fields.iter().enumerate().skip(start) {
        let height = heights[index];
        if y + height > bottom {
            break;
        }
        let value = app
            .wizard
            .value(&field.name)
            .unwrap_or_else(|| FieldValue::empty_for(field));
        let view = FieldView {
            field,
            date_text: form.date_text(&field.name, &value),
            value: &value,
            is_active: index == form.active_field(),
            option_cursor: form.option_cursor(),
            violation: violations.get(&field.name).map(|v| v.message.as_str()),
        };
        let rect = Rect {
            x: fields_area.x,
            y,
            width: fields_area.width,
            height,
        };
        draw_field(frame, rect, &view);
        y += height;
    }
}

fn draw_action_panel(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Actions ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(BUTTON_HEIGHT), // Back
            Constraint::Length(BUTTON_HEIGHT), // Next
            Constraint::Length(BUTTON_HEIGHT), // Submit
            Constraint::Length(2),             // Terms status
            Constraint::Min(0),
        ])
        .split(inner_area);

    let first = app.wizard.current_step() == 0;
    let last = app.wizard.is_last_step();
    render_action_button(frame, chunks[0], "Back", PREV_STEP_SHORTCUT, !first, Color::Gray);
    render_action_button(frame, chunks[1], "Next", NEXT_STEP_SHORTCUT, !last, Color::Blue);
    render_action_button(frame, chunks[2], "Submit", SUBMIT_SHORTCUT, last, Color::Green);

    let terms = if app.wizard.terms_accepted() {
        Span::styled("✓ Terms accepted", Style::default().fg(Color::Green))
    } else {
        Span::styled("○ Terms (Ctrl+T)", Style::default().fg(Color::Yellow))
    };
    frame.render_widget(
        Paragraph::new(vec![Line::from(""), Line::from(terms)]),
        chunks[3],
    );
}
