//! Field rendering for wizard steps. One renderer per field kind.

use crate::catalogue::{FieldDescriptor, FieldKind, InputSubtype};
use crate::wizard::FieldValue;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Everything needed to draw one field
pub struct FieldView<'a> {
    pub field: &'a FieldDescriptor,
    pub value: &'a FieldValue,
    /// Date text as typed, for date fields
    pub date_text: String,
    pub is_active: bool,
    pub option_cursor: usize,
    pub violation: Option<&'a str>,
}

const TEXTAREA_HEIGHT: u16 = 5;

/// Rows the field needs at the given width, borders included
pub fn field_height(field: &FieldDescriptor, width: u16) -> u16 {
    match field.kind {
        FieldKind::Textarea => TEXTAREA_HEIGHT,
        FieldKind::Radio | FieldKind::Select | FieldKind::Multiselect | FieldKind::Checkbox
            if !field.options.is_empty() =>
        {
            let inner = width.saturating_sub(2).max(1) as usize;
            let total: usize = field
                .options
                .iter()
                .map(|o| o.label.chars().count() + 6)
                .sum();
            2 + total.div_ceil(inner).max(1) as u16
        }
        _ => 3,
    }
}

/// Draw a form field
pub fn draw_field(frame: &mut Frame, area: Rect, view: &FieldView) {
    let field = view.field;
    let border_color = match (view.violation.is_some(), view.is_active) {
        (true, _) => Color::Red,
        (false, true) => Color::Cyan,
        (false, false) => Color::DarkGray,
    };

    let mut title = vec![Span::styled(
        format!(" {}", field.label),
        Style::default().fg(if view.is_active {
            Color::Cyan
        } else {
            Color::White
        }),
    )];
    if field.required {
        title.push(Span::styled(" *", Style::default().fg(Color::Red)));
    }
    title.push(Span::raw(" "));

    let mut block = Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    if let Some(message) = view.violation {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {message} "),
            Style::default().fg(Color::Red),
        )));
    } else if view.is_active {
        if let Some(description) = &field.description {
            block = block.title_bottom(Line::from(Span::styled(
                format!(" {description} "),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let lines = match field.kind {
        FieldKind::Text | FieldKind::Textarea => {
            let text = view.value.as_text();
            let shown = if field.subtype_or_default() == InputSubtype::Password {
                "•".repeat(text.chars().count())
            } else {
                text.to_string()
            };
            typed_lines(&shown, field.placeholder.as_deref(), view.is_active, Style::default())
        }
        FieldKind::Signature => typed_lines(
            view.value.as_text(),
            Some("Type your full name to sign"),
            view.is_active,
            Style::default().add_modifier(Modifier::ITALIC),
        ),
        FieldKind::Date => typed_lines(
            &view.date_text,
            Some("YYYY-MM-DD"),
            view.is_active,
            Style::default(),
        ),
        FieldKind::Checkbox if !field.is_checkbox_group() => {
            let checked = matches!(view.value, FieldValue::Flag(true));
            let marker = if checked { "[x]" } else { "[ ]" };
            let style = if view.is_active {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            vec![Line::from(Span::styled(
                format!("{marker} {}", if checked { "Yes" } else { "No" }),
                style,
            ))]
        }
        FieldKind::Radio | FieldKind::Select | FieldKind::Multiselect | FieldKind::Checkbox => {
            vec![option_line(view)]
        }
    };

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(paragraph, area);
}

/// Typed content with a placeholder when empty and a cursor when active
fn typed_lines<'a>(
    text: &str,
    placeholder: Option<&str>,
    is_active: bool,
    style: Style,
) -> Vec<Line<'a>> {
    let cursor = Span::styled("▌", Style::default().fg(Color::Cyan));
    if text.is_empty() {
        let mut spans = Vec::new();
        if is_active {
            spans.push(cursor);
        }
        if let Some(placeholder) = placeholder {
            spans.push(Span::styled(
                placeholder.to_string(),
                Style::default().fg(Color::DarkGray),
            ));
        }
        return vec![Line::from(spans)];
    }

    let mut lines: Vec<Line> = text
        .split('\n')
        .map(|l| Line::from(Span::styled(l.to_string(), style)))
        .collect();
    if is_active {
        if let Some(last) = lines.last_mut() {
            last.spans.push(cursor);
        }
    }
    lines
}

/// All options on one wrapped line, with the selection marker of the kind
fn option_line<'a>(view: &FieldView) -> Line<'a> {
    let field = view.field;
    let mut spans = Vec::new();
    for (index, option) in field.options.iter().enumerate() {
        let selected = view.value.contains(&option.value);
        let marker = match (field.kind, selected) {
            (FieldKind::Radio, true) => "(•)",
            (FieldKind::Radio, false) => "( )",
            (FieldKind::Select, true) => "▸",
            (FieldKind::Select, false) => " ",
            (_, true) => "[x]",
            (_, false) => "[ ]",
        };
        let highlighted = view.is_active && index == view.option_cursor;
        let style = match (highlighted, selected) {
            (true, _) => Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            (false, true) => Style::default().fg(Color::Green),
            (false, false) => Style::default(),
        };
        spans.push(Span::styled(format!("{marker} {}", option.label), style));
        spans.push(Span::raw("  "));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heights_by_kind() {
        let text = FieldDescriptor::new("city", "City", FieldKind::Text);
        assert_eq!(field_height(&text, 40), 3);
        let notes = FieldDescriptor::new("notes", "Notes", FieldKind::Textarea);
        assert_eq!(field_height(&notes, 40), TEXTAREA_HEIGHT);
        let agree = FieldDescriptor::new("agree", "Agree", FieldKind::Checkbox);
        assert_eq!(field_height(&agree, 40), 3);
    }

    #[test]
    fn test_long_option_lists_grow() {
        let tier = FieldDescriptor::new("tier", "Tier", FieldKind::Radio).options(&[
            ("Bronze", "bronze"),
            ("Silver", "silver"),
            ("Gold", "gold"),
            ("Platinum", "platinum"),
            ("Diamond", "diamond"),
        ]);
        assert_eq!(field_height(&tier, 80), 3);
        assert!(field_height(&tier, 20) > 3);
    }

    #[test]
    fn test_typed_lines_placeholder_and_cursor() {
        let empty = typed_lines("", Some("YYYY-MM-DD"), true, Style::default());
        assert_eq!(empty[0].spans.len(), 2);
        let multi = typed_lines("a\nb", None, true, Style::default());
        assert_eq!(multi.len(), 2);
        assert_eq!(multi[1].spans.len(), 2);
    }
}
