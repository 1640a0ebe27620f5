//! Document type catalogue

use super::widgets::{render_empty, render_scrollable_list};
use crate::app::App;
use crate::registry::DocumentTemplate;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Draw the catalogue: list on the left, details of the selection on the right
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    if app.registry.is_empty() {
        render_empty(
            frame,
            area,
            "Documents",
            "No document types are available yet.",
        );
        return;
    }

    let templates = app.registry.list();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Min(0)])
        .split(area);

    let items: Vec<ListItem> = templates
        .iter()
        .enumerate()
        .map(|(idx, template)| {
            let is_selected = idx == app.state.selected_index;
            let prefix = if is_selected { "▸ " } else { "  " };
            let style = if is_selected {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };

            ListItem::new(Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(template.title(), style.add_modifier(Modifier::BOLD)),
                Span::raw(" "),
                Span::styled(
                    format!("[{}]", template.category),
                    Style::default().fg(category_color(&template.category)),
                ),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(format!(" Documents ({}) ", templates.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    render_scrollable_list(frame, chunks[0], list, app.state.selected_index);

    if let Some(template) = templates.get(app.state.selected_index) {
        draw_details(frame, chunks[1], template);
    }
}

fn draw_details(frame: &mut Frame, area: Rect, template: &DocumentTemplate) {
    let config = &template.config;
    let label = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
        Line::from(Span::styled(
            config.title.as_str(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(config.description.as_str()),
        Line::from(""),
        Line::from(vec![
            Span::styled("Category:   ", label),
            Span::raw(template.category.as_str()),
        ]),
        Line::from(vec![
            Span::styled("Price:      ", label),
            Span::styled(template.price.as_str(), Style::default().fg(Color::Green)),
        ]),
        Line::from(vec![
            Span::styled("Questions:  ", label),
            Span::raw(config.questions.len().to_string()),
        ]),
        Line::from(vec![
            Span::styled("Signatures: ", label),
            Span::raw(signature_label(config.signer_count())),
        ]),
        Line::from(""),
    ];

    for question in &config.questions {
        let marker = if question.required { "*" } else { " " };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Red)),
            Span::raw(format!(" {}", question.prompt)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Enter", Style::default().fg(Color::Cyan)),
        Span::raw(": fill in this document"),
    ]));

    let details = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(" Details ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(details, area);
}

pub(super) fn signature_label(signers: usize) -> &'static str {
    match signers {
        0 => "None",
        1 => "One party",
        _ => "Both parties",
    }
}

fn category_color(category: &str) -> Color {
    match category {
        "Legal" => Color::Magenta,
        "Business" => Color::Blue,
        "HR" | "Employment" => Color::Yellow,
        "Financial" => Color::Green,
        _ => Color::Gray,
    }
}
