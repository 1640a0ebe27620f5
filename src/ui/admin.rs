//! Admin view of the document type registry

use super::catalog::signature_label;
use super::widgets::{render_empty, render_scrollable_list};
use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let key = Style::default().fg(Color::Cyan);
    let header = Paragraph::new(Line::from(vec![
        Span::raw(format!(" {} document types  ", app.registry.len())),
        Span::styled("n", key),
        Span::raw(": add  "),
        Span::styled("e", key),
        Span::raw(": edit  "),
        Span::styled("x", key),
        Span::raw(": remove  "),
        Span::styled("Enter", key),
        Span::raw(": try it"),
    ]))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(header, chunks[0]);

    if app.registry.is_empty() {
        render_empty(
            frame,
            chunks[1],
            "Document Types",
            "The catalogue is empty. Press 'n' to add a document type.",
        );
        return;
    }

    let items: Vec<ListItem> = app
        .registry
        .list()
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

            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(prefix, style),
                    Span::styled(template.title(), style.add_modifier(Modifier::BOLD)),
                    Span::styled(
                        format!("  ({})", template.id),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                Line::from(Span::styled(
                    format!(
                        "    {} · {} · {} questions · signatures: {}",
                        template.category,
                        template.price,
                        template.config.questions.len(),
                        signature_label(template.config.signer_count())
                    ),
                    Style::default().fg(Color::Gray),
                )),
            ])
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Document Types ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    render_scrollable_list(frame, chunks[1], list, app.state.selected_index);
}
