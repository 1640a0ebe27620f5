//! Signed-in user's dashboard

use super::widgets::{render_empty, render_scrollable_list};
use crate::app::App;
use crate::state::RecordStatus;
use chrono::Utc;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Greeting
            Constraint::Length(4), // Stats
            Constraint::Min(0),    // Recent documents
        ])
        .split(area);

    let name = app
        .auth
        .current_user()
        .map(|u| u.name.as_str())
        .unwrap_or("there");
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw(" Welcome back, "),
            Span::styled(name, Style::default().add_modifier(Modifier::BOLD)),
        ])),
        chunks[0],
    );

    let stats = app.state.history.stats(Utc::now());
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(chunks[1]);
    stat_card(frame, cards[0], "Total Documents", stats.total, Color::Cyan);
    stat_card(frame, cards[1], "Downloaded", stats.downloaded, Color::Green);
    stat_card(frame, cards[2], "Generated", stats.generated, Color::Yellow);
    stat_card(frame, cards[3], "This Month", stats.this_month, Color::Magenta);

    if app.state.history.is_empty() {
        render_empty(
            frame,
            chunks[2],
            "Recent Documents",
            "No documents yet. Pick one from the catalogue to get started.",
        );
        return;
    }

    let items: Vec<ListItem> = app
        .state
        .history
        .records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let is_selected = idx == app.state.selected_index;
            let prefix = if is_selected { "▸ " } else { "  " };
            let style = if is_selected {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            let status_color = match record.status {
                RecordStatus::Downloaded => Color::Green,
                RecordStatus::Generated => Color::Yellow,
            };

            ListItem::new(Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(
                    record.created_at.format("%Y-%m-%d %H:%M").to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw("  "),
                Span::styled(
                    format!("[{}]", record.status.label()),
                    Style::default().fg(status_color),
                ),
                Span::raw("  "),
                Span::styled(record.document_type.as_str(), style),
                Span::styled(
                    format!("  {}", record.id),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Recent Documents ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    render_scrollable_list(frame, chunks[2], list, app.state.selected_index);
}

fn stat_card(frame: &mut Frame, area: Rect, label: &str, value: usize, color: Color) {
    let content = Paragraph::new(vec![
        Line::from(Span::styled(
            value.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(label, Style::default().fg(Color::DarkGray))),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(content, area);
}
