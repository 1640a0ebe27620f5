//! Reusable UI widget helpers

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, List, ListState, Paragraph, Wrap},
    Frame,
};

/// Render a list that keeps the selected item in view.
///
/// Catalogue, dashboard and admin lists all go through this so the selection
/// scrolls the same way everywhere.
pub fn render_scrollable_list(frame: &mut Frame, area: Rect, list: List, selected_index: usize) {
    let mut list_state = ListState::default().with_selected(Some(selected_index));
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Bordered placeholder shown instead of an empty list
pub fn render_empty(frame: &mut Frame, area: Rect, title: &str, message: &str) {
    let content = Paragraph::new(message)
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(format!(" {title} "))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    frame.render_widget(content, area);
}
