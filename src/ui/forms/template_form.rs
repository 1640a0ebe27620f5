//! Document type authoring form

use super::field_renderer::{draw_field, draw_help_text};
use crate::app::App;
use crate::platform::SAVE_SHORTCUT;
use crate::state::FormState;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Draw the document type form, for a new type or an edit
pub fn draw_template_create(frame: &mut Frame, area: Rect, app: &App) {
    let title = match &app.state.form {
        FormState::TemplateCreate(form) if form.editing.is_some() => " Edit Document Type ",
        _ => " Add Document Type ",
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(5), // Description
            Constraint::Length(3), // Category / price
            Constraint::Length(3), // Signature toggles
            Constraint::Min(5),    // Questions
            Constraint::Length(1), // Question syntax
            Constraint::Length(1), // Help text
        ])
        .margin(1)
        .split(area);

    let (fields, active) = app.state.form.fields();
    // Title, description, category, price, signature, both parties, questions
    if fields.len() != 7 {
        return;
    }

    let halves = |area: Rect| {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area)
    };

    draw_field(frame, chunks[0], fields[0], active == 0);
    draw_field(frame, chunks[1], fields[1], active == 1);

    let row = halves(chunks[2]);
    draw_field(frame, row[0], fields[2], active == 2);
    draw_field(frame, row[1], fields[3], active == 3);

    let row = halves(chunks[3]);
    draw_field(frame, row[0], fields[4], active == 4);
    draw_field(frame, row[1], fields[5], active == 5);

    draw_field(frame, chunks[4], fields[6], active == 6);

    let syntax = Paragraph::new(
        "One question per line. *Prompt = required, [long] = paragraph, {a, b} = choices",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(syntax, chunks[5]);

    let help = [
        ("Tab", "next field"),
        ("←/→", "change"),
        ("Space", "toggle"),
        (SAVE_SHORTCUT, "save"),
        ("Esc", "cancel"),
    ];
    draw_help_text(frame, chunks[6], &help);
}
