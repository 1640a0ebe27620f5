//! Sign-in and sign-up forms

use super::field_renderer::{draw_field, draw_help_text};
use crate::app::App;
use crate::auth::MIN_PASSWORD_LEN;
use crate::platform::REGISTER_SHORTCUT;
use ratatui::{
    layout::{Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const FORM_WIDTH: u16 = 56;

/// Draw the sign-in form
pub fn draw_login(frame: &mut Frame, area: Rect, app: &App) {
    let help: [(&str, &str); 4] = [
        ("Tab", "next field"),
        ("Enter", "sign in"),
        (REGISTER_SHORTCUT, "create account"),
        ("Esc", "back"),
    ];
    draw_form(
        frame,
        area,
        app,
        " Sign In ",
        "Test accounts: admin@docuforge.com / admin123, user@test.com / user123",
        &help,
    );
}

/// Draw the sign-up form
pub fn draw_register(frame: &mut Frame, area: Rect, app: &App) {
    let note = format!("Passwords need at least {MIN_PASSWORD_LEN} characters.");
    let help: [(&str, &str); 3] = [
        ("Tab", "next field"),
        ("Enter", "create account"),
        ("Esc", "back"),
    ];
    draw_form(frame, area, app, " Create Account ", &note, &help);
}

fn draw_form(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    title: &str,
    note: &str,
    help: &[(&str, &str)],
) {
    let (fields, active) = app.state.form.fields();

    // Fields + note + help, inside a border
    let height = (fields.len() as u16 * 3 + 4).min(area.height);
    let [column] = Layout::horizontal([Constraint::Length(FORM_WIDTH)])
        .flex(Flex::Center)
        .areas(area);
    let [form_area] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(column);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(form_area);
    frame.render_widget(block, form_area);

    let mut constraints: Vec<Constraint> = fields.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Length(1)); // Note
    constraints.push(Constraint::Length(1)); // Help text

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (idx, field) in fields.iter().enumerate() {
        draw_field(frame, chunks[idx], field, idx == active);
    }

    let note_widget =
        Paragraph::new(Line::from(note)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(note_widget, chunks[fields.len()]);
    draw_help_text(frame, chunks[fields.len() + 1], help);
}
