//! Layout components (header, status bar)

use crate::app::App;
use crate::platform::{REGISTER_SHORTCUT, SAVE_SHORTCUT};
use crate::state::{Step, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Split the screen into header and main content.
/// The bottom line is reserved for the status bar.
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1])
}

/// Draw the header with the product name, current view and signed-in user
pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let title = Line::from(vec![
        Span::styled(
            " DocuForge",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  │  ", Style::default().fg(Color::DarkGray)),
        Span::raw(app.state.current_view.title()),
    ]);
    frame.render_widget(Paragraph::new(title), inner);

    let user = match app.auth.current_user() {
        Some(user) if app.auth.is_admin() => Line::from(vec![
            Span::styled("admin ", Style::default().fg(Color::Magenta)),
            Span::raw(format!("{} ", user.name)),
        ]),
        Some(user) => Line::from(Span::raw(format!("{} ", user.name))),
        None => Line::from(Span::styled(
            "Not signed in ",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(user).alignment(Alignment::Right), inner);
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![Span::raw(" ")];

    if app.is_generation_pending() {
        spans.push(Span::styled(
            "⏳ Generating ",
            Style::default().fg(Color::Yellow),
        ));
    }

    // View-specific hints
    let hints = get_view_hints(app);
    spans.push(Span::styled(hints, Style::default().fg(Color::Gray)));

    if let Some(msg) = &app.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Green)));
    }

    let quit_hint = " ^C:quit ";

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    let quit_area = Rect {
        x: area.width.saturating_sub(quit_hint.len() as u16),
        y: area.height.saturating_sub(1),
        width: (quit_hint.len() as u16).min(area.width),
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Get keyboard hints for the current view
fn get_view_hints(app: &App) -> String {
    let signed_in = app.auth.is_authenticated();
    match app.state.current_view {
        View::Catalog if signed_in => {
            "j/k:nav  Enter:start  d:dashboard  a:admin  o:sign out  q:quit".to_string()
        }
        View::Catalog => "j/k:nav  Enter:start  l:sign in  r:sign up  q:quit".to_string(),
        View::Wizard => wizard_hints(app),
        View::Login => format!("Tab:next  Enter:sign in  {REGISTER_SHORTCUT}:sign up  Esc:back"),
        View::Register => "Tab:next  Enter:create account  Esc:back".to_string(),
        View::Dashboard => "j/k:nav  o:sign out  Esc:back".to_string(),
        View::Admin => "j/k:nav  n:new  e:edit  x:remove  Enter:try  Esc:back".to_string(),
        View::AdminCreate => format!("Tab:next  ←/→:change  {SAVE_SHORTCUT}:save  Esc:cancel"),
    }
}

fn wizard_hints(app: &App) -> String {
    if app.state.show_preview {
        return "Enter:copy link  s:save  Esc:close".to_string();
    }
    let Some(wizard) = app.state.wizard.as_ref() else {
        return String::new();
    };
    match wizard.current_step() {
        Step::Final if wizard.generated_document().is_some() => {
            "Enter:copy link  s:save  p:preview  n:new  S-Tab:back  Esc:exit".to_string()
        }
        Step::Final => "Enter:generate  S-Tab:back  Esc:exit".to_string(),
        Step::Signatures { dual: true } => {
            "mouse:draw  1/2:pad  c:clear  Tab:next  S-Tab:back  Esc:exit".to_string()
        }
        Step::Signatures { dual: false } => {
            "mouse:draw  c:clear  Tab:next  S-Tab:back  Esc:exit".to_string()
        }
        _ => "Tab:next  S-Tab:back  Esc:exit".to_string(),
    }
}
