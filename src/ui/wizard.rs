//! Document generation wizard view

use super::components::{
    render_button, render_dialog, render_key_button, DialogConfig, BUTTON_HEIGHT,
};
use super::forms::draw_field_with_value;
use crate::app::App;
use crate::state::{QuestionKind, SignatureCapture, SignatureRole, Step, WizardController};
use ratatui::{
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

/// Lines of the generated text shown on the final step
const EXCERPT_LINES: usize = 6;

/// Split the wizard area into progress bar, step card and help line
pub fn wizard_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Progress
            Constraint::Min(0),    // Step card
            Constraint::Length(1), // Help
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2])
}

/// Frames of the signature pads inside the step card, side by side.
///
/// The card's border and the instruction line above the pads are left free.
pub fn signature_pad_frames(card: Rect, count: usize) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let area = Rect {
        x: card.x.saturating_add(1),
        y: card.y.saturating_add(3),
        width: card.width.saturating_sub(2),
        height: card.height.saturating_sub(5),
    };
    let constraints: Vec<Constraint> = (0..count)
        .map(|_| Constraint::Ratio(1, count as u32))
        .collect();

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area)
        .to_vec()
}

/// Drawing surface inside a pad frame
pub fn pad_canvas(frame: Rect) -> Rect {
    frame.inner(Margin {
        horizontal: 1,
        vertical: 1,
    })
}

/// Draw the wizard for the open session
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let Some(wizard) = app.state.wizard.as_ref() else {
        return;
    };
    let (progress_area, card, help_area) = wizard_layout(area);

    draw_progress(frame, progress_area, wizard);

    let block = Block::default()
        .title(format!(" {} ", wizard.step_title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(card);
    frame.render_widget(block, card);

    match wizard.current_step() {
        Step::Question(_) => draw_question(frame, inner, wizard),
        Step::Modifications => draw_modifications(frame, inner, wizard),
        Step::Signatures { .. } => draw_signatures(frame, card, wizard, &app.state.signatures),
        Step::Final => draw_final(frame, inner, app, wizard),
    }

    let help = if wizard.is_first_step() {
        "Tab: next step  Esc: exit"
    } else {
        "Tab: next step  Shift+Tab: previous step  Esc: exit"
    };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        help_area,
    );
}

fn draw_progress(frame: &mut Frame, area: Rect, wizard: &WizardController) {
    let label = format!(
        "Step {} of {}  ({}%)",
        wizard.current_index() + 1,
        wizard.total_steps(),
        wizard.progress_percent()
    );
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(format!(" {} ", wizard.config().title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .ratio(wizard.progress().clamp(0.0, 1.0))
        .label(label);
    frame.render_widget(gauge, area);
}

fn draw_question(frame: &mut Frame, area: Rect, wizard: &WizardController) {
    let Some(question) = wizard.current_question() else {
        return;
    };

    let input_height = match question.kind {
        QuestionKind::ShortText => Constraint::Length(3),
        QuestionKind::LongText => Constraint::Min(5),
        QuestionKind::Choice => Constraint::Length(question.choices.len() as u16 + 2),
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Prompt
            input_height,
            Constraint::Min(0),
            Constraint::Length(1), // Key hints
        ])
        .margin(1)
        .split(area);

    let mut prompt = vec![Span::styled(
        question.prompt.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if question.required {
        prompt.push(Span::styled(" *", Style::default().fg(Color::Red)));
    }
    frame.render_widget(Paragraph::new(Line::from(prompt)), chunks[0]);

    let answer = wizard.answer(&question.id);
    let hint = match question.kind {
        QuestionKind::Choice => {
            let lines: Vec<Line> = question
                .choices
                .iter()
                .map(|choice| {
                    if choice == answer {
                        Line::from(Span::styled(
                            format!("● {choice}"),
                            Style::default()
                                .fg(Color::Cyan)
                                .add_modifier(Modifier::BOLD),
                        ))
                    } else {
                        Line::from(format!("○ {choice}"))
                    }
                })
                .collect();
            frame.render_widget(
                Paragraph::new(lines).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Cyan)),
                ),
                chunks[1],
            );
            "←/→: choose  Enter: next"
        }
        QuestionKind::LongText => {
            draw_field_with_value(frame, chunks[1], question.kind.label(), answer, true, true);
            "Enter: new line"
        }
        QuestionKind::ShortText => {
            draw_field_with_value(frame, chunks[1], question.kind.label(), answer, true, false);
            "Enter: next"
        }
    };
    frame.render_widget(
        Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
        chunks[3],
    );
}

fn draw_modifications(frame: &mut Frame, area: Rect, wizard: &WizardController) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(3)])
        .margin(1)
        .split(area);

    frame.render_widget(
        Paragraph::new("Anything to add or change? Describe extra clauses or edits (optional).")
            .wrap(Wrap { trim: true }),
        chunks[0],
    );
    draw_field_with_value(
        frame,
        chunks[1],
        "Modifications",
        wizard.modifications(),
        true,
        true,
    );
}

fn draw_signatures(
    frame: &mut Frame,
    card: Rect,
    wizard: &WizardController,
    capture: &SignatureCapture,
) {
    let roles = wizard.signature_roles();
    let instructions = Rect {
        x: card.x.saturating_add(2),
        y: card.y.saturating_add(1),
        width: card.width.saturating_sub(4),
        height: 1.min(card.height.saturating_sub(2)),
    };
    let text = if roles.len() > 1 {
        "Draw each signature with the mouse. 1/2 selects a pad, c clears it."
    } else {
        "Draw your signature with the mouse. c clears it."
    };
    frame.render_widget(Paragraph::new(text), instructions);

    let frames = signature_pad_frames(card, roles.len());
    for (role, pad_frame) in roles.iter().zip(frames) {
        draw_pad(frame, pad_frame, *role, wizard, capture);
    }
}

fn draw_pad(
    frame: &mut Frame,
    area: Rect,
    role: SignatureRole,
    wizard: &WizardController,
    capture: &SignatureCapture,
) {
    let is_active = capture.active == role;
    let signed = wizard.signature(role).is_some();
    let status = if signed {
        Span::styled(" ✓ signed ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" unsigned ", Style::default().fg(Color::DarkGray))
    };

    let block = Block::default()
        .title(Line::from(vec![
            Span::raw(format!(" {} ", role.label())),
            status,
        ]))
        .borders(Borders::ALL)
        .border_style(if is_active {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        });
    frame.render_widget(block, area);

    let canvas = pad_canvas(area);
    let pad = capture.pad(role);
    if !pad.has_ink() {
        let hint = Paragraph::new("Drag with the mouse to sign")
            .style(Style::default().fg(Color::DarkGray).bg(Color::Black));
        frame.render_widget(hint, canvas);
        return;
    }
    let lines: Vec<Line> = pad
        .sample(canvas.width, canvas.height)
        .into_iter()
        .map(|row| {
            let text: String = row.into_iter().map(|ink| if ink { '█' } else { ' ' }).collect();
            Line::from(text)
        })
        .collect();
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().fg(Color::White).bg(Color::Black)),
        canvas,
    );
}

fn draw_final(frame: &mut Frame, area: Rect, app: &App, wizard: &WizardController) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(BUTTON_HEIGHT)])
        .margin(1)
        .split(area);

    if let Some(document) = wizard.generated_document() {
        let mut lines = vec![
            Line::from(Span::styled(
                "✓ Document generated successfully!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("Document ID: ", Style::default().fg(Color::DarkGray)),
                Span::raw(document.id.as_str()),
            ]),
            Line::from(""),
        ];
        lines.extend(
            document
                .content
                .lines()
                .take(EXCERPT_LINES)
                .map(|l| Line::from(Span::styled(l, Style::default().fg(Color::Gray)))),
        );
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[0]);

        let buttons = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(chunks[1]);
        render_key_button(frame, buttons[0], "Enter", "Copy link", true);
        render_key_button(frame, buttons[1], "s", "Save", false);
        render_key_button(frame, buttons[2], "p", "Preview", false);
        render_key_button(frame, buttons[3], "n", "New", false);
        return;
    }

    if wizard.is_generating() || app.is_generation_pending() {
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(
                    "Generating your document...",
                    Style::default().fg(Color::Yellow),
                )),
                Line::from(""),
                Line::from("This can take a few seconds."),
            ]),
            chunks[0],
        );
        render_button(frame, chunks[1], "Generating...", false, false);
        return;
    }

    frame.render_widget(
        Paragraph::new(summary_lines(wizard)).wrap(Wrap { trim: false }),
        chunks[0],
    );
    render_button(
        frame,
        chunks[1],
        "Enter  Generate Document",
        true,
        wizard.can_generate(),
    );
}

/// Review of everything entered, with unanswered required questions flagged
fn summary_lines(wizard: &WizardController) -> Vec<Line<'_>> {
    let label = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::from("Review your answers, then generate the document."),
        Line::from(""),
    ];

    for question in &wizard.config().questions {
        let answer = wizard.answer(&question.id);
        let value = if answer.trim().is_empty() {
            Span::styled("(not answered)", Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(answer.lines().next().unwrap_or_default().to_string())
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", question.prompt), label),
            value,
        ]));
    }

    if !wizard.modifications().trim().is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Modifications: ", label),
            Span::raw("provided"),
        ]));
    }

    for role in wizard.signature_roles() {
        let status = if wizard.signature(role).is_some() {
            Span::styled("signed", Style::default().fg(Color::Green))
        } else {
            Span::styled("not signed", Style::default().fg(Color::Yellow))
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", role.label()), label),
            status,
        ]));
    }

    let missing = wizard.missing_required();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|q| q.prompt.as_str()).collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("⚠ Required but unanswered: {}", names.join(", ")),
            Style::default().fg(Color::Yellow),
        )));
    }

    lines
}

/// Full text of the generated document as an overlay
pub fn draw_preview(frame: &mut Frame, app: &App) {
    let Some(wizard) = app.state.wizard.as_ref() else {
        return;
    };
    let Some(document) = wizard.generated_document() else {
        return;
    };

    let key = Style::default().fg(Color::Cyan);
    let hint = vec![
        Span::styled("Enter", key),
        Span::raw(": copy link  "),
        Span::styled("s", key),
        Span::raw(": save  "),
        Span::styled("Esc", key),
        Span::raw(": close"),
    ];

    let message = format!(
        "Document ID: {}\nCreated: {}\n\n{}",
        document.id,
        document.created_at.format("%Y-%m-%d %H:%M"),
        document.content
    );

    render_dialog(
        frame,
        DialogConfig {
            title: &wizard.config().title,
            title_color: Color::Cyan,
            border_color: Color::Cyan,
            message: &message,
            hint: Some(hint),
            max_width: 90,
        },
    );
}
