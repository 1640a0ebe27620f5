//! UI module for rendering the TUI

mod admin;
mod catalog;
mod components;
mod dashboard;
mod forms;
mod layout;
mod widgets;
mod wizard;

pub use layout::create_layout;
pub use wizard::{pad_canvas, signature_pad_frames, wizard_layout};

use crate::app::App;
use crate::state::View;
use components::render_error_dialog;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let (header_area, main_area) = layout::create_layout(area);

    layout::draw_header(frame, header_area, app);

    // Draw main content based on current view
    match app.state.current_view {
        View::Catalog => catalog::draw(frame, main_area, app),
        View::Wizard => wizard::draw(frame, main_area, app),
        View::Login => forms::draw_login(frame, main_area, app),
        View::Register => forms::draw_register(frame, main_area, app),
        View::Dashboard => dashboard::draw(frame, main_area, app),
        View::Admin => admin::draw(frame, main_area, app),
        View::AdminCreate => forms::draw_template_create(frame, main_area, app),
    }

    layout::draw_status_bar(frame, app);

    if app.state.show_preview {
        wizard::draw_preview(frame, app);
    }

    // Errors are modal and sit above everything else
    if let Some(error) = app.state.current_error() {
        render_error_dialog(frame, error, app.state.error_count());
    }
}
