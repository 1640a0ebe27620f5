//! Application state definitions

use super::document::DocumentHistory;
use super::forms::FormState;
use super::signature::{SignaturePad, SignatureRole};
use super::wizard::WizardController;
use std::collections::VecDeque;

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Template picker
    #[default]
    Catalog,
    Wizard,
    Login,
    Register,
    Dashboard,
    Admin,
    AdminCreate,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Catalog => "Documents",
            Self::Wizard => "Generate Document",
            Self::Login => "Sign In",
            Self::Register => "Create Account",
            Self::Dashboard => "Dashboard",
            Self::Admin => "Admin Dashboard",
            Self::AdminCreate => "Document Type",
        }
    }

    /// Views that bounce to sign-in when there is no session
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Dashboard | Self::Admin | Self::AdminCreate)
    }

    /// Form views are skipped when going back
    pub fn is_form_view(&self) -> bool {
        matches!(self, Self::Login | Self::Register | Self::AdminCreate)
    }
}

/// Drawing surfaces for the signature step
#[derive(Debug, Clone)]
pub struct SignatureCapture {
    primary: SignaturePad,
    secondary: SignaturePad,
    pub active: SignatureRole,
}

impl Default for SignatureCapture {
    fn default() -> Self {
        Self {
            primary: SignaturePad::default(),
            secondary: SignaturePad::default(),
            active: SignatureRole::Primary,
        }
    }
}

impl SignatureCapture {
    pub fn pad(&self, role: SignatureRole) -> &SignaturePad {
        match role {
            SignatureRole::Primary => &self.primary,
            SignatureRole::Secondary => &self.secondary,
        }
    }

    pub fn pad_mut(&mut self, role: SignatureRole) -> &mut SignaturePad {
        match role {
            SignatureRole::Primary => &mut self.primary,
            SignatureRole::Secondary => &mut self.secondary,
        }
    }

    /// Pad with a stroke in progress, if any
    pub fn drawing_role(&self) -> Option<SignatureRole> {
        [SignatureRole::Primary, SignatureRole::Secondary]
            .into_iter()
            .find(|role| self.pad(*role).is_drawing())
    }
}

/// Main application state
#[derive(Default)]
pub struct AppState {
    // Navigation
    pub current_view: View,
    pub view_history: Vec<View>,

    // Selection
    pub selected_index: usize,

    // Form state
    pub form: FormState,

    // Wizard session
    pub wizard: Option<WizardController>,
    pub signatures: SignatureCapture,
    pub show_preview: bool,

    // Signed-in user's documents
    pub history: DocumentHistory,

    // Errors waiting to be shown, oldest first
    errors: VecDeque<String>,
}

impl AppState {
    /// Queue an error for the modal error dialog
    pub fn push_error(&mut self, message: String) {
        self.errors.push_back(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Error currently shown
    pub fn current_error(&self) -> Option<&str> {
        self.errors.front().map(String::as_str)
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn dismiss_error(&mut self) {
        self.errors.pop_front();
    }

    /// Move selection down
    pub fn move_selection_down(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Keep the selection inside a list that may have shrunk
    pub fn clamp_selection(&mut self, len: usize) {
        self.selected_index = self.selected_index.min(len.saturating_sub(1));
    }

    /// Reset selection
    pub fn reset_selection(&mut self) {
        self.selected_index = 0;
    }

    /// Drop the wizard session and everything drawn for it
    pub fn close_wizard(&mut self) {
        self.wizard = None;
        self.signatures = SignatureCapture::default();
        self.show_preview = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod view {
        use super::*;

        #[test]
        fn test_default_is_catalog() {
            assert_eq!(View::default(), View::Catalog);
        }

        #[test]
        fn test_requires_auth() {
            assert!(View::Dashboard.requires_auth());
            assert!(View::Admin.requires_auth());
            assert!(!View::Wizard.requires_auth());
            assert!(!View::Catalog.requires_auth());
            assert!(!View::Login.requires_auth());
        }

        #[test]
        fn test_form_views() {
            assert!(View::Login.is_form_view());
            assert!(View::Register.is_form_view());
            assert!(View::AdminCreate.is_form_view());
            assert!(!View::Wizard.is_form_view());
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn test_queue_is_fifo() {
            let mut state = AppState::default();
            assert!(!state.has_errors());
            state.push_error("first".to_string());
            state.push_error("second".to_string());
            assert_eq!(state.current_error(), Some("first"));
            assert_eq!(state.error_count(), 2);
            state.dismiss_error();
            assert_eq!(state.current_error(), Some("second"));
            state.dismiss_error();
            assert!(!state.has_errors());
            // Dismissing an empty queue is harmless
            state.dismiss_error();
        }
    }

    mod selection {
        use super::*;

        #[test]
        fn test_move_selection_bounds() {
            let mut state = AppState::default();
            state.move_selection_up();
            assert_eq!(state.selected_index, 0);
            state.move_selection_down(2);
            state.move_selection_down(2);
            assert_eq!(state.selected_index, 1);
        }

        #[test]
        fn test_move_selection_down_empty_list() {
            let mut state = AppState::default();
            state.move_selection_down(0);
            assert_eq!(state.selected_index, 0);
        }

        #[test]
        fn test_clamp_selection() {
            let mut state = AppState {
                selected_index: 5,
                ..AppState::default()
            };
            state.clamp_selection(3);
            assert_eq!(state.selected_index, 2);
            state.clamp_selection(0);
            assert_eq!(state.selected_index, 0);
        }
    }

    mod signatures {
        use super::*;

        #[test]
        fn test_pads_are_independent() {
            let mut capture = SignatureCapture::default();
            capture.pad_mut(SignatureRole::Secondary).begin_stroke(1, 1);
            assert!(!capture.pad(SignatureRole::Primary).has_ink());
            assert_eq!(capture.drawing_role(), Some(SignatureRole::Secondary));
        }

        #[test]
        fn test_close_wizard_resets_pads() {
            let mut state = AppState::default();
            state.signatures.pad_mut(SignatureRole::Primary).begin_stroke(2, 2);
            state.show_preview = true;
            state.close_wizard();
            assert!(!state.signatures.pad(SignatureRole::Primary).has_ink());
            assert!(!state.show_preview);
        }
    }
}
