//! Application state and core logic

use crate::auth::AuthService;
use crate::backend::{
    ClipboardOpener, DocumentOpener, DummyGenerationClient, GenerationClient, GenerationError,
    HttpGenerationClient,
};
use crate::config::TuiConfig;
use crate::platform::{REGISTER_KEY, SAVE_KEY, SHORTCUT_MODIFIER};
use crate::registry::{RegistryError, TemplateRegistry};
use crate::state::{
    AppState, FileSessionStore, FormState, GenerateOutcome, GeneratedDocument, LoginForm,
    MemorySessionStore, QuestionKind, RegisterForm, SessionStore, SignatureCapture, SignatureRole,
    Step, TemplateCreateForm, TemplateError, View, WizardController,
};
use crate::ui;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::oneshot;

type GenerationResult = std::result::Result<GeneratedDocument, GenerationError>;

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Mock authentication provider
    pub auth: AuthService,
    /// Document types offered in the catalogue
    pub registry: TemplateRegistry,
    client: Arc<dyn GenerationClient>,
    opener: Box<dyn DocumentOpener>,
    download_dir: PathBuf,
    /// Whether the app should quit
    quit: bool,
    /// Feedback shown in the status bar until the next key press
    pub status_message: Option<String>,
    /// Terminal size for pointer mapping (height, width)
    pub terminal_size: Option<(u16, u16)>,
    /// Outstanding generation call
    pending_generation: Option<oneshot::Receiver<GenerationResult>>,
}

impl App {
    /// Create a new App instance from user configuration
    pub fn new(config: &TuiConfig) -> Result<Self> {
        let latency = config.simulated_latency();

        let client: Arc<dyn GenerationClient> = match config.effective_backend_url() {
            Some(url) if !config.uses_dummy_backend() => {
                tracing::info!(%url, "Using generation backend");
                Arc::new(HttpGenerationClient::new(url)?)
            }
            _ => {
                tracing::info!("Using built-in dummy generation backend");
                Arc::new(DummyGenerationClient::new(latency))
            }
        };

        let store: Box<dyn SessionStore> = if config.is_ephemeral() {
            tracing::info!("Session kept in memory only");
            Box::new(MemorySessionStore::new())
        } else {
            Box::new(FileSessionStore::new(config.resolved_data_dir()))
        };
        let auth = AuthService::new(store, latency);

        Ok(Self::with_services(
            auth,
            TemplateRegistry::with_builtin(),
            client,
            Box::new(ClipboardOpener),
            config.resolved_download_dir(),
        ))
    }

    /// Create an App around already-built services
    pub fn with_services(
        auth: AuthService,
        registry: TemplateRegistry,
        client: Arc<dyn GenerationClient>,
        opener: Box<dyn DocumentOpener>,
        download_dir: PathBuf,
    ) -> Self {
        let mut state = AppState::default();
        state.history = auth.history();

        Self {
            state,
            auth,
            registry,
            client,
            opener,
            download_dir,
            quit: false,
            status_message: None,
            terminal_size: None,
            pending_generation: None,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    pub fn is_generation_pending(&self) -> bool {
        self.pending_generation.is_some()
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        // Clear any status messages on key press
        self.status_message = None;

        match self.state.current_view {
            View::Catalog => self.handle_catalog_key(key),
            View::Wizard => self.handle_wizard_key(key).await,
            View::Login => self.handle_login_key(key).await,
            View::Register => self.handle_register_key(key).await,
            View::Dashboard => self.handle_dashboard_key(key),
            View::Admin => self.handle_admin_key(key),
            View::AdminCreate => self.handle_admin_create_key(key),
        }

        Ok(())
    }

    /// Navigate to a new view
    pub fn navigate(&mut self, view: View) {
        if view.requires_auth() && !self.auth.is_authenticated() {
            self.go_to_login();
            return;
        }
        // Save current view to history
        self.state.view_history.push(self.state.current_view);
        self.state.current_view = view;
        self.state.reset_selection();
    }

    /// Go back to previous view
    pub fn go_back(&mut self) {
        // Skip form views in history to go back to the last non-form view
        while let Some(view) = self.state.view_history.pop() {
            if view.is_form_view() {
                continue;
            }
            self.state.current_view = view;
            return;
        }
        self.state.current_view = View::Catalog;
    }

    fn go_to_login(&mut self) {
        self.state.form = FormState::Login(LoginForm::new());
        self.state.view_history.push(self.state.current_view);
        self.state.current_view = View::Login;
    }

    fn go_to_register(&mut self) {
        self.state.form = FormState::Register(RegisterForm::new());
        self.state.view_history.push(self.state.current_view);
        self.state.current_view = View::Register;
    }

    // --- Catalog ---

    fn handle_catalog_key(&mut self, key: KeyEvent) {
        let count = self.registry.len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.move_selection_down(count),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_selection_up(),
            KeyCode::Enter => {
                if let Some(id) = self
                    .registry
                    .list()
                    .get(self.state.selected_index)
                    .map(|t| t.id.clone())
                {
                    self.open_wizard(&id);
                }
            }
            KeyCode::Char('d') => self.open_dashboard(),
            KeyCode::Char('a') => self.open_admin(),
            KeyCode::Char('l') if !self.auth.is_authenticated() => self.go_to_login(),
            KeyCode::Char('r') if !self.auth.is_authenticated() => self.go_to_register(),
            KeyCode::Char('o') if self.auth.is_authenticated() => self.logout(),
            KeyCode::Char('q') => self.quit = true,
            _ => {}
        }
    }

    /// Start a wizard session for a template.
    ///
    /// An unknown id is reported and leaves the user on the catalogue.
    pub fn open_wizard(&mut self, template_id: &str) {
        match WizardController::from_registry(&self.registry, template_id) {
            Ok(wizard) => {
                tracing::info!(template = %template_id, "Opening wizard");
                self.state.close_wizard();
                self.pending_generation = None;
                self.state.wizard = Some(wizard);
                self.navigate(View::Wizard);
            }
            Err(e) => {
                tracing::warn!("{e}");
                self.push_error(e.to_string());
                if self.state.current_view == View::Wizard {
                    self.leave_wizard();
                }
            }
        }
    }

    fn leave_wizard(&mut self) {
        self.state.close_wizard();
        self.pending_generation = None;
        self.go_back();
    }

    fn open_dashboard(&mut self) {
        self.state.history = self.auth.history();
        self.navigate(View::Dashboard);
    }

    fn open_admin(&mut self) {
        if self.auth.is_authenticated() && !self.auth.is_admin() {
            self.push_error("You don't have admin privileges.");
            return;
        }
        self.navigate(View::Admin);
    }

    fn logout(&mut self) {
        self.auth.logout();
        self.state.history = Default::default();
        self.status_message = Some("Signed out".to_string());
    }

    // --- Wizard ---

    async fn handle_wizard_key(&mut self, key: KeyEvent) {
        if self.state.show_preview {
            match key.code {
                KeyCode::Esc | KeyCode::Char('p') => self.state.show_preview = false,
                KeyCode::Enter => self.copy_download_link(),
                KeyCode::Char('s') => self.save_document().await,
                _ => {}
            }
            return;
        }

        let Some(wizard) = self.state.wizard.as_mut() else {
            self.go_back();
            return;
        };

        match key.code {
            KeyCode::Esc => {
                self.leave_wizard();
                return;
            }
            KeyCode::Tab => {
                wizard.go_next();
                return;
            }
            KeyCode::BackTab => {
                wizard.go_previous();
                return;
            }
            _ => {}
        }

        match wizard.current_step() {
            Step::Question(_) => self.handle_question_key(key),
            Step::Modifications => {
                if let Some(text) = edit_text(wizard.modifications(), key, true) {
                    wizard.set_modifications(text);
                }
            }
            Step::Signatures { dual } => self.handle_signature_key(key, dual),
            Step::Final => self.handle_final_step_key(key).await,
        }
    }

    fn handle_question_key(&mut self, key: KeyEvent) {
        let Some(wizard) = self.state.wizard.as_mut() else {
            return;
        };
        let Some(question) = wizard.current_question().cloned() else {
            return;
        };

        if question.kind == QuestionKind::Choice {
            match key.code {
                KeyCode::Left | KeyCode::Up => wizard.cycle_choice(&question.id, false),
                KeyCode::Right | KeyCode::Down | KeyCode::Char(' ') => {
                    wizard.cycle_choice(&question.id, true)
                }
                KeyCode::Enter => wizard.go_next(),
                _ => {}
            }
            return;
        }

        let multiline = question.kind.is_multiline();
        if key.code == KeyCode::Enter && !multiline {
            wizard.go_next();
            return;
        }
        if let Some(text) = edit_text(wizard.answer(&question.id), key, multiline) {
            wizard.set_answer(&question.id, text);
        }
    }

    fn handle_signature_key(&mut self, key: KeyEvent, dual: bool) {
        match key.code {
            KeyCode::Char('1') => self.state.signatures.active = SignatureRole::Primary,
            KeyCode::Char('2') if dual => self.state.signatures.active = SignatureRole::Secondary,
            KeyCode::Left | KeyCode::Right if dual => {
                self.state.signatures.active = self.state.signatures.active.toggle();
            }
            KeyCode::Char('c') => {
                let role = self.state.signatures.active;
                let payload = self.state.signatures.pad_mut(role).clear();
                if let Some(wizard) = self.state.wizard.as_mut() {
                    wizard.set_signature(role, payload);
                }
                self.status_message = Some(format!("{} cleared", role.label()));
            }
            KeyCode::Enter => {
                if let Some(wizard) = self.state.wizard.as_mut() {
                    wizard.go_next();
                }
            }
            _ => {}
        }
    }

    async fn handle_final_step_key(&mut self, key: KeyEvent) {
        let has_document = self
            .state
            .wizard
            .as_ref()
            .is_some_and(|w| w.generated_document().is_some());

        match key.code {
            KeyCode::Enter if has_document => self.copy_download_link(),
            KeyCode::Enter => self.start_generation(),
            KeyCode::Char('s') if has_document => self.save_document().await,
            KeyCode::Char('p') if has_document => self.state.show_preview = true,
            KeyCode::Char('n') if has_document => self.restart_wizard(),
            _ => {}
        }
    }

    fn restart_wizard(&mut self) {
        if let Some(wizard) = self.state.wizard.as_mut() {
            wizard.reset();
        }
        self.state.signatures = SignatureCapture::default();
        self.pending_generation = None;
    }

    /// Issue the generation call in the background.
    ///
    /// Does nothing while a call is outstanding or when generation is not possible.
    pub fn start_generation(&mut self) {
        let Some(wizard) = self.state.wizard.as_mut() else {
            return;
        };
        let Some(request) = wizard.begin_generation() else {
            return;
        };

        let client = Arc::clone(&self.client);
        let token = self.auth.token();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let result = client.generate(request, token).await;
            // Receiver is gone if the wizard was closed meanwhile
            let _ = tx.send(result);
        });

        self.pending_generation = Some(rx);
        self.status_message = Some("Generating document...".to_string());
    }

    /// Pick up a finished generation call, if any
    pub fn poll_generation(&mut self) {
        let Some(rx) = self.pending_generation.as_mut() else {
            return;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(oneshot::error::TryRecvError::Empty) => return,
            Err(oneshot::error::TryRecvError::Closed) => Err(GenerationError::Transport(
                "generation task ended unexpectedly".to_string(),
            )),
        };
        self.pending_generation = None;
        self.finish_generation(result);
    }

    fn finish_generation(&mut self, result: GenerationResult) {
        let Some(wizard) = self.state.wizard.as_mut() else {
            tracing::debug!("Wizard closed before generation finished");
            return;
        };
        let document_type = wizard.config().title.clone();

        match wizard.complete_generation(result) {
            GenerateOutcome::Generated(document) => {
                self.state
                    .history
                    .record_generated(&document_type, &document);
                self.persist_history();
                self.status_message = Some("Document generated successfully!".to_string());
            }
            GenerateOutcome::Failed(err) if err.requires_authentication() => {
                self.push_error(err.to_string());
                self.go_to_login();
            }
            GenerateOutcome::Failed(err) => {
                self.push_error(format!("Failed to generate document: {err}"));
            }
            GenerateOutcome::Skipped => {}
        }
    }

    /// Copy the download link of the generated document
    fn copy_download_link(&mut self) {
        let Some(wizard) = self.state.wizard.as_ref() else {
            return;
        };
        match wizard.download(self.opener.as_ref()) {
            Ok(true) => {
                if let Some(id) = wizard.generated_document().map(|d| d.id.clone()) {
                    self.mark_downloaded(&id);
                }
                self.status_message = Some("Download link copied to clipboard".to_string());
            }
            Ok(false) => {}
            Err(e) => self.push_error(format!("Could not copy download link: {e:#}")),
        }
    }

    /// Fetch the generated document and write it to the download directory
    async fn save_document(&mut self) {
        let Some(document) = self
            .state
            .wizard
            .as_ref()
            .and_then(|w| w.generated_document().cloned())
        else {
            return;
        };

        match self.client.download(&document.id, self.auth.token()).await {
            Ok(bytes) => match self.write_download(&document.id, &bytes) {
                Ok(path) => {
                    self.mark_downloaded(&document.id);
                    self.status_message = Some(format!("Saved to {}", path.display()));
                }
                Err(e) => self.push_error(format!("Could not save document: {e:#}")),
            },
            Err(e) if e.requires_authentication() => {
                self.push_error(e.to_string());
                self.go_to_login();
            }
            Err(e) => self.push_error(format!("Download failed: {e}")),
        }
    }

    fn write_download(&self, document_id: &str, bytes: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.download_dir)?;
        let path = self.download_dir.join(format!("document_{document_id}.pdf"));
        fs::write(&path, bytes)?;
        tracing::info!(path = %path.display(), "Saved document");
        Ok(path)
    }

    fn mark_downloaded(&mut self, document_id: &str) {
        if self.state.history.mark_downloaded(document_id) {
            self.persist_history();
        }
    }

    fn persist_history(&mut self) {
        if let Err(e) = self.auth.save_history(&self.state.history) {
            tracing::warn!("Failed to save document history: {e:#}");
        }
    }

    // --- Sign in / sign up ---

    async fn handle_login_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.go_back(),
            KeyCode::Char(REGISTER_KEY) if key.modifiers.contains(SHORTCUT_MODIFIER) => {
                self.state.current_view = View::Register;
                self.state.form = FormState::Register(RegisterForm::new());
            }
            KeyCode::Enter => self.submit_login().await,
            _ => {
                handle_form_input(&mut self.state.form, key);
            }
        }
    }

    async fn submit_login(&mut self) {
        let FormState::Login(form) = &self.state.form else {
            return;
        };
        let email = form.email.as_text().to_string();
        let password = form.password.as_text().to_string();

        match self.auth.login(&email, &password).await {
            Ok(user) => {
                let message = format!("Welcome back, {}!", user.name);
                self.after_sign_in(message);
            }
            Err(e) => self.push_error(e.to_string()),
        }
    }

    async fn handle_register_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.go_back(),
            KeyCode::Enter => self.submit_register().await,
            _ => {
                handle_form_input(&mut self.state.form, key);
            }
        }
    }

    async fn submit_register(&mut self) {
        let FormState::Register(form) = &self.state.form else {
            return;
        };
        let request = form.to_request();

        match self.auth.register(request).await {
            Ok(user) => {
                let message = format!("Welcome, {}!", user.name);
                self.after_sign_in(message);
            }
            Err(e) => self.push_error(e.to_string()),
        }
    }

    fn after_sign_in(&mut self, message: String) {
        self.state.form = FormState::None;
        self.state.history = self.auth.history();
        self.status_message = Some(message);
        self.go_back();
    }

    // --- Dashboard ---

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        let count = self.state.history.records.len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.move_selection_down(count),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_selection_up(),
            KeyCode::Char('o') => {
                self.logout();
                self.go_back();
            }
            KeyCode::Esc => self.go_back(),
            _ => {}
        }
    }

    // --- Admin ---

    fn handle_admin_key(&mut self, key: KeyEvent) {
        let count = self.registry.len();
        let selected = self
            .registry
            .list()
            .get(self.state.selected_index)
            .map(|t| t.id.clone());

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.move_selection_down(count),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_selection_up(),
            KeyCode::Char('n') => {
                self.state.form = FormState::TemplateCreate(TemplateCreateForm::new());
                self.navigate(View::AdminCreate);
            }
            KeyCode::Char('e') => {
                let template = selected.as_deref().and_then(|id| self.registry.get(id).ok());
                if let Some(template) = template {
                    let form = TemplateCreateForm::from_template(template);
                    self.state.form = FormState::TemplateCreate(form);
                    self.navigate(View::AdminCreate);
                }
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                if let Some(id) = selected {
                    match self.registry.remove(&id) {
                        Ok(removed) => {
                            self.status_message =
                                Some(format!("Removed {}", removed.config.title));
                            self.state.clamp_selection(self.registry.len());
                        }
                        Err(e) => self.push_error(e.to_string()),
                    }
                }
            }
            KeyCode::Enter => {
                if let Some(id) = selected {
                    self.open_wizard(&id);
                }
            }
            KeyCode::Esc => self.go_back(),
            _ => {}
        }
    }

    fn handle_admin_create_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.state.form = FormState::None;
                self.go_back();
            }
            KeyCode::Char(SAVE_KEY) if key.modifiers.contains(SHORTCUT_MODIFIER) => {
                self.submit_template();
            }
            KeyCode::Enter if !self.state.form.is_active_field_multiline() => {
                self.state.form.next_field();
            }
            _ => {
                handle_form_input(&mut self.state.form, key);
            }
        }
    }

    fn submit_template(&mut self) {
        let FormState::TemplateCreate(form) = &self.state.form else {
            return;
        };
        let result = match &form.editing {
            Some(id) => self
                .registry
                .update(id, form.to_patch())
                .map(|t| format!("Document type updated: {}", t.id)),
            None => self
                .registry
                .add(form.to_new_template())
                .map(|t| format!("Document type added: {}", t.id)),
        };
        match result {
            Ok(message) => {
                self.status_message = Some(message);
                self.state.form = FormState::None;
                self.go_back();
            }
            Err(RegistryError::Invalid(e @ TemplateError::MissingField(_))) => {
                self.push_error(format!("Missing information: {e}"));
            }
            Err(RegistryError::Invalid(e)) => {
                self.push_error(format!("Invalid document type: {e}"));
            }
            Err(e) => self.push_error(e.to_string()),
        }
    }

    // --- Mouse ---

    /// Handle a mouse event. Only the signature pads take pointer input.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.state.has_errors()
            || self.state.show_preview
            || self.state.current_view != View::Wizard
        {
            return;
        }
        let roles = match self.state.wizard.as_ref() {
            Some(w) if matches!(w.current_step(), Step::Signatures { .. }) => w.signature_roles(),
            _ => return,
        };
        let canvases = self.signature_canvases(roles.len());
        let point = Position::new(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let hit = roles
                    .iter()
                    .zip(&canvases)
                    .find(|(_, canvas)| canvas.contains(point));
                if let Some((role, canvas)) = hit {
                    self.state.signatures.active = *role;
                    let pad = self.state.signatures.pad_mut(*role);
                    let (x, y) = pad.point_from_cell(
                        point.x - canvas.x,
                        point.y - canvas.y,
                        canvas.width,
                        canvas.height,
                    );
                    pad.begin_stroke(x, y);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let Some(role) = self.state.signatures.drawing_role() else {
                    return;
                };
                let Some(canvas) = roles
                    .iter()
                    .position(|r| *r == role)
                    .and_then(|i| canvases.get(i))
                else {
                    return;
                };
                // Dragging past the edge keeps drawing along it
                let col = point
                    .x
                    .clamp(canvas.x, canvas.right().saturating_sub(1).max(canvas.x));
                let row = point
                    .y
                    .clamp(canvas.y, canvas.bottom().saturating_sub(1).max(canvas.y));
                let pad = self.state.signatures.pad_mut(role);
                let (x, y) = pad.point_from_cell(
                    col - canvas.x,
                    row - canvas.y,
                    canvas.width,
                    canvas.height,
                );
                pad.extend_stroke(x, y);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let Some(role) = self.state.signatures.drawing_role() else {
                    return;
                };
                if let Some(payload) = self.state.signatures.pad_mut(role).end_stroke() {
                    if let Some(wizard) = self.state.wizard.as_mut() {
                        wizard.set_signature(role, payload);
                    }
                }
            }
            _ => {}
        }
    }

    /// Screen rectangles of the signature drawing surfaces
    fn signature_canvases(&self, count: usize) -> Vec<Rect> {
        let (height, width) = self.terminal_size.unwrap_or((24, 80));
        let (_, main) = ui::create_layout(Rect::new(0, 0, width, height));
        let (_, card, _) = ui::wizard_layout(main);
        ui::signature_pad_frames(card, count)
            .into_iter()
            .map(ui::pad_canvas)
            .collect()
    }
}

/// Apply a key to a text value. Returns the new value when the key edits it.
fn edit_text(current: &str, key: KeyEvent, multiline: bool) -> Option<String> {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let mut text = current.to_string();
            text.push(c);
            Some(text)
        }
        KeyCode::Backspace => {
            let mut text = current.to_string();
            text.pop()?;
            Some(text)
        }
        KeyCode::Enter if multiline => Some(format!("{current}\n")),
        _ => None,
    }
}

/// Generic field editing for the active form. Returns true when the key was used.
fn handle_form_input(form: &mut FormState, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Left | KeyCode::Right => {
            if let Some(field) = form.get_active_field_mut() {
                field.cycle(key.code == KeyCode::Right);
            }
        }
        KeyCode::Backspace => {
            if let Some(field) = form.get_active_field_mut() {
                field.pop_char();
            }
        }
        KeyCode::Enter if form.is_active_field_multiline() => {
            if let Some(field) = form.get_active_field_mut() {
                field.push_char('\n');
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(field) = form.get_active_field_mut() {
                field.push_char(c);
            }
        }
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MockDocumentOpener, MockGenerationClient};
    use crate::state::RecordStatus;
    use chrono::Utc;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn document(id: &str) -> GeneratedDocument {
        GeneratedDocument {
            id: id.to_string(),
            content: "Preview text".to_string(),
            download_url: format!("https://example.test/download/{id}"),
            created_at: Utc::now(),
        }
    }

    fn app_with(
        client: impl GenerationClient + 'static,
        opener: impl DocumentOpener + 'static,
        download_dir: PathBuf,
    ) -> App {
        App::with_services(
            AuthService::new(Box::new(MemorySessionStore::new()), Duration::ZERO),
            TemplateRegistry::with_builtin(),
            Arc::new(client),
            Box::new(opener),
            download_dir,
        )
    }

    fn app(client: impl GenerationClient + 'static) -> App {
        app_with(client, MockDocumentOpener::new(), PathBuf::from("."))
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c))).await.unwrap();
        }
    }

    async fn to_final_step(app: &mut App) {
        let steps = app.state.wizard.as_ref().unwrap().total_steps();
        for _ in 0..steps {
            app.handle_key(key(KeyCode::Tab)).await.unwrap();
        }
    }

    /// Let the spawned generation task run and collect its result
    async fn settle(app: &mut App) {
        for _ in 0..100 {
            app.poll_generation();
            if !app.is_generation_pending() {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("generation did not finish");
    }

    async fn sign_in(app: &mut App) {
        app.auth.login("user@test.com", "user123").await.unwrap();
    }

    mod navigation {
        use super::*;

        #[tokio::test]
        async fn test_starts_with_signed_in_users_history() {
            let mut auth =
                AuthService::new(Box::new(MemorySessionStore::new()), Duration::ZERO);
            auth.login("user@test.com", "user123").await.unwrap();
            let mut history = crate::state::DocumentHistory::default();
            history.record_generated("NDA", &document("doc_saved"));
            auth.save_history(&history).unwrap();

            let app = App::with_services(
                auth,
                TemplateRegistry::with_builtin(),
                Arc::new(MockGenerationClient::new()),
                Box::new(MockDocumentOpener::new()),
                PathBuf::from("."),
            );
            assert_eq!(app.state.history.records[0].id, "doc_saved");
            assert!(!app.state.has_errors());
        }

        #[test]
        fn test_new_from_ephemeral_config() {
            let dir = tempfile::tempdir().unwrap();
            let config = TuiConfig {
                use_dummy_backend: Some(true),
                simulated_latency_ms: Some(0),
                download_dir: Some(dir.path().to_path_buf()),
                ephemeral: Some(true),
                ..Default::default()
            };
            let app = App::new(&config).unwrap();
            assert!(!app.auth.is_authenticated());
            assert_eq!(app.registry.len(), 6);
            assert_eq!(app.download_dir, dir.path());
        }

        #[test]
        fn test_starts_on_catalog() {
            let app = app(MockGenerationClient::new());
            assert_eq!(app.state.current_view, View::Catalog);
            assert!(!app.should_quit());
        }

        #[test]
        fn test_go_back_skips_form_views() {
            let mut app = app(MockGenerationClient::new());
            app.open_wizard("nda");
            app.go_to_login();
            app.state.current_view = View::Register;
            app.state.view_history.push(View::Login);
            app.go_back();
            assert_eq!(app.state.current_view, View::Wizard);
        }

        #[test]
        fn test_go_back_with_empty_history_lands_on_catalog() {
            let mut app = app(MockGenerationClient::new());
            app.state.current_view = View::Dashboard;
            app.go_back();
            assert_eq!(app.state.current_view, View::Catalog);
        }

        #[test]
        fn test_protected_view_requires_sign_in() {
            let mut app = app(MockGenerationClient::new());
            app.navigate(View::Dashboard);
            assert_eq!(app.state.current_view, View::Login);
        }

        #[tokio::test]
        async fn test_quit_from_catalog() {
            let mut app = app(MockGenerationClient::new());
            app.handle_key(key(KeyCode::Char('q'))).await.unwrap();
            assert!(app.should_quit());
        }
    }

    mod wizard {
        use super::*;

        #[test]
        fn test_unknown_template_reports_and_stays_on_catalog() {
            let mut app = app(MockGenerationClient::new());
            app.open_wizard("does-not-exist");
            assert_eq!(app.state.current_view, View::Catalog);
            assert!(app.state.wizard.is_none());
            assert_eq!(
                app.state.current_error(),
                Some("Document type not found: does-not-exist")
            );
        }

        #[tokio::test]
        async fn test_enter_on_catalog_opens_selected_template() {
            let mut app = app(MockGenerationClient::new());
            app.handle_key(key(KeyCode::Down)).await.unwrap();
            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            assert_eq!(app.state.current_view, View::Wizard);
            assert_eq!(app.state.wizard.as_ref().unwrap().template_id(), "job-offer");
        }

        #[tokio::test]
        async fn test_typing_answers_and_advancing() {
            let mut app = app(MockGenerationClient::new());
            app.open_wizard("invoice");
            type_text(&mut app, "Acmf").await;
            app.handle_key(key(KeyCode::Backspace)).await.unwrap();
            type_text(&mut app, "e").await;
            app.handle_key(key(KeyCode::Enter)).await.unwrap();

            let wizard = app.state.wizard.as_ref().unwrap();
            assert_eq!(wizard.answer("company_name"), "Acme");
            assert_eq!(wizard.current_index(), 1);
        }

        #[tokio::test]
        async fn test_long_text_enter_inserts_newline() {
            let mut app = app(MockGenerationClient::new());
            app.open_wizard("rent-agreement");
            app.handle_key(key(KeyCode::Tab)).await.unwrap();
            app.handle_key(key(KeyCode::Tab)).await.unwrap();
            type_text(&mut app, "1 Main St").await;
            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            type_text(&mut app, "Springfield").await;

            let wizard = app.state.wizard.as_ref().unwrap();
            assert_eq!(wizard.current_index(), 2);
            assert_eq!(wizard.answer("property_address"), "1 Main St\nSpringfield");
        }

        #[tokio::test]
        async fn test_shift_tab_goes_back() {
            let mut app = app(MockGenerationClient::new());
            app.open_wizard("invoice");
            app.handle_key(key(KeyCode::Tab)).await.unwrap();
            app.handle_key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT))
                .await
                .unwrap();
            assert_eq!(app.state.wizard.as_ref().unwrap().current_index(), 0);
        }

        #[tokio::test]
        async fn test_esc_leaves_wizard() {
            let mut app = app(MockGenerationClient::new());
            app.open_wizard("invoice");
            app.handle_key(key(KeyCode::Esc)).await.unwrap();
            assert_eq!(app.state.current_view, View::Catalog);
            assert!(app.state.wizard.is_none());
        }
    }

    mod generation {
        use super::*;

        #[tokio::test]
        async fn test_double_enter_issues_one_request() {
            let mut client = MockGenerationClient::new();
            client
                .expect_generate()
                .times(1)
                .returning(|_, _| Ok(document("doc_1")));

            let mut app = app(client);
            sign_in(&mut app).await;
            app.open_wizard("invoice");
            to_final_step(&mut app).await;

            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            settle(&mut app).await;

            let wizard = app.state.wizard.as_ref().unwrap();
            assert_eq!(wizard.generated_document().unwrap().id, "doc_1");
            assert_eq!(app.state.history.records.len(), 1);
            assert_eq!(
                app.state.history.records[0].document_type,
                "Professional Invoice"
            );
            assert_eq!(app.auth.history(), app.state.history);
        }

        #[tokio::test]
        async fn test_auth_failure_sends_user_to_login_and_back() {
            let mut client = MockGenerationClient::new();
            client
                .expect_generate()
                .times(1)
                .returning(|_, token| {
                    assert!(token.is_none());
                    Err(GenerationError::AuthenticationRequired)
                });

            let mut app = app(client);
            app.open_wizard("invoice");
            to_final_step(&mut app).await;
            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            settle(&mut app).await;

            assert_eq!(app.state.current_view, View::Login);
            assert!(app.state.has_errors());
            assert!(app
                .state
                .wizard
                .as_ref()
                .unwrap()
                .generated_document()
                .is_none());

            // Dismiss, then sign in through the form
            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            type_text(&mut app, "user@test.com").await;
            app.handle_key(key(KeyCode::Tab)).await.unwrap();
            type_text(&mut app, "user123").await;
            app.handle_key(key(KeyCode::Enter)).await.unwrap();

            assert!(app.auth.is_authenticated());
            assert_eq!(app.state.current_view, View::Wizard);
            assert!(app.state.wizard.as_ref().unwrap().is_final_step());
        }

        #[tokio::test]
        async fn test_generic_failure_shows_error_and_allows_retry() {
            let mut client = MockGenerationClient::new();
            let mut seq = mockall::Sequence::new();
            client
                .expect_generate()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _| Err(GenerationError::Transport("refused".to_string())));
            client
                .expect_generate()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _| Ok(document("doc_2")));

            let mut app = app(client);
            sign_in(&mut app).await;
            app.open_wizard("invoice");
            to_final_step(&mut app).await;

            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            settle(&mut app).await;
            assert_eq!(app.state.current_view, View::Wizard);
            assert!(app
                .state
                .current_error()
                .unwrap()
                .starts_with("Failed to generate document"));

            app.handle_key(key(KeyCode::Enter)).await.unwrap(); // dismiss
            app.handle_key(key(KeyCode::Enter)).await.unwrap(); // retry
            settle(&mut app).await;
            assert!(app
                .state
                .wizard
                .as_ref()
                .unwrap()
                .generated_document()
                .is_some());
        }

        #[tokio::test]
        async fn test_result_after_leaving_wizard_is_dropped() {
            let mut app = app(DummyGenerationClient::new(Duration::ZERO));
            sign_in(&mut app).await;
            app.open_wizard("invoice");
            to_final_step(&mut app).await;
            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            app.handle_key(key(KeyCode::Esc)).await.unwrap();

            assert!(!app.is_generation_pending());
            assert!(app.state.history.is_empty());
        }

        #[tokio::test]
        async fn test_start_over_after_generation() {
            let mut app = app(DummyGenerationClient::new(Duration::ZERO));
            sign_in(&mut app).await;
            app.open_wizard("invoice");
            type_text(&mut app, "Acme").await;
            to_final_step(&mut app).await;
            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            settle(&mut app).await;

            app.handle_key(key(KeyCode::Char('n'))).await.unwrap();
            let wizard = app.state.wizard.as_ref().unwrap();
            assert_eq!(wizard.current_index(), 0);
            assert_eq!(wizard.answer("company_name"), "");
            assert!(wizard.generated_document().is_none());
        }
    }

    mod download {
        use super::*;

        #[tokio::test]
        async fn test_copy_link_marks_downloaded() {
            let mut opener = MockDocumentOpener::new();
            opener.expect_open().times(1).returning(|_| Ok(()));

            let mut app = app_with(
                DummyGenerationClient::new(Duration::ZERO),
                opener,
                PathBuf::from("."),
            );
            sign_in(&mut app).await;
            app.open_wizard("invoice");
            to_final_step(&mut app).await;
            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            settle(&mut app).await;

            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            assert_eq!(app.state.history.records[0].status, RecordStatus::Downloaded);
            assert_eq!(
                app.status_message.as_deref(),
                Some("Download link copied to clipboard")
            );
        }

        #[tokio::test]
        async fn test_copy_failure_is_reported() {
            let mut opener = MockDocumentOpener::new();
            opener
                .expect_open()
                .returning(|_| Err(anyhow::anyhow!("no clipboard")));

            let mut app = app_with(
                DummyGenerationClient::new(Duration::ZERO),
                opener,
                PathBuf::from("."),
            );
            sign_in(&mut app).await;
            app.open_wizard("invoice");
            to_final_step(&mut app).await;
            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            settle(&mut app).await;

            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            assert!(app.state.has_errors());
            assert_eq!(app.state.history.records[0].status, RecordStatus::Generated);
        }

        #[tokio::test]
        async fn test_save_writes_file() {
            let dir = tempfile::tempdir().unwrap();
            let mut app = app_with(
                DummyGenerationClient::new(Duration::ZERO),
                MockDocumentOpener::new(),
                dir.path().join("downloads"),
            );
            sign_in(&mut app).await;
            app.open_wizard("invoice");
            to_final_step(&mut app).await;
            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            settle(&mut app).await;

            app.handle_key(key(KeyCode::Char('s'))).await.unwrap();

            let id = app.state.history.records[0].id.clone();
            let path = dir.path().join("downloads").join(format!("document_{id}.pdf"));
            let saved = fs::read_to_string(path).unwrap();
            assert!(saved.contains("Professional Invoice"));
            assert_eq!(app.state.history.records[0].status, RecordStatus::Downloaded);
        }

        #[tokio::test]
        async fn test_preview_toggle() {
            let mut app = app(DummyGenerationClient::new(Duration::ZERO));
            sign_in(&mut app).await;
            app.open_wizard("invoice");
            to_final_step(&mut app).await;

            // Nothing to preview yet
            app.handle_key(key(KeyCode::Char('p'))).await.unwrap();
            assert!(!app.state.show_preview);

            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            settle(&mut app).await;
            app.handle_key(key(KeyCode::Char('p'))).await.unwrap();
            assert!(app.state.show_preview);
            app.handle_key(key(KeyCode::Esc)).await.unwrap();
            assert!(!app.state.show_preview);
            assert_eq!(app.state.current_view, View::Wizard);
        }
    }

    mod signatures {
        use super::*;

        fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
            MouseEvent {
                kind,
                column,
                row,
                modifiers: KeyModifiers::NONE,
            }
        }

        async fn at_signature_step(id: &str) -> App {
            let mut app = app(MockGenerationClient::new());
            app.terminal_size = Some((40, 120));
            app.open_wizard(id);
            while !matches!(
                app.state.wizard.as_ref().unwrap().current_step(),
                Step::Signatures { .. }
            ) {
                app.handle_key(key(KeyCode::Tab)).await.unwrap();
            }
            app
        }

        #[tokio::test]
        async fn test_drawing_stores_payload_for_pad() {
            let mut app = at_signature_step("nda").await;
            let canvases = app.signature_canvases(2);
            let second = canvases[1];

            let (x, y) = (second.x + 1, second.y + 1);
            app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), x, y));
            app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), x + 5, y + 2));
            app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), x + 5, y + 2));

            let wizard = app.state.wizard.as_ref().unwrap();
            assert!(wizard.signature(SignatureRole::Secondary).is_some());
            assert!(wizard.signature(SignatureRole::Primary).is_none());
            assert_eq!(app.state.signatures.active, SignatureRole::Secondary);
        }

        #[tokio::test]
        async fn test_clear_removes_payload() {
            let mut app = at_signature_step("job-offer").await;
            let canvas = app.signature_canvases(1)[0];
            app.handle_mouse(mouse(
                MouseEventKind::Down(MouseButton::Left),
                canvas.x,
                canvas.y,
            ));
            app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), canvas.x, canvas.y));
            assert!(app
                .state
                .wizard
                .as_ref()
                .unwrap()
                .signature(SignatureRole::Primary)
                .is_some());

            app.handle_key(key(KeyCode::Char('c'))).await.unwrap();
            assert!(app
                .state
                .wizard
                .as_ref()
                .unwrap()
                .signature(SignatureRole::Primary)
                .is_none());
        }

        #[tokio::test]
        async fn test_second_pad_only_with_dual_signature() {
            let mut app = at_signature_step("job-offer").await;
            app.handle_key(key(KeyCode::Char('2'))).await.unwrap();
            assert_eq!(app.state.signatures.active, SignatureRole::Primary);
            app.handle_key(key(KeyCode::Right)).await.unwrap();
            assert_eq!(app.state.signatures.active, SignatureRole::Primary);
        }

        #[tokio::test]
        async fn test_arrows_switch_pads_with_dual_signature() {
            let mut app = at_signature_step("nda").await;
            app.handle_key(key(KeyCode::Right)).await.unwrap();
            assert_eq!(app.state.signatures.active, SignatureRole::Secondary);
            app.handle_key(key(KeyCode::Char('1'))).await.unwrap();
            assert_eq!(app.state.signatures.active, SignatureRole::Primary);
        }

        #[tokio::test]
        async fn test_click_outside_pads_is_ignored() {
            let mut app = at_signature_step("nda").await;
            app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 0, 0));
            assert!(app.state.signatures.drawing_role().is_none());
        }
    }

    mod accounts {
        use super::*;

        #[tokio::test]
        async fn test_login_failure_shows_error() {
            let mut app = app(MockGenerationClient::new());
            app.handle_key(key(KeyCode::Char('l'))).await.unwrap();
            assert_eq!(app.state.current_view, View::Login);
            type_text(&mut app, "user@test.com").await;
            app.handle_key(key(KeyCode::Tab)).await.unwrap();
            type_text(&mut app, "wrong").await;
            app.handle_key(key(KeyCode::Enter)).await.unwrap();

            assert_eq!(app.state.current_error(), Some("Invalid email or password"));
            assert_eq!(app.state.current_view, View::Login);
        }

        #[tokio::test]
        async fn test_register_from_login() {
            let mut app = app(MockGenerationClient::new());
            app.handle_key(key(KeyCode::Char('l'))).await.unwrap();
            app.handle_key(ctrl(REGISTER_KEY)).await.unwrap();
            assert_eq!(app.state.current_view, View::Register);

            for value in ["Ada", "Lovelace", "ada@example.com", "secret1", "secret1"] {
                type_text(&mut app, value).await;
                app.handle_key(key(KeyCode::Tab)).await.unwrap();
            }
            app.handle_key(key(KeyCode::Enter)).await.unwrap();

            assert_eq!(app.auth.current_user().unwrap().name, "Ada Lovelace");
            assert_eq!(app.state.current_view, View::Catalog);
        }

        #[tokio::test]
        async fn test_logout() {
            let mut app = app(MockGenerationClient::new());
            sign_in(&mut app).await;
            app.handle_key(key(KeyCode::Char('o'))).await.unwrap();
            assert!(!app.auth.is_authenticated());
            assert_eq!(app.status_message.as_deref(), Some("Signed out"));
        }

        #[tokio::test]
        async fn test_dashboard_shows_history() {
            let mut app = app(DummyGenerationClient::new(Duration::ZERO));
            sign_in(&mut app).await;
            app.open_wizard("invoice");
            to_final_step(&mut app).await;
            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            settle(&mut app).await;
            app.handle_key(key(KeyCode::Esc)).await.unwrap();

            app.handle_key(key(KeyCode::Char('d'))).await.unwrap();
            assert_eq!(app.state.current_view, View::Dashboard);
            assert_eq!(app.state.history.records.len(), 1);
        }
    }

    mod admin {
        use super::*;

        async fn admin_app() -> App {
            let mut app = app(MockGenerationClient::new());
            app.auth.login("admin@docuforge.com", "admin123").await.unwrap();
            app
        }

        #[tokio::test]
        async fn test_non_admin_is_refused() {
            let mut app = app(MockGenerationClient::new());
            sign_in(&mut app).await;
            app.handle_key(key(KeyCode::Char('a'))).await.unwrap();
            assert_eq!(app.state.current_view, View::Catalog);
            assert_eq!(
                app.state.current_error(),
                Some("You don't have admin privileges.")
            );
        }

        #[tokio::test]
        async fn test_create_template_through_form() {
            let mut app = admin_app().await;
            app.handle_key(key(KeyCode::Char('a'))).await.unwrap();
            app.handle_key(key(KeyCode::Char('n'))).await.unwrap();
            assert_eq!(app.state.current_view, View::AdminCreate);

            type_text(&mut app, "Loan Agreement").await;
            app.handle_key(key(KeyCode::Tab)).await.unwrap();
            type_text(&mut app, "Money lent between parties").await;
            app.handle_key(ctrl(SAVE_KEY)).await.unwrap();

            assert_eq!(app.state.current_view, View::Admin);
            let template = app.registry.get("loan-agreement").unwrap();
            assert!(template.config.requires_signature);
            assert_eq!(template.category, "Legal");
            assert_eq!(template.config.questions[0].id, "basic_info");
        }

        #[tokio::test]
        async fn test_create_without_description_is_refused() {
            let mut app = admin_app().await;
            app.handle_key(key(KeyCode::Char('a'))).await.unwrap();
            app.handle_key(key(KeyCode::Char('n'))).await.unwrap();
            type_text(&mut app, "Loan Agreement").await;
            app.handle_key(ctrl(SAVE_KEY)).await.unwrap();

            assert_eq!(app.state.current_view, View::AdminCreate);
            assert_eq!(
                app.state.current_error(),
                Some("Missing information: description is required")
            );
            assert!(app.registry.get("loan-agreement").is_err());
        }

        #[tokio::test]
        async fn test_inconsistent_signatures_are_not_reported_as_missing() {
            let mut app = admin_app().await;
            app.handle_key(key(KeyCode::Char('a'))).await.unwrap();
            app.handle_key(key(KeyCode::Char('n'))).await.unwrap();
            type_text(&mut app, "Loan Agreement").await;
            app.handle_key(key(KeyCode::Tab)).await.unwrap();
            type_text(&mut app, "Money lent between parties").await;
            // Signature off, both parties on
            for _ in 0..3 {
                app.handle_key(key(KeyCode::Tab)).await.unwrap();
            }
            app.handle_key(key(KeyCode::Char(' '))).await.unwrap();
            app.handle_key(key(KeyCode::Tab)).await.unwrap();
            app.handle_key(key(KeyCode::Char(' '))).await.unwrap();
            app.handle_key(ctrl(SAVE_KEY)).await.unwrap();

            let error = app.state.current_error().unwrap();
            assert!(error.starts_with("Invalid document type:"), "{error}");
            assert!(!error.contains("Missing information"));
            assert!(app.registry.get("loan-agreement").is_err());
        }

        #[tokio::test]
        async fn test_edit_selected_template() {
            let mut app = admin_app().await;
            app.handle_key(key(KeyCode::Char('a'))).await.unwrap();
            app.handle_key(key(KeyCode::Char('e'))).await.unwrap();
            assert_eq!(app.state.current_view, View::AdminCreate);

            // Title is the active field, append to it
            type_text(&mut app, " (Monthly)").await;
            app.handle_key(ctrl(SAVE_KEY)).await.unwrap();

            assert_eq!(app.state.current_view, View::Admin);
            let template = app.registry.get("rent-agreement").unwrap();
            assert_eq!(template.title(), "Rent Agreement (Monthly)");
            assert_eq!(template.config.questions[0].id, "landlord_name");
            assert_eq!(app.registry.len(), 6);
        }

        #[tokio::test]
        async fn test_remove_selected_template() {
            let mut app = admin_app().await;
            app.handle_key(key(KeyCode::Char('a'))).await.unwrap();
            app.handle_key(key(KeyCode::Char('x'))).await.unwrap();
            assert_eq!(app.registry.len(), 5);
            assert!(app.registry.get("rent-agreement").is_err());
        }
    }

    mod text_editing {
        use super::*;

        #[test]
        fn test_edit_text() {
            assert_eq!(
                edit_text("ab", key(KeyCode::Char('c')), false),
                Some("abc".to_string())
            );
            assert_eq!(
                edit_text("ab", key(KeyCode::Backspace), false),
                Some("a".to_string())
            );
            assert_eq!(edit_text("", key(KeyCode::Backspace), false), None);
            assert_eq!(edit_text("a", key(KeyCode::Enter), false), None);
            assert_eq!(
                edit_text("a", key(KeyCode::Enter), true),
                Some("a\n".to_string())
            );
            assert_eq!(edit_text("a", ctrl('c'), false), None);
        }

        #[test]
        fn test_form_input_toggles_and_cycles() {
            let mut form = FormState::TemplateCreate(TemplateCreateForm::new());
            form.next_field();
            form.next_field();
            assert!(handle_form_input(&mut form, key(KeyCode::Right)));
            assert_eq!(form.active_field().unwrap().as_text(), "Business");
            form.next_field();
            form.next_field();
            assert!(handle_form_input(&mut form, key(KeyCode::Char(' '))));
            assert!(!form.active_field().unwrap().is_on());
            assert!(!handle_form_input(&mut form, key(KeyCode::Esc)));
        }
    }
}
