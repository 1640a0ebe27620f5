//! Form state management and form structs

use super::field::FormField;
use crate::auth::RegisterRequest;
use crate::registry::{DocumentTemplate, NewTemplate, TemplatePatch, CATEGORIES};
use crate::state::{format_question_lines, parse_question_lines};

/// Trait for common form operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
    fn get_active_field_mut(&mut self) -> &mut FormField;
    fn get_field(&self, index: usize) -> Option<&FormField>;
}

/// Enum representing all possible form states
#[derive(Debug, Clone, Default)]
pub enum FormState {
    #[default]
    None,
    Login(LoginForm),
    Register(RegisterForm),
    TemplateCreate(TemplateCreateForm),
}

impl FormState {
    fn form_mut(&mut self) -> Option<&mut dyn Form> {
        match self {
            FormState::None => None,
            FormState::Login(f) => Some(f),
            FormState::Register(f) => Some(f),
            FormState::TemplateCreate(f) => Some(f),
        }
    }

    fn form(&self) -> Option<&dyn Form> {
        match self {
            FormState::None => None,
            FormState::Login(f) => Some(f),
            FormState::Register(f) => Some(f),
            FormState::TemplateCreate(f) => Some(f),
        }
    }

    pub fn next_field(&mut self) {
        if let Some(f) = self.form_mut() {
            f.next_field();
        }
    }

    pub fn prev_field(&mut self) {
        if let Some(f) = self.form_mut() {
            f.prev_field();
        }
    }

    pub fn get_active_field_mut(&mut self) -> Option<&mut FormField> {
        self.form_mut().map(|f| f.get_active_field_mut())
    }

    pub fn active_field(&self) -> Option<&FormField> {
        self.form().and_then(|f| f.get_field(f.active_field()))
    }

    pub fn is_active_field_multiline(&self) -> bool {
        self.active_field().is_some_and(|f| f.is_multiline)
    }

    /// Fields in display order with the index of the focused one
    pub fn fields(&self) -> (Vec<&FormField>, usize) {
        match self.form() {
            None => (Vec::new(), 0),
            Some(f) => (
                (0..f.field_count()).filter_map(|i| f.get_field(i)).collect(),
                f.active_field(),
            ),
        }
    }
}

// Login Form
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: FormField,
    pub password: FormField,
    pub active_field_index: usize,
}

impl LoginForm {
    pub fn new() -> Self {
        Self {
            email: FormField::text("Email", false),
            password: FormField::secret("Password"),
            active_field_index: 0,
        }
    }
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for LoginForm {
    fn field_count(&self) -> usize {
        2
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(1);
    }
    fn get_active_field_mut(&mut self) -> &mut FormField {
        match self.active_field_index {
            0 => &mut self.email,
            _ => &mut self.password,
        }
    }
    fn get_field(&self, index: usize) -> Option<&FormField> {
        match index {
            0 => Some(&self.email),
            1 => Some(&self.password),
            _ => None,
        }
    }
}

// Register Form
#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub first_name: FormField,
    pub last_name: FormField,
    pub email: FormField,
    pub password: FormField,
    pub confirm_password: FormField,
    pub active_field_index: usize,
}

impl RegisterForm {
    pub fn new() -> Self {
        Self {
            first_name: FormField::text("First Name", false),
            last_name: FormField::text("Last Name", false),
            email: FormField::text("Email", false),
            password: FormField::secret("Password"),
            confirm_password: FormField::secret("Confirm Password"),
            active_field_index: 0,
        }
    }

    pub fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            first_name: self.first_name.as_text().to_string(),
            last_name: self.last_name.as_text().to_string(),
            email: self.email.as_text().to_string(),
            password: self.password.as_text().to_string(),
            confirm_password: self.confirm_password.as_text().to_string(),
        }
    }
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for RegisterForm {
    fn field_count(&self) -> usize {
        5
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(4);
    }
    fn get_active_field_mut(&mut self) -> &mut FormField {
        match self.active_field_index {
            0 => &mut self.first_name,
            1 => &mut self.last_name,
            2 => &mut self.email,
            3 => &mut self.password,
            _ => &mut self.confirm_password,
        }
    }
    fn get_field(&self, index: usize) -> Option<&FormField> {
        match index {
            0 => Some(&self.first_name),
            1 => Some(&self.last_name),
            2 => Some(&self.email),
            3 => Some(&self.password),
            4 => Some(&self.confirm_password),
            _ => None,
        }
    }
}

// Template Create Form
#[derive(Debug, Clone)]
pub struct TemplateCreateForm {
    pub title: FormField,
    pub description: FormField,
    pub category: FormField,
    pub price: FormField,
    pub requires_signature: FormField,
    pub dual_party_signature: FormField,
    /// One question per line, see `parse_question_lines`
    pub questions: FormField,
    pub active_field_index: usize,
    /// Id of the template being edited, `None` when adding
    pub editing: Option<String>,
    /// Question block as prefilled, so untouched questions keep their ids
    original_questions: String,
}

impl TemplateCreateForm {
    pub fn new() -> Self {
        Self {
            title: FormField::text("Title", false),
            description: FormField::text("Description", true),
            category: FormField::choice("Category", CATEGORIES),
            price: FormField::text("Price", false),
            requires_signature: FormField::toggle("Requires Signature", true),
            dual_party_signature: FormField::toggle("Both Parties Sign", false),
            questions: FormField::text("Questions", true),
            active_field_index: 0,
            editing: None,
            original_questions: String::new(),
        }
    }

    /// Form prefilled from an existing template
    pub fn from_template(template: &DocumentTemplate) -> Self {
        let mut form = Self::new();
        let config = &template.config;
        form.title.set_text(config.title.clone());
        form.description.set_text(config.description.clone());
        form.category.select(&template.category);
        form.price.set_text(template.price.clone());
        form.requires_signature.set_on(config.requires_signature);
        form.dual_party_signature.set_on(config.dual_party_signature);
        form.original_questions = format_question_lines(&config.questions);
        form.questions.set_text(form.original_questions.clone());
        form.editing = Some(template.id.clone());
        form
    }

    /// Changes for the template being edited
    pub fn to_patch(&self) -> TemplatePatch {
        let questions = (self.questions.as_text() != self.original_questions)
            .then(|| parse_question_lines(self.questions.as_text()));
        TemplatePatch {
            title: Some(self.title.as_text().trim().to_string()),
            description: Some(self.description.as_text().trim().to_string()),
            category: Some(self.category.as_text().to_string()),
            price: Some(self.price.as_text().trim().to_string()),
            questions,
            requires_signature: Some(self.requires_signature.is_on()),
            dual_party_signature: Some(self.dual_party_signature.is_on()),
        }
    }

    pub fn to_new_template(&self) -> NewTemplate {
        let questions = if self.questions.as_text().trim().is_empty() {
            Vec::new()
        } else {
            parse_question_lines(self.questions.as_text())
        };
        NewTemplate {
            title: self.title.as_text().to_string(),
            description: self.description.as_text().to_string(),
            category: self.category.as_text().to_string(),
            price: self.price.as_text().trim().to_string(),
            questions,
            requires_signature: self.requires_signature.is_on(),
            dual_party_signature: self.dual_party_signature.is_on(),
        }
    }
}

impl Default for TemplateCreateForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for TemplateCreateForm {
    fn field_count(&self) -> usize {
        7
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(6);
    }
    fn get_active_field_mut(&mut self) -> &mut FormField {
        match self.active_field_index {
            0 => &mut self.title,
            1 => &mut self.description,
            2 => &mut self.category,
            3 => &mut self.price,
            4 => &mut self.requires_signature,
            5 => &mut self.dual_party_signature,
            _ => &mut self.questions,
        }
    }
    fn get_field(&self, index: usize) -> Option<&FormField> {
        match index {
            0 => Some(&self.title),
            1 => Some(&self.description),
            2 => Some(&self.category),
            3 => Some(&self.price),
            4 => Some(&self.requires_signature),
            5 => Some(&self.dual_party_signature),
            6 => Some(&self.questions),
            _ => None,
        }
    }
}
