//! Form domain layer
//!
//! Type-safe form handling for the sign-in, sign-up and template authoring views.

mod field;
mod form_state;

pub use field::{FieldValue, FormField};
pub use form_state::{FormState, LoginForm, RegisterForm, TemplateCreateForm};
