//! Form rendering module
//!
//! - `field_renderer`: Field rendering utilities
//! - `auth_form`: Sign-in and sign-up forms
//! - `template_form`: Document type authoring form

mod auth_form;
mod field_renderer;
mod template_form;

pub use auth_form::{draw_login, draw_register};
pub use field_renderer::draw_field_with_value;
pub use template_form::draw_template_create;
