//! Application state module

mod app_state;
mod document;
mod forms;
mod session;
mod signature;
mod template;
mod wizard;

pub use app_state::*;
pub use document::*;
pub use forms::*;
pub use session::*;
pub use signature::*;
pub use template::*;
pub use wizard::*;
