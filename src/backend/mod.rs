//! Document generation backend
//!
//! The wizard talks to the backend only through [`GenerationClient`]; the
//! concrete client is picked from configuration at startup.

mod client;
mod dummy;
mod error;
mod opener;
mod traits;

pub use client::HttpGenerationClient;
pub use dummy::DummyGenerationClient;
pub use error::GenerationError;
pub use opener::ClipboardOpener;
pub use traits::{DocumentOpener, GenerationClient};

#[cfg(test)]
pub use traits::{MockDocumentOpener, MockGenerationClient};
