//! Trait abstractions for the backend so the wizard can be tested with mocks

use super::GenerationError;
use crate::state::{GeneratedDocument, GenerationRequest};
use async_trait::async_trait;

/// Remote service that turns collected answers into a document
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Generate a document. `token` is the session bearer token, if any.
    async fn generate(
        &self,
        request: GenerationRequest,
        token: Option<String>,
    ) -> Result<GeneratedDocument, GenerationError>;

    /// Fetch the rendered bytes of a previously generated document
    async fn download(
        &self,
        document_id: &str,
        token: Option<String>,
    ) -> Result<Vec<u8>, GenerationError>;
}

/// Hands a download locator to whatever can open it
#[cfg_attr(test, mockall::automock)]
pub trait DocumentOpener {
    fn open(&self, locator: &str) -> anyhow::Result<()>;
}
