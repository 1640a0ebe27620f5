//! Generation backend errors

/// Failure talking to the generation backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// No session, or the backend rejected the token (HTTP 401)
    #[error("Authentication required. Please log in again.")]
    AuthenticationRequired,

    /// Backend answered with a non-success status
    #[error("HTTP error! status: {status}")]
    Http { status: u16, message: String },

    /// Request never got a response
    #[error("Failed to reach the document service: {0}")]
    Transport(String),

    /// Response body could not be understood
    #[error("Invalid response from the document service: {0}")]
    InvalidResponse(String),

    /// Backend does not know the requested document
    #[error("Document not found: {0}")]
    NotFound(String),
}

impl GenerationError {
    /// True for the 401-equivalent class the caller should answer with a login prompt
    pub fn requires_authentication(&self) -> bool {
        matches!(self, Self::AuthenticationRequired)
    }

    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 => Self::AuthenticationRequired,
            _ => Self::Http {
                status,
                message: message.into(),
            },
        }
    }
}
