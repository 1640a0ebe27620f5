//! HTTP client for the document generation backend
//!
//! Talks JSON to `/api/documents/generate` and fetches rendered files from
//! `/api/documents/download/{id}`, authenticating with the session bearer token.

use super::{GenerationClient, GenerationError};
use crate::state::{GeneratedDocument, GenerationRequest};
use async_trait::async_trait;
use reqwest::StatusCode;

const GENERATE_PATH: &str = "/api/documents/generate";
const DOWNLOAD_PATH: &str = "/api/documents/download";

/// Client for the real generation backend
pub struct HttpGenerationClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpGenerationClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("docuforge-tui/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_http(http, base_url))
    }

    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn generate_url(&self) -> String {
        format!("{}{GENERATE_PATH}", self.base_url)
    }

    pub fn download_url(&self, document_id: &str) -> String {
        format!("{}{DOWNLOAD_PATH}/{document_id}", self.base_url)
    }
}

/// Turn a non-success response into a classified error
async fn error_from_response(response: reqwest::Response) -> GenerationError {
    let status = response.status();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "unable to read response body".to_string());
    if status == StatusCode::NOT_FOUND {
        return GenerationError::NotFound(message);
    }
    GenerationError::from_status(status.as_u16(), message)
}

#[async_trait]
impl GenerationClient for HttpGenerationClient {
    async fn generate(
        &self,
        request: GenerationRequest,
        token: Option<String>,
    ) -> Result<GeneratedDocument, GenerationError> {
        let token = token.ok_or(GenerationError::AuthenticationRequired)?;
        tracing::debug!(
            document_type = %request.document_type,
            answers = request.answers.len(),
            signatures = request.signatures.len(),
            "Sending generation request"
        );

        let response = self
            .http
            .post(self.generate_url())
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let err = error_from_response(response).await;
            tracing::warn!("Generation request rejected: {err}");
            return Err(err);
        }

        response
            .json::<GeneratedDocument>()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))
    }

    async fn download(
        &self,
        document_id: &str,
        token: Option<String>,
    ) -> Result<Vec<u8>, GenerationError> {
        let token = token.ok_or(GenerationError::AuthenticationRequired)?;

        let response = self
            .http
            .get(self.download_url(document_id))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
