//! Development stand-in for the generation backend
//!
//! Behaves like the real service from the wizard's point of view: it insists
//! on a session token, takes a while, and hands back a document handle.

use super::{GenerationClient, GenerationError};
use crate::state::{GeneratedDocument, GenerationRequest};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;

const DOWNLOAD_BASE: &str = "https://api.example.com/documents/download";

/// In-process generation client used when no backend is configured
#[derive(Default)]
pub struct DummyGenerationClient {
    latency: Duration,
    generated: Mutex<HashMap<String, GeneratedDocument>>,
}

impl DummyGenerationClient {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            generated: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl GenerationClient for DummyGenerationClient {
    async fn generate(
        &self,
        request: GenerationRequest,
        token: Option<String>,
    ) -> Result<GeneratedDocument, GenerationError> {
        if token.is_none() {
            return Err(GenerationError::AuthenticationRequired);
        }

        tracing::info!(
            document_type = %request.document_type,
            answers = request.answers.len(),
            "Dummy generation request"
        );
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let now = Utc::now();
        let mut generated = self.generated.lock().await;
        // Ids are millisecond stamps; bump on collision so rapid calls stay distinct
        let mut millis = now.timestamp_millis();
        while generated.contains_key(&format!("doc_{millis}")) {
            millis += 1;
        }
        let id = format!("doc_{millis}");

        let document = GeneratedDocument {
            id: id.clone(),
            content: format!(
                "This is a dummy {} document generated with the provided answers.",
                request.document_type
            ),
            download_url: format!("{DOWNLOAD_BASE}/{id}"),
            created_at: now,
        };
        generated.insert(id, document.clone());

        Ok(document)
    }

    async fn download(
        &self,
        document_id: &str,
        token: Option<String>,
    ) -> Result<Vec<u8>, GenerationError> {
        if token.is_none() {
            return Err(GenerationError::AuthenticationRequired);
        }
        let generated = self.generated.lock().await;
        generated
            .get(document_id)
            .map(|doc| doc.content.clone().into_bytes())
            .ok_or_else(|| GenerationError::NotFound(document_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn request(document_type: &str) -> GenerationRequest {
        GenerationRequest {
            document_type: document_type.to_string(),
            answers: HashMap::new(),
            modifications: String::new(),
            signatures: HashMap::new(),
        }
    }

    fn token() -> Option<String> {
        Some("dummy-jwt-token".to_string())
    }

    #[tokio::test]
    async fn test_requires_token() {
        let client = DummyGenerationClient::default();
        let err = client.generate(request("NDA"), None).await.unwrap_err();
        assert!(err.requires_authentication());
    }

    #[tokio::test]
    async fn test_generates_document_handle() {
        let client = DummyGenerationClient::default();
        let doc = assert_ok!(client.generate(request("Rent Agreement"), token()).await);

        assert!(doc.id.starts_with("doc_"));
        assert_eq!(
            doc.content,
            "This is a dummy Rent Agreement document generated with the provided answers."
        );
        assert_eq!(doc.download_url, format!("{DOWNLOAD_BASE}/{}", doc.id));
    }

    #[tokio::test]
    async fn test_rapid_calls_get_distinct_ids() {
        let client = DummyGenerationClient::default();
        let a = client.generate(request("NDA"), token()).await.unwrap();
        let b = client.generate(request("NDA"), token()).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_download_returns_content() {
        let client = DummyGenerationClient::default();
        let doc = client.generate(request("NDA"), token()).await.unwrap();
        let bytes = client.download(&doc.id, token()).await.unwrap();
        assert_eq!(bytes, doc.content.into_bytes());
    }

    #[tokio::test]
    async fn test_download_unknown_document() {
        let client = DummyGenerationClient::default();
        let err = assert_err!(client.download("doc_0", token()).await);
        assert_eq!(err, GenerationError::NotFound("doc_0".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_simulated() {
        let client = DummyGenerationClient::new(Duration::from_secs(2));
        let started = tokio::time::Instant::now();
        client.generate(request("NDA"), token()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(2));
    }
}
