//! Generated documents and the per-user document history

use super::signature::SignatureRole;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Payload sent to the generation backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub document_type: String,
    pub answers: HashMap<String, String>,
    pub modifications: String,
    pub signatures: HashMap<SignatureRole, String>,
}

/// Handle to a document the backend produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDocument {
    pub id: String,
    /// Preview text
    pub content: String,
    pub download_url: String,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle of a document in the user's history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Generated,
    Downloaded,
}

impl RecordStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Generated => "generated",
            Self::Downloaded => "downloaded",
        }
    }
}

/// One entry on the user dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: String,
    pub document_type: String,
    pub created_at: DateTime<Utc>,
    pub status: RecordStatus,
}

/// Dashboard counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryStats {
    pub total: usize,
    pub downloaded: usize,
    pub generated: usize,
    pub this_month: usize,
}

/// Documents a user has generated, newest first
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentHistory {
    pub records: Vec<DocumentRecord>,
}

impl DocumentHistory {
    /// Record a freshly generated document
    pub fn record_generated(&mut self, document_type: &str, document: &GeneratedDocument) {
        if self.records.iter().any(|r| r.id == document.id) {
            return;
        }
        self.records.insert(
            0,
            DocumentRecord {
                id: document.id.clone(),
                document_type: document_type.to_string(),
                created_at: document.created_at,
                status: RecordStatus::Generated,
            },
        );
    }

    /// Mark a document as downloaded. Returns false if it isn't in the history.
    pub fn mark_downloaded(&mut self, id: &str) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.status = RecordStatus::Downloaded;
                true
            }
            None => false,
        }
    }

    pub fn stats(&self, now: DateTime<Utc>) -> HistoryStats {
        let downloaded = self
            .records
            .iter()
            .filter(|r| r.status == RecordStatus::Downloaded)
            .count();
        let this_month = self
            .records
            .iter()
            .filter(|r| r.created_at.year() == now.year() && r.created_at.month() == now.month())
            .count();

        HistoryStats {
            total: self.records.len(),
            downloaded,
            generated: self.records.len() - downloaded,
            this_month,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
