// --- Request structs ---
use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`. Both fields are optional here so that a missing
/// one is reported by the chat agent rather than rejected by the extractor.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatRequest {
    pub message: Option<String>,
    pub wallet_address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionQuery {
    pub signature: Option<String>,
    pub summary: Option<String>,
}

impl TransactionQuery {
    pub fn wants_summary(&self) -> bool {
        self.summary.as_deref() == Some("true")
    }
}

// --- Response structs ---

#[derive(Debug, Serialize)]
pub struct TransactionSummaryResponse {
    pub summary: String,
    pub signature: String,
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub transaction_type: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into(), details: None }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
