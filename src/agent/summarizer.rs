//! Natural-language summaries of parsed transactions.

use chrono::DateTime;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::agent::ai_client::ModelClient;
use crate::agent::types::{AgentError, TransactionRecord};

pub const DEFAULT_MAX_SENTENCES: u8 = 3;

#[derive(Clone)]
pub struct Summarizer {
    model: Arc<dyn ModelClient>,
    max_sentences: u8,
    call_timeout: Duration,
}

impl Summarizer {
    pub fn new(model: Arc<dyn ModelClient>, call_timeout: Duration) -> Self {
        Self { model, max_sentences: DEFAULT_MAX_SENTENCES, call_timeout }
    }

    pub fn with_max_sentences(mut self, max_sentences: u8) -> Self {
        self.max_sentences = max_sentences.max(1);
        self
    }

    /// Always returns a summary, falling back to a templated sentence when
    /// the model call fails.
    pub async fn summarize(&self, record: &TransactionRecord) -> String {
        let prompt = self.build_prompt(record);

        let outcome = tokio::time::timeout(self.call_timeout, self.model.summarize_transaction(&prompt))
            .await
            .map_err(|_| AgentError::Timeout(self.call_timeout))
            .and_then(|result| result);

        match outcome {
            Ok(summary) if !summary.trim().is_empty() => {
                debug!("Summarized transaction {}", record.signature);
                summary.trim().to_string()
            }
            Ok(_) => {
                warn!("Empty summary for transaction {}, using fallback", record.signature);
                fallback_summary(record)
            }
            Err(e) => {
                warn!("Error generating transaction summary for {}: {}", record.signature, e);
                fallback_summary(record)
            }
        }
    }

    /// Consumes `record` and returns it with its summary attached.
    pub async fn summarize_record(&self, record: TransactionRecord) -> TransactionRecord {
        let summary = self.summarize(&record).await;
        record.with_summary(summary)
    }

    fn build_prompt(&self, record: &TransactionRecord) -> String {
        let details = if record.raw_details.is_null() {
            String::new()
        } else {
            format!("Details: {}\n", record.raw_details)
        };

        format!(
            r#"Analyze this Solana transaction and provide a concise summary in maximum {} sentences:
Type: {}
Timestamp: {}
Signature: {}
{}
Focus on the most important aspects and keep the summary clear and informative."#,
            self.max_sentences,
            record.transaction_type,
            format_timestamp(record.unix_timestamp),
            record.signature,
            details
        )
    }
}

/// Deterministic sentence used when no model summary is available.
pub fn fallback_summary(record: &TransactionRecord) -> String {
    format!(
        "Transaction of type {} processed at {}.",
        record.transaction_type,
        format_timestamp(record.unix_timestamp)
    )
}

/// Formats Unix seconds as a UTC `M/D/YYYY, h:mm:ss AM` string.
pub fn format_timestamp(unix_seconds: i64) -> String {
    unix_seconds
        .checked_mul(1000)
        .and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string())
        .unwrap_or_else(|| "Invalid Date".to_string())
}
