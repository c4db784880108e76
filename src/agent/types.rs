use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::time::Duration;

/// Lamports per SOL.
pub const LAMPORTS_PER_SOL: f64 = 1e9;

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("{0} is not set in environment variables")]
    MissingSetting(&'static str),

    #[error("No {0} provided in request")]
    InvalidRequest(&'static str),

    #[error("Model API error: {0}")]
    ModelApi(String),

    #[error("Blockchain provider error: {0}")]
    Provider(String),

    #[error("Invalid address {0}")]
    InvalidAddress(String),

    #[error("Invalid transaction signature {0}")]
    InvalidSignature(String),

    #[error("Remote call timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One message of a conversation, built per request and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: ChatRole::User, text: text.into() }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self { role: ChatRole::Assistant, text: text.into() }
    }
}

/// A data request found in the model's reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentMarker {
    AccountInfo { address: String },
    TokenBalance { address: String },
    /// `signature` is `None` when the marker appeared without a usable
    /// `Signature: <base58>` pair; such a marker is skipped.
    TransactionInfo { signature: Option<String> },
}

/// Raw account state as returned by the account reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    pub lamports: u64,
    pub owner: String,
    pub executable: bool,
    pub rent_epoch: u64,
    pub data_length: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TokenBalance {
    pub lamports: u64,
    pub sol: f64,
}

impl TokenBalance {
    pub fn from_lamports(lamports: u64) -> Self {
        Self { lamports, sol: lamports as f64 / LAMPORTS_PER_SOL }
    }
}

/// Point-in-time read of an account, refetched on every query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSnapshot {
    pub balance: TokenBalance,
    pub owner: String,
    pub executable: bool,
    pub rent_epoch: u64,
    pub space: usize,
    #[serde(rename = "data", serialize_with = "describe_data")]
    pub has_data: bool,
}

impl From<AccountInfo> for AccountSnapshot {
    fn from(info: AccountInfo) -> Self {
        Self {
            balance: TokenBalance::from_lamports(info.lamports),
            owner: info.owner,
            executable: info.executable,
            rent_epoch: info.rent_epoch,
            space: info.data_length,
            has_data: info.data_length > 0,
        }
    }
}

fn describe_data<S: Serializer>(has_data: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *has_data { "Contains data" } else { "No data" })
}

/// A parsed transaction from the indexing service.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    pub transaction_type: String,
    pub unix_timestamp: i64,
    pub signature: String,
    pub raw_details: Value,
    summary: Option<String>,
}

impl TransactionRecord {
    /// Builds a record from one element of the indexer's response array.
    pub fn from_parsed(signature: &str, raw: Value) -> Self {
        let transaction_type = raw
            .get("type")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .unwrap_or("Unknown")
            .to_string();
        let unix_timestamp = raw.get("timestamp").and_then(Value::as_i64).unwrap_or(0);

        Self {
            transaction_type,
            unix_timestamp,
            signature: signature.to_string(),
            raw_details: raw,
            summary: None,
        }
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Attaches the summary. A record that already carries one keeps it.
    pub fn with_summary(mut self, summary: String) -> Self {
        if self.summary.is_none() {
            self.summary = Some(summary);
        }
        self
    }
}

/// Transaction as it appears in the chat payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionData {
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub timestamp: i64,
    pub signature: String,
    pub summary: String,
    pub details: Value,
}

impl TransactionData {
    /// Returns `None` for a record that has not been summarized yet.
    pub fn from_record(record: TransactionRecord) -> Option<Self> {
        let summary = record.summary?;
        Some(Self {
            transaction_type: record.transaction_type,
            timestamp: record.unix_timestamp,
            signature: record.signature,
            summary,
            details: record.raw_details,
        })
    }
}

/// Blockchain enrichment attached to a chat reply. Unresolved fields are
/// omitted from the JSON, never `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockchainData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_info: Option<AccountSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<TransactionData>,
}

impl BlockchainData {
    pub fn is_empty(&self) -> bool {
        self.account_info.is_none() && self.balance.is_none() && self.transaction.is_none()
    }
}

/// Payload returned for one chat turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    pub blockchain_data: BlockchainData,
}
