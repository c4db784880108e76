//! Detection of data-request markers in model replies.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::agent::types::IntentMarker;

pub const ACCOUNT_INFO: &str = "ACCOUNT_INFO";
pub const TOKEN_BALANCE: &str = "TOKEN_BALANCE";
pub const TRANSACTION_INFO: &str = "TRANSACTION_INFO";

const MARKER_TOKENS: [&str; 3] = [ACCOUNT_INFO, TOKEN_BALANCE, TRANSACTION_INFO];

static SIGNATURE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Signature: ([1-9A-HJ-NP-Za-km-z]+)").expect("signature pattern is valid")
});

/// Result of scanning one model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    /// At most one marker of each kind, in account, balance, transaction order.
    pub markers: Vec<IntentMarker>,
    pub cleaned_text: String,
}

impl ParsedReply {
    /// Address for the account lookup, if an account marker was present.
    pub fn account_address(&self) -> Option<&str> {
        self.markers.iter().find_map(|m| match m {
            IntentMarker::AccountInfo { address } => Some(address.as_str()),
            _ => None,
        })
    }

    /// Address for the balance lookup, if a balance marker was present.
    pub fn balance_address(&self) -> Option<&str> {
        self.markers.iter().find_map(|m| match m {
            IntentMarker::TokenBalance { address } => Some(address.as_str()),
            _ => None,
        })
    }

    /// The signature to look up, if a transaction marker carried a usable one.
    pub fn transaction_signature(&self) -> Option<&str> {
        self.markers.iter().find_map(|m| match m {
            IntentMarker::TransactionInfo { signature } => signature.as_deref(),
            _ => None,
        })
    }
}

/// Scans `model_text` for markers. Account and balance markers always resolve
/// to `wallet_address`; addresses echoed by the model are ignored.
pub fn parse(model_text: &str, wallet_address: &str) -> ParsedReply {
    let mut markers = Vec::new();

    if model_text.contains(ACCOUNT_INFO) {
        markers.push(IntentMarker::AccountInfo { address: wallet_address.to_string() });
    }
    if model_text.contains(TOKEN_BALANCE) {
        markers.push(IntentMarker::TokenBalance { address: wallet_address.to_string() });
    }
    if model_text.contains(TRANSACTION_INFO) {
        markers.push(IntentMarker::TransactionInfo { signature: extract_signature(model_text) });
    }

    ParsedReply { markers, cleaned_text: strip_marker_lines(model_text) }
}

fn extract_signature(text: &str) -> Option<String> {
    SIGNATURE_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Drops every line that mentions a marker token, then trims the result.
/// Kept lines retain their original terminators.
pub fn strip_marker_lines(text: &str) -> String {
    text.split_inclusive('\n')
        .filter(|line| !MARKER_TOKENS.iter().any(|token| line.contains(token)))
        .collect::<String>()
        .trim()
        .to_string()
}
