//! Mock collaborators for tests.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::agent::ai_client::ModelClient;
use crate::agent::data_fetcher::{AccountReader, TransactionReader};
use crate::agent::types::{AccountInfo, AgentError, ChatTurn};

pub const WALLET: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";
pub const SAMPLE_SIGNATURE: &str =
    "5VERv8NMvzbJMEkV8xnrLkEaWRtSz9CosKDYjCJjBRnbJLgp8uirBgmQpjKhoR4tjF3ZpRzrFmBV6UjKdiSZkQUW";

/// Mock model with canned chat and summary replies.
#[derive(Clone)]
pub struct MockModel {
    chat_reply: Result<String, String>,
    summary_reply: Result<String, String>,
    delay: Option<Duration>,
    chat_calls: Arc<AtomicUsize>,
    summary_calls: Arc<AtomicUsize>,
    last_persona: Arc<Mutex<Option<String>>>,
    last_summary_prompt: Arc<Mutex<Option<String>>>,
}

impl MockModel {
    pub fn replying(text: &str) -> Self {
        Self {
            chat_reply: Ok(text.to_string()),
            summary_reply: Ok("A transfer of 1 SOL between two wallets.".to_string()),
            delay: None,
            chat_calls: Arc::new(AtomicUsize::new(0)),
            summary_calls: Arc::new(AtomicUsize::new(0)),
            last_persona: Arc::new(Mutex::new(None)),
            last_summary_prompt: Arc::new(Mutex::new(None)),
        }
    }

    pub fn failing_chat(error: &str) -> Self {
        let mut model = Self::replying("");
        model.chat_reply = Err(error.to_string());
        model
    }

    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary_reply = Ok(summary.to_string());
        self
    }

    pub fn with_failing_summary(mut self) -> Self {
        self.summary_reply = Err("summary model unavailable".to_string());
        self
    }

    /// Delays both chat and summary replies.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn chat_calls(&self) -> usize {
        self.chat_calls.load(Ordering::SeqCst)
    }

    pub fn summary_calls(&self) -> usize {
        self.summary_calls.load(Ordering::SeqCst)
    }

    pub fn last_persona(&self) -> Option<String> {
        self.last_persona.lock().unwrap().clone()
    }

    pub fn last_summary_prompt(&self) -> Option<String> {
        self.last_summary_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for MockModel {
    async fn send_chat(
        &self,
        system_persona: &str,
        _history: &[ChatTurn],
        _message: &str,
    ) -> Result<String, AgentError> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_persona.lock().unwrap() = Some(system_persona.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.chat_reply.clone().map_err(AgentError::ModelApi)
    }

    async fn summarize_transaction(&self, prompt: &str) -> Result<String, AgentError> {
        self.summary_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_summary_prompt.lock().unwrap() = Some(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.summary_reply.clone().map_err(AgentError::ModelApi)
    }
}

#[derive(Clone)]
enum AccountBehavior {
    Lamports(u64),
    Missing,
    Failing,
}

/// Mock RPC account reader.
#[derive(Clone)]
pub struct MockAccounts {
    behavior: AccountBehavior,
    delay: Option<Duration>,
    account_calls: Arc<AtomicUsize>,
    balance_calls: Arc<AtomicUsize>,
    addresses: Arc<Mutex<Vec<String>>>,
}

impl MockAccounts {
    fn build(behavior: AccountBehavior) -> Self {
        Self {
            behavior,
            delay: None,
            account_calls: Arc::new(AtomicUsize::new(0)),
            balance_calls: Arc::new(AtomicUsize::new(0)),
            addresses: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_lamports(lamports: u64) -> Self {
        Self::build(AccountBehavior::Lamports(lamports))
    }

    pub fn missing() -> Self {
        Self::build(AccountBehavior::Missing)
    }

    pub fn failing() -> Self {
        Self::build(AccountBehavior::Failing)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn account_calls(&self) -> usize {
        self.account_calls.load(Ordering::SeqCst)
    }

    pub fn balance_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
    }

    pub fn addresses(&self) -> Vec<String> {
        self.addresses.lock().unwrap().clone()
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl AccountReader for MockAccounts {
    async fn get_account_info(&self, address: &str) -> Result<Option<AccountInfo>, AgentError> {
        self.account_calls.fetch_add(1, Ordering::SeqCst);
        self.addresses.lock().unwrap().push(address.to_string());
        self.pause().await;

        match self.behavior {
            AccountBehavior::Lamports(lamports) => Ok(Some(AccountInfo {
                lamports,
                owner: "11111111111111111111111111111111".to_string(),
                executable: false,
                rent_epoch: 18_446_744_073_709_551_615,
                data_length: 165,
            })),
            AccountBehavior::Missing => Ok(None),
            AccountBehavior::Failing => Err(AgentError::Provider("rpc unreachable".to_string())),
        }
    }

    async fn get_balance(&self, address: &str) -> Result<u64, AgentError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        self.addresses.lock().unwrap().push(address.to_string());
        self.pause().await;

        match self.behavior {
            AccountBehavior::Lamports(lamports) => Ok(lamports),
            AccountBehavior::Missing => Ok(0),
            AccountBehavior::Failing => Err(AgentError::Provider("rpc unreachable".to_string())),
        }
    }
}

/// Mock transaction indexer.
#[derive(Clone)]
pub struct MockTransactions {
    reply: Result<Option<Vec<Value>>, String>,
    calls: Arc<AtomicUsize>,
}

impl MockTransactions {
    fn build(reply: Result<Option<Vec<Value>>, String>) -> Self {
        Self { reply, calls: Arc::new(AtomicUsize::new(0)) }
    }

    pub fn empty() -> Self {
        Self::build(Ok(Some(Vec::new())))
    }

    pub fn failing() -> Self {
        Self::build(Err("indexer unreachable".to_string()))
    }

    pub fn transfer(timestamp: i64) -> Self {
        Self::build(Ok(Some(vec![json!({
            "type": "TRANSFER",
            "timestamp": timestamp,
            "signature": SAMPLE_SIGNATURE,
            "fee": 5000,
            "nativeTransfers": [{
                "fromUserAccount": WALLET,
                "toUserAccount": "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM",
                "amount": 1_000_000_000u64
            }]
        })])))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransactionReader for MockTransactions {
    async fn parse_transactions(&self, _signatures: &[String]) -> Result<Option<Vec<Value>>, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map_err(AgentError::Provider)
    }
}
