use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::agent::types::{
    AccountInfo, AccountSnapshot, AgentError, TokenBalance, TransactionRecord,
};

const SIGNATURE_LEN: usize = 64;

/// Reads native account state from a Solana RPC node.
#[async_trait]
pub trait AccountReader: Send + Sync {
    /// `Ok(None)` when the account does not exist.
    async fn get_account_info(&self, address: &str) -> Result<Option<AccountInfo>, AgentError>;

    /// Native balance in lamports.
    async fn get_balance(&self, address: &str) -> Result<u64, AgentError>;
}

/// Reads parsed transactions from an indexing service.
#[async_trait]
pub trait TransactionReader: Send + Sync {
    /// One entry per signature the service has parsed. `Ok(None)` when the
    /// service returned nothing at all.
    async fn parse_transactions(&self, signatures: &[String]) -> Result<Option<Vec<Value>>, AgentError>;
}

pub struct SolanaRpcReader {
    rpc_client: RpcClient,
}

impl SolanaRpcReader {
    pub fn new(rpc_url: String, timeout: Duration) -> Self {
        Self {
            rpc_client: RpcClient::new_with_timeout(rpc_url, timeout),
        }
    }

    fn parse_pubkey(address: &str) -> Result<Pubkey, AgentError> {
        Pubkey::from_str(address).map_err(|e| AgentError::InvalidAddress(format!("{}: {}", address, e)))
    }
}

#[async_trait]
impl AccountReader for SolanaRpcReader {
    async fn get_account_info(&self, address: &str) -> Result<Option<AccountInfo>, AgentError> {
        let pubkey = Self::parse_pubkey(address)?;

        let response = self.rpc_client
            .get_account_with_commitment(&pubkey, CommitmentConfig::confirmed())
            .await
            .map_err(|e| AgentError::Provider(e.to_string()))?;

        Ok(response.value.map(|account| AccountInfo {
            lamports: account.lamports,
            owner: account.owner.to_string(),
            executable: account.executable,
            rent_epoch: account.rent_epoch,
            data_length: account.data.len(),
        }))
    }

    async fn get_balance(&self, address: &str) -> Result<u64, AgentError> {
        let pubkey = Self::parse_pubkey(address)?;

        self.rpc_client
            .get_balance(&pubkey)
            .await
            .map_err(|e| AgentError::Provider(e.to_string()))
    }
}

/// Helius enhanced-transactions API client.
pub struct HeliusClient {
    client: Client,
    api_key: String,
    api_url: String,
}

impl HeliusClient {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> Result<Self, AgentError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TransactionReader for HeliusClient {
    async fn parse_transactions(&self, signatures: &[String]) -> Result<Option<Vec<Value>>, AgentError> {
        let url = format!("{}/transactions", self.api_url);

        let response = self.client
            .post(&url)
            .query(&[("api-key", self.api_key.as_str())])
            .json(&json!({ "transactions": signatures }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AgentError::Provider(format!(
                "Helius API error {}: {}",
                status, error_text
            )));
        }

        let json: Value = response.json().await?;
        match json {
            Value::Null => Ok(None),
            Value::Array(items) => Ok(Some(items)),
            other => Err(AgentError::Provider(format!(
                "Unexpected Helius response: {}",
                other
            ))),
        }
    }
}

/// Checks that `signature` is base58 and decodes to a 64-byte signature.
pub fn validate_signature(signature: &str) -> Result<(), AgentError> {
    match bs58::decode(signature).into_vec() {
        Ok(bytes) if bytes.len() == SIGNATURE_LEN => Ok(()),
        _ => Err(AgentError::InvalidSignature(signature.to_string())),
    }
}

/// Blockchain lookups for the chat agent. The `fetch_*` operations never
/// fail: any error is logged and reported as `None`.
#[derive(Clone)]
pub struct DataFetcher {
    accounts: Arc<dyn AccountReader>,
    transactions: Arc<dyn TransactionReader>,
    call_timeout: Duration,
}

impl DataFetcher {
    pub fn new(
        accounts: Arc<dyn AccountReader>,
        transactions: Arc<dyn TransactionReader>,
        call_timeout: Duration,
    ) -> Self {
        Self { accounts, transactions, call_timeout }
    }

    pub async fn fetch_account_snapshot(&self, address: &str) -> Option<AccountSnapshot> {
        match self.bounded(self.accounts.get_account_info(address)).await {
            Ok(Some(info)) => {
                debug!("Account {} holds {} lamports", address, info.lamports);
                Some(AccountSnapshot::from(info))
            }
            Ok(None) => {
                info!("Account {} not found", address);
                None
            }
            Err(e) => {
                warn!("Failed to fetch account info for {}: {}", address, e);
                None
            }
        }
    }

    /// Native SOL balance of `address`, not an SPL token account.
    pub async fn fetch_token_balance(&self, address: &str) -> Option<TokenBalance> {
        match self.bounded(self.accounts.get_balance(address)).await {
            Ok(lamports) => {
                debug!("Balance for {}: {} lamports", address, lamports);
                Some(TokenBalance::from_lamports(lamports))
            }
            Err(e) => {
                warn!("Failed to fetch balance for {}: {}", address, e);
                None
            }
        }
    }

    /// Unsummarized record for `signature`; not-found and provider errors both yield `None`.
    pub async fn fetch_transaction(&self, signature: &str) -> Option<TransactionRecord> {
        match self.lookup_transaction(signature).await {
            Ok(Some(record)) => Some(record),
            Ok(None) => {
                info!("Transaction {} not found or not yet parsed", signature);
                None
            }
            Err(e) => {
                warn!("Failed to fetch transaction {}: {}", signature, e);
                None
            }
        }
    }

    /// Like [`fetch_transaction`](Self::fetch_transaction) but keeps "not
    /// found" (`Ok(None)`) apart from provider failures.
    pub async fn lookup_transaction(&self, signature: &str) -> Result<Option<TransactionRecord>, AgentError> {
        validate_signature(signature)?;

        let signatures = [signature.to_string()];
        let parsed = self.bounded(self.transactions.parse_transactions(&signatures)).await?;

        Ok(parsed
            .and_then(|items| items.into_iter().next())
            .filter(|raw| !raw.is_null())
            .map(|raw| TransactionRecord::from_parsed(signature, raw)))
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, AgentError>>,
    ) -> Result<T, AgentError> {
        tokio::time::timeout(self.call_timeout, call)
            .await
            .map_err(|_| AgentError::Timeout(self.call_timeout))?
    }
}
