use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::agent::ai_client::ModelClient;
use crate::agent::data_fetcher::{AccountReader, DataFetcher, TransactionReader};
use crate::agent::markers;
use crate::agent::persona::system_persona;
use crate::agent::summarizer::{Summarizer, DEFAULT_MAX_SENTENCES};
use crate::agent::types::{
    AgentError, BlockchainData, ChatResponse, ChatTurn, TransactionData, TransactionRecord,
};

#[derive(Debug, Clone)]
pub struct ChatAgentConfig {
    /// Upper bound for every remote call made during a turn.
    pub call_timeout: Duration,
    pub summary_max_sentences: u8,
}

impl Default for ChatAgentConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(30),
            summary_max_sentences: DEFAULT_MAX_SENTENCES,
        }
    }
}

/// Runs one chat turn: model call, marker parsing, blockchain lookups and
/// transaction summaries. Holds no per-request state, so one instance serves
/// concurrent requests.
pub struct ChatAgent {
    model: Arc<dyn ModelClient>,
    data_fetcher: DataFetcher,
    summarizer: Summarizer,
    config: ChatAgentConfig,
}

impl ChatAgent {
    pub fn new(
        model: Arc<dyn ModelClient>,
        accounts: Arc<dyn AccountReader>,
        transactions: Arc<dyn TransactionReader>,
        config: ChatAgentConfig,
    ) -> Self {
        let data_fetcher = DataFetcher::new(accounts, transactions, config.call_timeout);
        let summarizer = Summarizer::new(Arc::clone(&model), config.call_timeout)
            .with_max_sentences(config.summary_max_sentences);

        Self { model, data_fetcher, summarizer, config }
    }

    pub fn data_fetcher(&self) -> &DataFetcher {
        &self.data_fetcher
    }

    pub fn summarizer(&self) -> &Summarizer {
        &self.summarizer
    }

    /// Answers `user_message` for the wallet at `wallet_address`.
    ///
    /// Only a missing input or a failed model call is an error. Blockchain
    /// lookups that fail are left out of `blockchain_data`, and a failed
    /// summary is replaced by the fallback sentence.
    pub async fn handle_turn(
        &self,
        user_message: &str,
        wallet_address: &str,
    ) -> Result<ChatResponse, AgentError> {
        if user_message.is_empty() {
            return Err(AgentError::InvalidRequest("message"));
        }
        if wallet_address.is_empty() {
            return Err(AgentError::InvalidRequest("wallet address"));
        }

        let request_id = Uuid::new_v4();
        info!("[{}] Processing chat turn for wallet {}", request_id, wallet_address);
        debug!("[{}] User message: {}", request_id, user_message);

        let history: Vec<ChatTurn> = Vec::new();
        let persona = system_persona(wallet_address);
        let reply = tokio::time::timeout(
            self.config.call_timeout,
            self.model.send_chat(&persona, &history, user_message),
        )
        .await
        .map_err(|_| AgentError::Timeout(self.config.call_timeout))
        .and_then(|result| result)
        .map_err(|e| {
            error!("[{}] Model call failed: {}", request_id, e);
            e
        })?;

        debug!("[{}] Model reply ({} chars): {}", request_id, reply.len(), reply);

        let parsed = markers::parse(&reply, wallet_address);
        for marker in &parsed.markers {
            info!("[{}] Detected marker {:?}", request_id, marker);
        }

        let account_task = async {
            match parsed.account_address() {
                Some(address) => self.data_fetcher.fetch_account_snapshot(address).await,
                None => None,
            }
        };
        let balance_task = async {
            match parsed.balance_address() {
                Some(address) => self.data_fetcher.fetch_token_balance(address).await,
                None => None,
            }
        };
        let transaction_task = async {
            match parsed.transaction_signature() {
                Some(signature) => self.fetch_summarized_transaction(signature).await,
                None => None,
            }
        };

        let (account_info, balance, transaction) =
            futures::future::join3(account_task, balance_task, transaction_task).await;

        let blockchain_data = BlockchainData {
            account_info,
            balance: balance.map(|b| b.sol),
            transaction: transaction.and_then(TransactionData::from_record),
        };

        info!(
            "[{}] Turn complete: enriched={} account={} balance={} transaction={}",
            request_id,
            !blockchain_data.is_empty(),
            blockchain_data.account_info.is_some(),
            blockchain_data.balance.is_some(),
            blockchain_data.transaction.is_some()
        );

        Ok(ChatResponse {
            response: parsed.cleaned_text,
            blockchain_data,
        })
    }

    async fn fetch_summarized_transaction(&self, signature: &str) -> Option<TransactionRecord> {
        let record = self.data_fetcher.fetch_transaction(signature).await?;
        Some(self.summarizer.summarize_record(record).await)
    }
}
