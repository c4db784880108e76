//! Configuration module for environment variables and application settings

use std::env;
use std::time::Duration;
use anyhow::{Result, anyhow};

use crate::agent::AgentError;
use crate::agent::summarizer::DEFAULT_MAX_SENTENCES;

pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
pub const HELIUS_RPC_URL: &str = "HELIUS_RPC_URL";
pub const HELIUS_API_KEY: &str = "HELIUS_API_KEY";

#[derive(Debug, Clone)]
pub struct Config {
    /// Credentials and endpoints of the remote collaborators
    pub providers: ProviderConfig,

    /// Chat turn tuning
    pub chat: ChatConfig,

    /// Server configuration
    pub server: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Gemini API key
    pub google_api_key: Option<String>,
    /// Solana JSON-RPC endpoint
    pub helius_rpc_url: Option<String>,
    /// Helius enhanced-transactions API key
    pub helius_api_key: Option<String>,
    pub gemini_api_url: String,
    pub gemini_model: String,
    pub helius_api_url: String,
}

#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Timeout applied to each model, RPC and indexer call
    pub remote_call_timeout: Duration,
    /// Sentence bound given to the transaction summarizer
    pub summary_max_sentences: u8,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .or_else(|_| env::var("SERVER_PORT"))
            .unwrap_or_else(|_| "3000".to_string());

        Ok(Self {
            providers: ProviderConfig {
                google_api_key: non_empty_var(GOOGLE_API_KEY),
                helius_rpc_url: non_empty_var(HELIUS_RPC_URL),
                helius_api_key: non_empty_var(HELIUS_API_KEY),
                gemini_api_url: env::var("GEMINI_API_URL")
                    .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string()),
                gemini_model: env::var("GEMINI_MODEL")
                    .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
                helius_api_url: env::var("HELIUS_API_URL")
                    .unwrap_or_else(|_| "https://api.helius.xyz/v0".to_string()),
            },

            chat: ChatConfig {
                remote_call_timeout: Duration::from_secs(
                    env::var("REMOTE_CALL_TIMEOUT_SECS")
                        .unwrap_or_else(|_| "30".to_string())
                        .parse()
                        .unwrap_or(30),
                ),
                summary_max_sentences: env::var("SUMMARY_MAX_SENTENCES")
                    .unwrap_or_else(|_| DEFAULT_MAX_SENTENCES.to_string())
                    .parse()
                    .unwrap_or(DEFAULT_MAX_SENTENCES),
            },

            server: ServerConfig {
                host: env::var("SERVER_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: port
                    .parse()
                    .map_err(|e| anyhow!("Invalid port {}: {}", port, e))?,
                cors_allowed_origins: parse_origins(
                    &env::var("CORS_ALLOWED_ORIGINS")
                        .unwrap_or_else(|_| "http://localhost:3000".to_string()),
                ),
            },
        })
    }

    /// Checks the credentials in a fixed order and names the first one missing.
    pub fn require_credentials(&self) -> Result<(), AgentError> {
        let p = &self.providers;
        let checks = [
            (GOOGLE_API_KEY, &p.google_api_key),
            (HELIUS_RPC_URL, &p.helius_rpc_url),
            (HELIUS_API_KEY, &p.helius_api_key),
        ];
        match checks.into_iter().find(|(_, value)| value.is_none()) {
            Some((name, _)) => Err(AgentError::MissingSetting(name)),
            None => Ok(()),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        providers: ProviderConfig {
            google_api_key: Some("google-key".to_string()),
            helius_rpc_url: Some("http://127.0.0.1:8899".to_string()),
            helius_api_key: Some("helius-key".to_string()),
            gemini_api_url: "http://127.0.0.1:9".to_string(),
            gemini_model: "gemini-2.0-flash".to_string(),
            helius_api_url: "http://127.0.0.1:9".to_string(),
        },
        chat: ChatConfig {
            remote_call_timeout: Duration::from_secs(5),
            summary_max_sentences: DEFAULT_MAX_SENTENCES,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
        },
    }
}
