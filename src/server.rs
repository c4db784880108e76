//! # Server Module
//!
//! HTTP server setup and route configuration for the wallet chat server.

use anyhow::{Context, Result};
use axum::{Router, http::HeaderValue, routing::{get, post}};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::agent::ai_client::GeminiClient;
use crate::agent::data_fetcher::{HeliusClient, SolanaRpcReader};
use crate::agent::{ChatAgent, ChatAgentConfig};
use crate::config::Config;
use crate::routes::{chat, health::ping, transaction};

/// Application state shared across all route handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub chat_agent: Arc<ChatAgent>,
}

/// Builds the chat agent with the Gemini, Solana RPC and Helius clients.
///
/// Missing credentials are not an error here; the routes check them per
/// request before any remote call is made.
pub fn build_chat_agent(config: &Config) -> Result<ChatAgent> {
    let providers = &config.providers;
    let timeout = config.chat.remote_call_timeout;

    let model = GeminiClient::new(providers.google_api_key.clone().unwrap_or_default(), timeout)
        .context("Failed to create Gemini client")?
        .with_api_url(providers.gemini_api_url.clone())
        .with_model(providers.gemini_model.clone());

    let accounts = SolanaRpcReader::new(providers.helius_rpc_url.clone().unwrap_or_default(), timeout);

    let transactions = HeliusClient::new(
        providers.helius_api_key.clone().unwrap_or_default(),
        providers.helius_api_url.clone(),
        timeout,
    )
    .context("Failed to create Helius client")?;

    Ok(ChatAgent::new(
        Arc::new(model),
        Arc::new(accounts),
        Arc::new(transactions),
        ChatAgentConfig {
            call_timeout: timeout,
            summary_max_sentences: config.chat.summary_max_sentences,
        },
    ))
}

/// `*` anywhere in the list allows every origin; a header-value list may not
/// contain it.
fn allowed_origins(origins: &[String]) -> AllowOrigin {
    if origins.iter().any(|origin| origin == "*") {
        return AllowOrigin::any();
    }

    let values: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin {}: {}", origin, e);
                None
            }
        })
        .collect();
    AllowOrigin::list(values)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origins(origins))
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::ORIGIN,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
}

/// Main app router
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_allowed_origins);

    Router::new()
        .route("/ping", get(ping))
        .route("/api/chat", post(chat::chat))
        .route("/api/transaction", get(transaction::get_transaction))
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state)
}

/// Starts the HTTP server and serves until the process is terminated.
pub async fn start(config: Config) -> Result<()> {
    if let Err(e) = config.require_credentials() {
        tracing::warn!("⚠️  {} - chat requests will fail until it is set", e);
    }

    let chat_agent = build_chat_agent(&config)?;
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState {
        config: Arc::new(config),
        chat_agent: Arc::new(chat_agent),
    };
    let app = create_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {} - port may already be in use", addr))?;

    tracing::info!("🚀 Wallet chat server listening on http://{}", addr);
    tracing::info!("🏥 Health check available at http://{}/ping", addr);
    tracing::info!("💬 Chat endpoint available at http://{}/api/chat", addr);
    tracing::info!("🔎 Transaction lookup available at http://{}/api/transaction", addr);

    axum::serve(listener, app)
        .await
        .context("Server terminated unexpectedly")
}
