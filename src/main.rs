//! # Wallet Chat Server
//!
//! HTTP API that answers natural-language questions about a connected Solana
//! wallet. Each chat turn asks Gemini for a reply, looks for data markers in
//! that reply, resolves them against Solana RPC and the Helius transaction
//! API, and returns the cleaned text together with the fetched data.
//!
//! ## Architecture
//! - `server`: router, shared state and startup
//! - `config`: environment variable configuration
//! - `agent`: the chat agent and its model / blockchain collaborators
//! - `routes`: HTTP handlers
//!   - `health`: `GET /ping`
//!   - `chat`: `POST /api/chat`
//!   - `transaction`: `GET /api/transaction`
//!
//! ## Environment Setup
//! `GOOGLE_API_KEY`, `HELIUS_RPC_URL` and `HELIUS_API_KEY` are required for
//! chat requests. They can be placed in a `.env` file.
//!
//! ## Running the Server
//! ```bash
//! cargo run
//! curl http://localhost:3000/ping
//! ```

mod agent;
mod config;
mod routes;
mod server;
mod state_structs;

use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt, EnvFilter };

#[tokio::main]
async fn main() {
    // A missing .env file is fine; the process environment is used as-is
    dotenv::dotenv().ok();

    tracing_subscriber
        ::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt
                ::layer()
                .with_target(false)
                .compact()
        )
        .init();

    tracing::info!("🏁 Starting wallet chat server...");
    tracing::info!("📦 Package: {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server::start(config).await {
        tracing::error!("Server error: {:#}", e);
        std::process::exit(1);
    }
}
