// # Routes Module
//
// HTTP route handlers, one submodule per API area. Handlers are registered
// in `server::create_router`.

/// Health check endpoint
pub mod health;

/// Wallet-aware chat endpoint
pub mod chat;

/// Standalone transaction lookup endpoint
pub mod transaction;
