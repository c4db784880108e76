use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::{error, info, warn};

use crate::agent::AgentError;
use crate::config::HELIUS_API_KEY;
use crate::server::AppState;
use crate::state_structs::{ErrorResponse, TransactionQuery, TransactionSummaryResponse};

/// Look up a single transaction by signature
///
/// # Route
/// - **Method**: GET
/// - **Path**: `/api/transaction?signature=<sig>&summary=true`
///
/// Returns the indexer's parsed transaction as-is, or with `summary=true`
/// a `{ summary, signature, timestamp, type }` object.
///
/// # HTTP Status Codes
/// - **400**: no signature given
/// - **404**: the indexer has not parsed this signature
/// - **500**: missing API key or indexer failure
pub async fn get_transaction(
    State(state): State<AppState>,
    Query(query): Query<TransactionQuery>,
) -> Response {
    let signature = match query.signature.as_deref().map(str::trim) {
        Some(sig) if !sig.is_empty() => sig.to_string(),
        _ => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new("Signature is required")))
                .into_response();
        }
    };
    info!("Looking up transaction {}", signature);

    if state.config.providers.helius_api_key.is_none() {
        error!("{} is not configured", HELIUS_API_KEY);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("API key not configured")),
        )
            .into_response();
    }

    let record = match state.chat_agent.data_fetcher().lookup_transaction(&signature).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("Transaction not found or not yet parsed")),
            )
                .into_response();
        }
        Err(e @ AgentError::InvalidSignature(_)) => {
            warn!("Rejected transaction lookup: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Invalid transaction signature").with_details(e.to_string())),
            )
                .into_response();
        }
        Err(e) => {
            error!("Error fetching transaction details: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(
                    ErrorResponse::new("Internal server error fetching transaction details")
                        .with_details(e.to_string()),
                ),
            )
                .into_response();
        }
    };

    if !query.wants_summary() {
        return Json(record.raw_details).into_response();
    }

    let summary = state.chat_agent.summarizer().summarize(&record).await;
    Json(TransactionSummaryResponse {
        summary,
        signature: record.signature,
        timestamp: record.unix_timestamp,
        transaction_type: record.transaction_type,
    })
    .into_response()
}
