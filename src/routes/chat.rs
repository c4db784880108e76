use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::Json as ResponseJson,
};
use tracing::error;

use crate::agent::ChatResponse;
use crate::server::AppState;
use crate::state_structs::{ChatRequest, ErrorResponse};

/// Answer one chat message for a connected wallet
///
/// # Route
/// - **Method**: POST
/// - **Path**: `/api/chat`
/// - **Body**: `{ "message": "...", "walletAddress": "..." }`
///
/// # Response Format
/// ```json
/// { "response": "...", "blockchainData": { "balance": 1.0 } }
/// ```
///
/// Missing credentials, an unreadable body, missing fields and a failed model
/// call all answer `500` with
/// `{ "error": "Failed to process chat request", "details": ... }`.
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<ResponseJson<ChatResponse>, (StatusCode, ResponseJson<ErrorResponse>)> {
    let failure = |details: String| {
        error!("Error in chat route: {}", details);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ResponseJson(ErrorResponse::new("Failed to process chat request").with_details(details)),
        )
    };

    state.config.require_credentials().map_err(|e| failure(e.to_string()))?;
    let Json(request) = body.map_err(|rejection| failure(rejection.body_text()))?;

    let message = request.message.unwrap_or_default();
    let wallet_address = request.wallet_address.unwrap_or_default();

    let response = state
        .chat_agent
        .handle_turn(&message, &wallet_address)
        .await
        .map_err(|e| failure(e.to_string()))?;

    Ok(ResponseJson(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::test_support::{MockAccounts, MockModel, MockTransactions, WALLET};
    use crate::routes::tests::{read_json, test_app};
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn chat_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn balance_question_returns_enriched_payload() {
        let model = MockModel::replying(&format!("Here it is!\nTOKEN_BALANCE: Address: {WALLET}"));
        let app = test_app(
            crate::config::test_config(),
            model,
            MockAccounts::with_lamports(1_000_000_000),
            MockTransactions::empty(),
        );

        let response = app
            .oneshot(chat_request(json!({ "message": "what's my balance?", "walletAddress": WALLET })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            read_json(response).await,
            json!({ "response": "Here it is!", "blockchainData": { "balance": 1.0 } })
        );
    }

    #[tokio::test]
    async fn missing_wallet_is_an_error_without_remote_calls() {
        let model = MockModel::replying("ACCOUNT_INFO");
        let accounts = MockAccounts::with_lamports(1);
        let transactions = MockTransactions::empty();
        let app = test_app(
            crate::config::test_config(),
            model.clone(),
            accounts.clone(),
            transactions.clone(),
        );

        let response = app
            .oneshot(chat_request(json!({ "message": "balance?" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            read_json(response).await,
            json!({
                "error": "Failed to process chat request",
                "details": "No wallet address provided in request"
            })
        );
        assert_eq!(model.chat_calls(), 0);
        assert_eq!(accounts.account_calls() + accounts.balance_calls(), 0);
        assert_eq!(transactions.calls(), 0);
    }

    #[tokio::test]
    async fn missing_credential_fails_before_model_call() {
        let mut config = crate::config::test_config();
        config.providers.google_api_key = None;
        let model = MockModel::replying("hello");
        let app = test_app(config, model.clone(), MockAccounts::missing(), MockTransactions::empty());

        let response = app
            .oneshot(chat_request(json!({ "message": "hi", "walletAddress": WALLET })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = read_json(response).await;
        assert_eq!(body["details"], "GOOGLE_API_KEY is not set in environment variables");
        assert_eq!(model.chat_calls(), 0);
    }

    #[tokio::test]
    async fn unreadable_body_uses_failure_shape() {
        let model = MockModel::replying("hello");
        let app = test_app(
            crate::config::test_config(),
            model.clone(),
            MockAccounts::missing(),
            MockTransactions::empty(),
        );

        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = read_json(response).await;
        assert_eq!(body["error"], "Failed to process chat request");
        assert!(body["details"].as_str().is_some_and(|d| !d.is_empty()));
        assert_eq!(model.chat_calls(), 0);
    }

    #[tokio::test]
    async fn missing_content_type_uses_failure_shape() {
        let app = test_app(
            crate::config::test_config(),
            MockModel::replying("hello"),
            MockAccounts::missing(),
            MockTransactions::empty(),
        );

        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .body(Body::from(json!({ "message": "hi", "walletAddress": WALLET }).to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(read_json(response).await["error"], "Failed to process chat request");
    }

    #[tokio::test]
    async fn mistyped_field_uses_failure_shape() {
        let app = test_app(
            crate::config::test_config(),
            MockModel::replying("hello"),
            MockAccounts::missing(),
            MockTransactions::empty(),
        );

        let response = app
            .oneshot(chat_request(json!({ "message": 5, "walletAddress": WALLET })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(read_json(response).await["error"], "Failed to process chat request");
    }

    #[tokio::test]
    async fn credentials_are_checked_before_the_body() {
        let mut config = crate::config::test_config();
        config.providers.helius_rpc_url = None;
        let app = test_app(config, MockModel::replying("hello"), MockAccounts::missing(), MockTransactions::empty());

        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            read_json(response).await["details"],
            "HELIUS_RPC_URL is not set in environment variables"
        );
    }

    #[tokio::test]
    async fn model_failure_reports_underlying_error() {
        let app = test_app(
            crate::config::test_config(),
            MockModel::failing_chat("upstream 503"),
            MockAccounts::missing(),
            MockTransactions::empty(),
        );

        let response = app
            .oneshot(chat_request(json!({ "message": "hi", "walletAddress": WALLET })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = read_json(response).await;
        assert_eq!(body["error"], "Failed to process chat request");
        assert_eq!(body["details"], "Model API error: upstream 503");
    }
}
