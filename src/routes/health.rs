use axum::response::Json;
use serde_json::{json, Value};

/// Liveness probe.
///
/// # Route
/// - **Method**: GET
/// - **Path**: `/ping`
///
/// ```bash
/// curl http://localhost:3000/ping
/// # {"status":"pong","service":"wallet-chat-server","version":"0.1.0"}
/// ```
///
/// Does not touch the model or the blockchain providers, so it stays green
/// while credentials are missing.
pub async fn ping() -> Json<Value> {
    Json(json!({
        "status": "pong",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
