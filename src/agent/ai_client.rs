use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::agent::persona::PERSONA_ACKNOWLEDGEMENT;
use crate::agent::types::{AgentError, ChatRole, ChatTurn};

/// Language-model collaborator used for the chat turn and for summaries.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Sends `message` after the persona and any prior `history` and returns the reply text.
    async fn send_chat(
        &self,
        system_persona: &str,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<String, AgentError>;

    /// Answers a single standalone prompt.
    async fn summarize_transaction(&self, prompt: &str) -> Result<String, AgentError>;
}

/// Gemini `generateContent` client.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, AgentError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            api_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
        })
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn with_api_url(mut self, api_url: String) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    /// The persona goes in as a primed user turn answered by the model, then
    /// the prior turns, then the new message.
    fn chat_contents(system_persona: &str, history: &[ChatTurn], message: &str) -> Vec<Value> {
        let mut contents = Vec::with_capacity(history.len() + 3);
        contents.push(content("user", system_persona));
        contents.push(content("model", PERSONA_ACKNOWLEDGEMENT));
        for turn in history {
            let role = match turn.role {
                ChatRole::User => "user",
                ChatRole::Assistant => "model",
            };
            contents.push(content(role, &turn.text));
        }
        contents.push(content("user", message));
        contents
    }

    async fn generate_content(&self, contents: Vec<Value>) -> Result<String, AgentError> {
        let url = format!("{}/models/{}:generateContent", self.api_url, self.model);
        let payload = json!({ "contents": contents });

        let response = self.client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AgentError::ModelApi(format!(
                "Gemini API error {}: {}",
                status, error_text
            )));
        }

        let json: Value = response.json().await?;
        let text = extract_text(&json)
            .ok_or_else(|| AgentError::ModelApi("No content in Gemini response".to_string()))?;

        debug!("Gemini returned {} characters", text.len());
        Ok(text)
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn send_chat(
        &self,
        system_persona: &str,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<String, AgentError> {
        self.generate_content(Self::chat_contents(system_persona, history, message)).await
    }

    async fn summarize_transaction(&self, prompt: &str) -> Result<String, AgentError> {
        self.generate_content(vec![content("user", prompt)]).await
    }
}

fn content(role: &str, text: &str) -> Value {
    json!({ "role": role, "parts": [{ "text": text }] })
}

/// Concatenates the text parts of the first candidate.
fn extract_text(response: &Value) -> Option<String> {
    let parts = response["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect();
    if text.is_empty() { None } else { Some(text) }
}
