pub mod types;
pub mod persona;
pub mod markers;
pub mod ai_client;
pub mod data_fetcher;
pub mod summarizer;
pub mod chat_agent;

#[cfg(test)]
pub(crate) mod test_support;

pub use chat_agent::{ChatAgent, ChatAgentConfig};
pub use types::*;
