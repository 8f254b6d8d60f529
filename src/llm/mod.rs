//! LLM access for batch generation.
//!
//! This module provides:
//! * [`LlmClient`]: async trait implemented by all completion backends.
//! * [`ApiClient`]: OpenAI-compatible REST API client in JSON mode.
//! * [`Completion`]: decoded message content, or the raw text when it is
//!   not valid JSON.
//! * [`PromptBuilder`]: builds the word and sentence generation prompts.
//! * [`LlmError`]: error variants for LLM operations.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use language_ninja::config::AppConfig;
//! use language_ninja::llm::{ApiClient, LlmClient, PromptBuilder};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let client = ApiClient::from_config(&config.llm);
//!
//!     let prompt = PromptBuilder::words(&["cat".to_string()]);
//!     let completion = client.send_prompt(&prompt).await.unwrap();
//!     println!("{:?}", completion.result_items());
//! }
//! ```

pub mod client;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{ApiClient, Completion, LlmClient, LlmError};
pub use prompt::PromptBuilder;

// test-only re-export so generator tests can script replies.
#[cfg(test)]
pub use client::MockLlm;
