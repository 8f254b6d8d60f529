//! Offline batch generation of word store records.
//!
//! This module provides:
//! * [`Generator`]: filter → prompt → LLM → parse → save for one word list.
//! * [`BatchState`]: where a generator is within one run.
//! * [`run_batches`]: chunked driver over a whole candidate list.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use language_ninja::config::AppConfig;
//! use language_ninja::generator::{run_batches, BatchOptions};
//! use language_ninja::llm::ApiClient;
//! use language_ninja::store::WordStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let store = WordStore::from_paths(&config.paths());
//!     let llm = Arc::new(ApiClient::from_config(&config.llm));
//!
//!     let words = vec!["cat".to_string(), "dog".to_string()];
//!     let report = run_batches(store, llm, &words, &BatchOptions::default()).await;
//!     println!("saved {}", report.saved);
//! }
//! ```

pub mod batch;
pub mod runner;
pub mod state;

pub use batch::{run_batches, BatchOptions, BatchReport};
pub use runner::{GeneratedEntry, GenerationMode, Generator, GeneratorError, SaveSummary};
pub use state::BatchState;
