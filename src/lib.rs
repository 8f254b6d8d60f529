//! Language Ninja: a small vocabulary trainer.
//!
//! Per-lemma translation and example-sentence records live as JSON files
//! under `data/`.  They are generated offline through an LLM
//! ([`generator`]), served over HTTP ([`server`]), spoken through the OS
//! speech command ([`speech`]) and transcoded for the web ([`audio`]).

pub mod audio;
pub mod config;
pub mod generator;
pub mod llm;
pub mod server;
pub mod speech;
pub mod store;
