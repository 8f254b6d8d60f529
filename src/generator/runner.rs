//! Batch generator: word list → prompt → LLM → entries → store.
//!
//! [`Generator`] works on one candidate word list at a time:
//!
//! ```text
//! generate_words / generate_sentences
//!   └─▶ filter_unprocessed              [Filtering]
//!         ├─ nothing left → 0           [Idle]
//!         ├─ simulate     → 0           [Simulated]
//!         └─ send prompt                [Requesting]
//!               └─▶ decode "result"     [Parsing]
//!                     └─▶ held entries  [Ready]
//! save_words / save_sentences
//!   └─▶ per entry: skip if present, else Word::save   [Saving → Idle]
//! ```
//!
//! Generation and saving are separate steps so a caller can inspect or drop
//! the held entries before anything touches disk.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::llm::{Completion, LlmClient, LlmError, PromptBuilder};
use crate::store::{LocaleTable, RecordKind, StoreError, Word, WordStore};

use super::state::BatchState;

// ---------------------------------------------------------------------------
// GeneratorError
// ---------------------------------------------------------------------------

/// Errors that abort one generation request.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to build prompt: {0}")]
    Prompt(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// GenerationMode
// ---------------------------------------------------------------------------

/// Which artifact a batch produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// Translation records.
    Words,
    /// Example-sentence records.
    Sentences,
}

impl GenerationMode {
    pub fn record_kind(self) -> RecordKind {
        match self {
            GenerationMode::Words => RecordKind::Translations,
            GenerationMode::Sentences => RecordKind::Sentences,
        }
    }

    /// The existence predicate for this mode.
    pub fn is_done(self, store: &WordStore, key: &str) -> bool {
        match self {
            GenerationMode::Words => store.word_exists(key),
            GenerationMode::Sentences => store.sentences_exist(key),
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationMode::Words => f.write_str("words"),
            GenerationMode::Sentences => f.write_str("sentences"),
        }
    }
}

impl FromStr for GenerationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "words" => Ok(GenerationMode::Words),
            "sentences" => Ok(GenerationMode::Sentences),
            other => Err(format!("unknown mode {other:?}: expected words or sentences")),
        }
    }
}

// ---------------------------------------------------------------------------
// GeneratedEntry / SaveSummary
// ---------------------------------------------------------------------------

/// One decoded `{lemma: table}` item of an LLM reply.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedEntry<T> {
    pub key: String,
    pub value: LocaleTable<T>,
}

/// Outcome of a save pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveSummary {
    pub saved: Vec<String>,
    /// Already present on disk; left untouched.
    pub skipped: Vec<String>,
    /// Key and error text of entries that could not be written.
    pub failed: Vec<(String, String)>,
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Drives bulk creation of store records for a candidate word list.
pub struct Generator {
    store: WordStore,
    llm: Arc<dyn LlmClient>,
    word_list: Vec<String>,
    state: BatchState,
    generated_words: Vec<GeneratedEntry<Option<String>>>,
    generated_sentences: Vec<GeneratedEntry<Vec<String>>>,
}

impl Generator {
    pub fn new(store: WordStore, llm: Arc<dyn LlmClient>, word_list: Vec<String>) -> Self {
        Self {
            store,
            llm,
            word_list,
            state: BatchState::Idle,
            generated_words: Vec::new(),
            generated_sentences: Vec::new(),
        }
    }

    /// Replace the candidate word list.
    pub fn set_word_list(&mut self, word_list: Vec<String>) {
        self.word_list = word_list;
    }

    pub fn word_list(&self) -> &[String] {
        &self.word_list
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Translation entries held since the last `generate_words`.
    pub fn generated_words(&self) -> &[GeneratedEntry<Option<String>>] {
        &self.generated_words
    }

    /// Sentence entries held since the last `generate_sentences`.
    pub fn generated_sentences(&self) -> &[GeneratedEntry<Vec<String>>] {
        &self.generated_sentences
    }

    // -----------------------------------------------------------------------
    // Filtering
    // -----------------------------------------------------------------------

    /// The lemmas of `word_list` whose `mode` artifact is not on disk yet,
    /// in input order.
    pub fn filter_unprocessed(&self, word_list: &[String], mode: GenerationMode) -> Vec<String> {
        word_list
            .iter()
            .filter(|key| !mode.is_done(&self.store, key))
            .cloned()
            .collect()
    }

    // -----------------------------------------------------------------------
    // Generation
    // -----------------------------------------------------------------------

    /// Request translations for every unprocessed lemma.
    ///
    /// Returns the number of entries now held.  With `simulate` set the
    /// prompt is built and logged but never sent, and `0` is returned.
    pub async fn generate_words(&mut self, simulate: bool) -> Result<usize, GeneratorError> {
        self.generated_words.clear();

        let Some(pending) = self.pending(GenerationMode::Words) else {
            return Ok(0);
        };
        let prompt = PromptBuilder::words(&pending);

        let Some(completion) = self.request(&prompt, &pending, simulate).await? else {
            return Ok(0);
        };
        self.generated_words = parse_entries(&completion);
        self.state = BatchState::Ready;
        Ok(self.generated_words.len())
    }

    /// Request example sentences for every lemma without any, sending the
    /// lemma's current translations as context.
    pub async fn generate_sentences(&mut self, simulate: bool) -> Result<usize, GeneratorError> {
        self.generated_sentences.clear();

        let Some(pending) = self.pending(GenerationMode::Sentences) else {
            return Ok(0);
        };
        let words: Vec<Word> = pending.iter().map(|k| self.store.load_word(k)).collect();
        let prompt = PromptBuilder::sentences(words.iter().map(|w| (w.key(), &w.translations)))?;

        let Some(completion) = self.request(&prompt, &pending, simulate).await? else {
            return Ok(0);
        };
        self.generated_sentences = parse_entries(&completion);
        self.state = BatchState::Ready;
        Ok(self.generated_sentences.len())
    }

    /// Filter the word list; `None` when nothing is left to do.
    fn pending(&mut self, mode: GenerationMode) -> Option<Vec<String>> {
        self.state = BatchState::Filtering;
        let pending = self.filter_unprocessed(&self.word_list, mode);
        if pending.is_empty() {
            log::info!("all {mode} already generated");
            self.state = BatchState::Idle;
            return None;
        }
        Some(pending)
    }

    /// Send `prompt` unless simulating; `None` for a dry run.
    async fn request(
        &mut self,
        prompt: &str,
        pending: &[String],
        simulate: bool,
    ) -> Result<Option<Completion>, GeneratorError> {
        log::debug!("prompt:\n{prompt}");

        if simulate {
            log::info!("simulation: not sending {}", pending.join(", "));
            self.state = BatchState::Simulated;
            return Ok(None);
        }

        log::info!("requesting: {}", pending.join(", "));
        self.state = BatchState::Requesting;
        let completion = match self.llm.send_prompt(prompt).await {
            Ok(c) => c,
            Err(e) => {
                self.state = BatchState::Error;
                return Err(e.into());
            }
        };

        self.state = BatchState::Parsing;
        Ok(Some(completion))
    }

    // -----------------------------------------------------------------------
    // Saving
    // -----------------------------------------------------------------------

    /// Persist held translation entries, skipping lemmas that already exist.
    pub fn save_words(&mut self) -> SaveSummary {
        let entries = std::mem::take(&mut self.generated_words);
        self.save_entries(entries, GenerationMode::Words, |word, value| {
            word.translations = value
        })
    }

    /// Persist held sentence entries, skipping lemmas that already have some.
    pub fn save_sentences(&mut self) -> SaveSummary {
        let entries = std::mem::take(&mut self.generated_sentences);
        self.save_entries(entries, GenerationMode::Sentences, |word, value| {
            word.samples = value
        })
    }

    fn save_entries<T>(
        &mut self,
        entries: Vec<GeneratedEntry<T>>,
        mode: GenerationMode,
        assign: impl Fn(&mut Word, LocaleTable<T>),
    ) -> SaveSummary {
        let mut summary = SaveSummary::default();
        if entries.is_empty() {
            log::debug!("no {mode} entries to save");
            return summary;
        }

        self.state = BatchState::Saving;
        for entry in entries {
            if mode.is_done(&self.store, &entry.key) {
                log::warn!("{mode} for '{}' already exist, skipping", entry.key);
                summary.skipped.push(entry.key);
                continue;
            }

            let mut word = Word::new(entry.key.clone());
            assign(&mut word, entry.value);
            match word.save(&self.store, mode.record_kind()) {
                Ok(path) => {
                    log::info!("saved {mode} for '{}' ({})", entry.key, path.display());
                    summary.saved.push(entry.key);
                }
                Err(e) => {
                    log::warn!("could not save {mode} for '{}': {e}", entry.key);
                    summary.failed.push((entry.key, e.to_string()));
                }
            }
        }
        self.state = BatchState::Idle;
        summary
    }
}

// ---------------------------------------------------------------------------
// Reply decoding
// ---------------------------------------------------------------------------

/// Decode the `result` items of a completion.
///
/// Items that are not single-key objects with a well-shaped table are
/// logged and dropped; a reply without a `result` array yields nothing.
fn parse_entries<T>(completion: &Completion) -> Vec<GeneratedEntry<T>>
where
    T: DeserializeOwned + Default,
{
    let Some(items) = completion.result_items() else {
        match completion {
            Completion::Raw(text) => log::warn!("LLM reply is not JSON: {text}"),
            Completion::Json(value) => match completion.error_message() {
                Some(msg) => log::warn!("LLM reported an error: {msg}"),
                None => log::warn!("LLM reply has no result list: {value}"),
            },
        }
        return Vec::new();
    };

    items.iter().filter_map(parse_item).collect()
}

fn parse_item<T>(item: &Value) -> Option<GeneratedEntry<T>>
where
    T: DeserializeOwned + Default,
{
    let Some((key, body)) = item.as_object().and_then(|obj| obj.iter().next()) else {
        log::warn!("skipping result item that is not a {{lemma: ...}} object: {item}");
        return None;
    };
    match serde_json::from_value::<LocaleTable<T>>(body.clone()) {
        Ok(value) => Some(GeneratedEntry {
            key: key.clone(),
            value,
        }),
        Err(e) => {
            log::warn!("skipping malformed entry for '{key}': {e}");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
