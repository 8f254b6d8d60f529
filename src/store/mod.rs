//! Word store: per-lemma JSON records under two fixed directories.
//!
//! ```text
//! <data>/words/<key>.json      {"<key>": { "en": …, "fr": …, "ru": {"cyr": …, "lat": …}, … }}
//! <data>/sentences/<key>.json  {"<key>": { "en": [ …3 sentences… ], … }}
//! ```
//!
//! The directories are the single source of truth.  [`WordStore`] only knows
//! how to find, read and write records; [`Word`] is the in-memory view.
//! Writes replace whole files with no locking (last write wins).

pub mod locale;
pub mod table;
pub mod word;
pub mod wordlist;

use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use serde_json::Value;
use thiserror::Error;

use crate::config::AppPaths;

pub use locale::{Locale, LocaleKind, UnsupportedLocale};
pub use table::{
    default_samples, default_translations, LocaleOverlay, LocaleTable, LocaleValue, Samples,
    Translations,
};
pub use word::{ResolveError, SentenceSelector, SpeechText, Word};
pub use wordlist::{load_word_list, parse_word_list, WordListStats};

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// Errors raised while reading or writing store records.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A record exists but cannot be used.
    #[error("malformed record {}: {reason}", path.display())]
    MalformedData { path: PathBuf, reason: String },

    /// The key cannot name a file inside the store.
    #[error("invalid word key {0:?}")]
    InvalidKey(String),
}

// ---------------------------------------------------------------------------
// RecordKind
// ---------------------------------------------------------------------------

/// Which of the two per-lemma records to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Translations,
    Sentences,
}

impl RecordKind {
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Translations => "translations",
            RecordKind::Sentences => "sentences",
        }
    }
}

// ---------------------------------------------------------------------------
// WordStore
// ---------------------------------------------------------------------------

/// Locates and reads/writes the per-lemma records.
///
/// Cheap to clone; holds paths only.
#[derive(Debug, Clone)]
pub struct WordStore {
    words_dir: PathBuf,
    sentences_dir: PathBuf,
}

impl WordStore {
    pub fn new(words_dir: impl Into<PathBuf>, sentences_dir: impl Into<PathBuf>) -> Self {
        Self {
            words_dir: words_dir.into(),
            sentences_dir: sentences_dir.into(),
        }
    }

    pub fn from_paths(paths: &AppPaths) -> Self {
        Self::new(&paths.words_dir, &paths.sentences_dir)
    }

    pub fn words_dir(&self) -> &Path {
        &self.words_dir
    }

    pub fn sentences_dir(&self) -> &Path {
        &self.sentences_dir
    }

    /// Path of a record, rejecting keys that would leave the store.
    pub fn record_path(&self, kind: RecordKind, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.record_path_unchecked(kind, key))
    }

    pub(crate) fn record_path_unchecked(&self, kind: RecordKind, key: &str) -> PathBuf {
        let dir = match kind {
            RecordKind::Translations => &self.words_dir,
            RecordKind::Sentences => &self.sentences_dir,
        };
        dir.join(format!("{key}.json"))
    }

    /// Read the `[key]` object of a record.
    ///
    /// `Ok(None)` when the file does not exist.
    pub fn read_record(&self, kind: RecordKind, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.record_path(kind, key)?;
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no {} record: {}", kind.label(), path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let doc: Value = serde_json::from_str(&text).map_err(|e| StoreError::MalformedData {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        match doc {
            Value::Object(mut obj) => match obj.remove(key) {
                Some(body) => Ok(Some(body)),
                None => Err(StoreError::MalformedData {
                    path,
                    reason: format!("missing top-level key {key:?}"),
                }),
            },
            _ => Err(StoreError::MalformedData {
                path,
                reason: "top level is not an object".into(),
            }),
        }
    }

    /// Write `{key: body}` as the record, creating directories as needed.
    pub fn write_record(
        &self,
        kind: RecordKind,
        key: &str,
        body: Value,
    ) -> Result<PathBuf, StoreError> {
        let path = self.record_path(kind, key)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut doc = serde_json::Map::new();
        doc.insert(key.to_string(), body);
        let text = serde_json::to_string_pretty(&Value::Object(doc))?;
        std::fs::write(&path, text)?;

        log::debug!("wrote {} record: {}", kind.label(), path.display());
        Ok(path)
    }

    /// Construct and load a [`Word`].
    pub fn load_word(&self, key: &str) -> Word {
        let mut word = Word::new(key);
        word.load(self);
        word
    }

    /// A readable translation record exists and its English field is filled
    /// in on disk.  Malformed records count as absent.
    pub fn word_exists(&self, key: &str) -> bool {
        match self.read_record(RecordKind::Translations, key) {
            Ok(Some(body)) => body
                .get("en")
                .and_then(Value::as_str)
                .is_some_and(|en| !en.is_empty()),
            Ok(None) => false,
            Err(e) => {
                log::debug!("treating '{key}' as absent: {e}");
                false
            }
        }
    }

    /// The lemma has at least one example sentence on disk.
    pub fn sentences_exist(&self, key: &str) -> bool {
        if validate_key(key).is_err() {
            return false;
        }
        self.load_word(key).sample_count() > 0
    }

    /// Sorted keys of every translation record.  A missing directory yields
    /// an empty list.
    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = match std::fs::read_dir(&self.words_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut keys = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                match path.file_stem().and_then(|s| s.to_str()) {
                    Some(stem) if validate_key(stem).is_ok() => keys.push(stem.to_string()),
                    _ => log::debug!("ignoring {}", path.display()),
                }
            }
        }
        keys.sort();
        Ok(keys)
    }

    /// A uniformly chosen key, or `None` when the store is empty.
    pub fn random_key(&self) -> Result<Option<String>, StoreError> {
        let keys = self.keys()?;
        Ok(keys.choose(&mut rand::thread_rng()).cloned())
    }
}

/// Reject keys that cannot name a file inside the store directories.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    let bad = key.is_empty()
        || key.starts_with('.')
        || key.contains(|c: char| matches!(c, '/' | '\\' | '\0'));
    if bad {
        Err(StoreError::InvalidKey(key.to_string()))
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
