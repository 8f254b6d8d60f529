//! The [`Word`] entity: an in-memory projection of one lemma's records.
//!
//! A `Word` is built per request (or per batch item), filled from disk with
//! [`Word::load`] and thrown away.  Nothing is cached between loads.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use rand::Rng;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use super::locale::{Locale, UnsupportedLocale};
use super::table::{
    default_samples, default_translations, LocaleOverlay, LocaleValue, Samples, Translations,
};
use super::{RecordKind, StoreError, WordStore};

// ---------------------------------------------------------------------------
// SentenceSelector
// ---------------------------------------------------------------------------

/// Which text of a word to speak.
///
/// Wire form: `null` (canonical translation), an integer sentence index, or
/// the literal `"random"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SentenceSelector {
    /// The single canonical translation.
    #[default]
    Canonical,
    /// Position in the example-sentence sequence.
    Index(usize),
    /// A uniformly chosen example sentence, or the canonical translation
    /// when there are none.
    Random,
}

impl FromStr for SentenceSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(SentenceSelector::Random),
            _ => s
                .parse::<usize>()
                .map(SentenceSelector::Index)
                .map_err(|_| format!("invalid sentence selector {s:?}: expected an index or \"random\"")),
        }
    }
}

impl fmt::Display for SentenceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentenceSelector::Canonical => f.write_str("canonical"),
            SentenceSelector::Index(i) => write!(f, "{i}"),
            SentenceSelector::Random => f.write_str("random"),
        }
    }
}

impl Serialize for SentenceSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SentenceSelector::Canonical => serializer.serialize_none(),
            SentenceSelector::Index(i) => serializer.serialize_u64(*i as u64),
            SentenceSelector::Random => serializer.serialize_str("random"),
        }
    }
}

impl<'de> Deserialize<'de> for SentenceSelector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Index(u64),
            Token(String),
        }

        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(SentenceSelector::Canonical),
            Some(Raw::Index(i)) => Ok(SentenceSelector::Index(i as usize)),
            Some(Raw::Token(s)) => s.parse().map_err(D::Error::custom),
        }
    }
}

// ---------------------------------------------------------------------------
// Speech text resolution
// ---------------------------------------------------------------------------

/// Why no text could be resolved for a word.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error(transparent)]
    UnsupportedLocale(#[from] UnsupportedLocale),

    #[error("sentence index {index} out of range for '{key}' in {locale} ({available} available)")]
    SelectorOutOfRange {
        key: String,
        locale: Locale,
        index: usize,
        available: usize,
    },

    #[error("'{key}' has no {locale} text to speak")]
    NothingToSay { key: String, locale: Locale },
}

/// The resolved text for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechText {
    pub locale: Locale,
    /// What the synthesizer reads out.
    pub speak: String,
    /// Transliteration shown alongside dual-script speech.
    pub display: Option<String>,
}

impl SpeechText {
    /// The line to show a user: the display form when present.
    pub fn display_line(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.speak)
    }
}

// ---------------------------------------------------------------------------
// Word
// ---------------------------------------------------------------------------

/// One lemma with its translations and example sentences.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Word {
    key: String,
    pub translations: Translations,
    pub samples: Samples,
}

impl Word {
    /// A word holding only defaults: `en` is `key`, everything else empty.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            translations: default_translations(&key),
            samples: default_samples(),
            key,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Overlay both on-disk records onto the current values.
    ///
    /// Never fails: a missing record leaves defaults in place, a malformed
    /// one is logged and skipped.
    pub fn load(&mut self, store: &WordStore) {
        match read_overlay::<Option<String>>(store, RecordKind::Translations, &self.key) {
            Ok(Some(overlay)) => self.translations.overlay(overlay),
            Ok(None) => {}
            Err(e) => log::warn!("word '{}': {e}", self.key),
        }
        match read_overlay::<Vec<String>>(store, RecordKind::Sentences, &self.key) {
            Ok(Some(overlay)) => self.samples.overlay(overlay),
            Ok(None) => {}
            Err(e) => log::warn!("word '{}': {e}", self.key),
        }
    }

    /// Write one record to disk, replacing any existing file.
    pub fn save(&self, store: &WordStore, kind: RecordKind) -> Result<PathBuf, StoreError> {
        let body = match kind {
            RecordKind::Translations => serde_json::to_value(&self.translations)?,
            RecordKind::Sentences => serde_json::to_value(&self.samples)?,
        };
        store.write_record(kind, &self.key, body)
    }

    /// `true` when the English translation is filled in.
    pub fn has_translation(&self) -> bool {
        self.translations
            .get(Locale::En)
            .primary()
            .as_deref()
            .is_some_and(|s| !s.is_empty())
    }

    /// Number of English example sentences.
    pub fn sample_count(&self) -> usize {
        self.samples.get(Locale::En).primary().len()
    }

    /// Resolve the text to speak for `lang` using the thread-local RNG.
    pub fn resolve_speech_text(
        &self,
        lang: &str,
        selector: SentenceSelector,
    ) -> Result<SpeechText, ResolveError> {
        self.resolve_speech_text_with(lang, selector, &mut rand::thread_rng())
    }

    /// Resolve the text to speak for `lang`, drawing random picks from `rng`.
    pub fn resolve_speech_text_with<R: Rng>(
        &self,
        lang: &str,
        selector: SentenceSelector,
        rng: &mut R,
    ) -> Result<SpeechText, ResolveError> {
        let locale: Locale = lang.parse()?;
        let sentences = self.samples.get(locale);

        let selector = match selector {
            SentenceSelector::Random => match sentences.primary().len() {
                0 => SentenceSelector::Canonical,
                n => SentenceSelector::Index(rng.gen_range(0..n)),
            },
            other => other,
        };

        match selector {
            SentenceSelector::Index(index) => {
                let available = sentences.primary().len();
                let out_of_range = || ResolveError::SelectorOutOfRange {
                    key: self.key.clone(),
                    locale,
                    index,
                    available,
                };
                let speak = sentences.primary().get(index).ok_or_else(out_of_range)?.clone();
                let display = match sentences {
                    LocaleValue::Simple(_) => None,
                    LocaleValue::DualScript { latin, .. } => {
                        let latin = latin.get(index).ok_or_else(out_of_range)?;
                        Some(format!("{latin} / {speak}"))
                    }
                };
                Ok(SpeechText {
                    locale,
                    speak,
                    display,
                })
            }
            _ => {
                let translation = self.translations.get(locale);
                let speak = translation
                    .primary()
                    .clone()
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| ResolveError::NothingToSay {
                        key: self.key.clone(),
                        locale,
                    })?;
                Ok(SpeechText {
                    locale,
                    speak,
                    display: translation.latin().cloned().flatten(),
                })
            }
        }
    }
}

/// Read the `[key]` object of a record and decode it as a partial table.
fn read_overlay<T>(
    store: &WordStore,
    kind: RecordKind,
    key: &str,
) -> Result<Option<LocaleOverlay<T>>, StoreError>
where
    T: serde::de::DeserializeOwned + Default,
{
    let Some(body) = store.read_record(kind, key)? else {
        return Ok(None);
    };
    serde_json::from_value(body)
        .map(Some)
        .map_err(|e| StoreError::MalformedData {
            path: store.record_path_unchecked(kind, key),
            reason: e.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> WordStore {
        WordStore::new(dir.path().join("words"), dir.path().join("sentences"))
    }

    fn write(path: PathBuf, value: serde_json::Value) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, value.to_string()).unwrap();
    }

    fn have_word() -> Word {
        let mut w = Word::new("have");
        w.translations = serde_json::from_value(json!({
            "en": "have",
            "fr": "avoir",
            "es": "tener",
            "pt": "ter",
            "ru": {"cyr": "иметь", "lat": "imet'"},
            "il": {"heb": "יש לי", "lat": "yesh li"}
        }))
        .unwrap();
        w.samples = serde_json::from_value(json!({
            "en": ["I have a book.", "She has a cat.", "We have time."],
            "fr": ["J'ai un livre.", "Elle a un chat.", "Nous avons du temps."],
            "ru": {
                "cyr": ["У меня есть книга.", "У неё есть кошка.", "У нас есть время."],
                "lat": ["U menya yest' kniga.", "U neyo yest' koshka.", "U nas yest' vremya."]
            }
        }))
        .unwrap();
        w
    }

    // ---- load / save -------------------------------------------------------

    #[test]
    fn load_without_records_keeps_defaults() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        let mut w = Word::new("cat");
        w.load(&store);

        assert_eq!(w.translations, default_translations("cat"));
        assert_eq!(w.samples, default_samples());
        assert!(w.has_translation());
        assert_eq!(w.sample_count(), 0);
    }

    #[test]
    fn load_overlays_disk_values() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        write(
            dir.path().join("words/cat.json"),
            json!({"cat": {"en": "cat", "fr": "chat"}}),
        );

        let mut w = Word::new("cat");
        w.load(&store);

        assert_eq!(w.translations.get(Locale::Fr).primary().as_deref(), Some("chat"));
        assert_eq!(w.translations.get(Locale::Es).primary(), &None);
    }

    #[test]
    fn malformed_json_is_not_fatal() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(dir.path().join("words")).unwrap();
        std::fs::write(dir.path().join("words/cat.json"), "{ not json").unwrap();

        let mut w = Word::new("cat");
        w.load(&store);
        assert_eq!(w.translations, default_translations("cat"));
    }

    #[test]
    fn missing_top_level_key_is_not_fatal() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        write(dir.path().join("words/cat.json"), json!({"dog": {"fr": "chien"}}));

        let mut w = Word::new("cat");
        w.load(&store);
        assert_eq!(w.translations, default_translations("cat"));
    }

    #[test]
    fn save_then_load_round_trips_translations() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let original = have_word();

        let path = original.save(&store, RecordKind::Translations).unwrap();
        assert!(path.ends_with("words/have.json"));

        let mut reloaded = Word::new("have");
        reloaded.load(&store);
        assert_eq!(reloaded.translations, original.translations);
        assert_eq!(reloaded.samples, default_samples());
    }

    #[test]
    fn save_writes_only_the_selected_record() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        have_word().save(&store, RecordKind::Sentences).unwrap();
        assert!(dir.path().join("sentences/have.json").exists());
        assert!(!dir.path().join("words/have.json").exists());
    }

    #[test]
    fn save_overwrites_unconditionally() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        write(
            dir.path().join("words/have.json"),
            json!({"have": {"en": "have", "fr": "posséder"}}),
        );

        have_word().save(&store, RecordKind::Translations).unwrap();

        let mut w = Word::new("have");
        w.load(&store);
        assert_eq!(w.translations.get(Locale::Fr).primary().as_deref(), Some("avoir"));
    }

    #[test]
    fn saved_file_has_single_top_level_key() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        have_word().save(&store, RecordKind::Translations).unwrap();

        let text = std::fs::read_to_string(dir.path().join("words/have.json")).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
        let obj = doc.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(doc["have"]["ru"]["cyr"], "иметь");
    }

    // ---- resolve_speech_text ----------------------------------------------

    #[test]
    fn canonical_simple_locale() {
        let text = have_word()
            .resolve_speech_text("fr", SentenceSelector::Canonical)
            .unwrap();
        assert_eq!(text.speak, "avoir");
        assert_eq!(text.display, None);
        assert_eq!(text.display_line(), "avoir");
    }

    #[test]
    fn canonical_dual_script_shows_transliteration() {
        let text = have_word()
            .resolve_speech_text("ru", SentenceSelector::Canonical)
            .unwrap();
        assert_eq!(text.speak, "иметь");
        assert_eq!(text.display.as_deref(), Some("imet'"));
    }

    #[test]
    fn indexed_sentence() {
        let text = have_word()
            .resolve_speech_text("en", SentenceSelector::Index(1))
            .unwrap();
        assert_eq!(text.speak, "She has a cat.");
    }

    #[test]
    fn indexed_dual_script_sentence_pairs_latin_and_script() {
        let text = have_word()
            .resolve_speech_text("ru", SentenceSelector::Index(2))
            .unwrap();
        assert_eq!(text.speak, "У нас есть время.");
        assert_eq!(
            text.display.as_deref(),
            Some("U nas yest' vremya. / У нас есть время.")
        );
    }

    #[test]
    fn index_out_of_range_is_an_error() {
        let err = have_word()
            .resolve_speech_text("en", SentenceSelector::Index(3))
            .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::SelectorOutOfRange {
                index: 3,
                available: 3,
                ..
            }
        ));
    }

    #[test]
    fn unsupported_locale_is_reported() {
        let err = have_word()
            .resolve_speech_text("de", SentenceSelector::Canonical)
            .unwrap_err();
        assert_eq!(err, ResolveError::UnsupportedLocale(UnsupportedLocale("de".into())));
    }

    #[test]
    fn random_picks_one_of_the_samples() {
        let w = have_word();
        let sentences = w.samples.get(Locale::En).primary().clone();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let text = w
                .resolve_speech_text_with("en", SentenceSelector::Random, &mut rng)
                .unwrap();
            assert!(sentences.contains(&text.speak));
        }
    }

    #[test]
    fn random_without_samples_falls_back_to_translation() {
        let text = have_word()
            .resolve_speech_text("es", SentenceSelector::Random)
            .unwrap();
        assert_eq!(text.speak, "tener");
    }

    #[test]
    fn missing_translation_has_nothing_to_say() {
        let err = Word::new("cat")
            .resolve_speech_text("pt", SentenceSelector::Canonical)
            .unwrap_err();
        assert!(matches!(err, ResolveError::NothingToSay { .. }));
    }

    // ---- SentenceSelector wire form ------------------------------------------

    #[test]
    fn selector_deserialises_null_int_and_random() {
        let s: SentenceSelector = serde_json::from_value(json!(null)).unwrap();
        assert_eq!(s, SentenceSelector::Canonical);
        let s: SentenceSelector = serde_json::from_value(json!(2)).unwrap();
        assert_eq!(s, SentenceSelector::Index(2));
        let s: SentenceSelector = serde_json::from_value(json!("random")).unwrap();
        assert_eq!(s, SentenceSelector::Random);
    }

    #[test]
    fn selector_rejects_garbage_and_negative_indices() {
        assert!(serde_json::from_value::<SentenceSelector>(json!("first")).is_err());
        assert!(serde_json::from_value::<SentenceSelector>(json!(-1)).is_err());
    }

    #[test]
    fn selector_serialises_back_to_wire_form() {
        assert_eq!(serde_json::to_value(SentenceSelector::Canonical).unwrap(), json!(null));
        assert_eq!(serde_json::to_value(SentenceSelector::Index(1)).unwrap(), json!(1));
        assert_eq!(serde_json::to_value(SentenceSelector::Random).unwrap(), json!("random"));
    }
}
