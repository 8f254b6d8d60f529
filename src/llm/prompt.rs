//! Prompt builder for word and sentence generation.
//!
//! Both prompts show the model one worked example of the exact JSON shape
//! expected back (`{"result": [{"<lemma>": {...}}, ...]}`) and end with the
//! batch input:
//!
//! * **Words**: lemmas joined with `", "`.
//! * **Sentences**: a pretty-printed JSON list of `{"<lemma>": <translations>}`
//!   so the model sees every existing translation.

use serde_json::{Map, Value};

use crate::store::Translations;

// ---------------------------------------------------------------------------
// Instructions
// ---------------------------------------------------------------------------

const WORDS_INSTRUCTION: &str = r#"
Below is a JSON object holding the translations of one word ("she") into English, French, Spanish, Portuguese, Russian (Cyrillic spelling plus Latin transliteration) and Hebrew (Hebrew spelling plus Latin transliteration).
{
    "she": {
        "en": "she",
        "fr": "elle",
        "es": "ella",
        "pt": "ela",
        "ru": { "cyr": "она", "lat": "ona" },
        "il": { "heb": "היא", "lat": "hi" }
    }
}
Translate every word of the comma-separated list at the end in the same way.
Answer with a single JSON object of this exact shape (shown for "cat" and "dog"):
{
    "result": [
        {
            "cat": {
                "en": "cat",
                "fr": "chat",
                "es": "gato",
                "pt": "gato",
                "ru": { "cyr": "кошка", "lat": "koshka" },
                "il": { "heb": "חתול", "lat": "chatul" }
            }
        },
        {
            "dog": {
                "en": "dog",
                "fr": "chien",
                "es": "perro",
                "pt": "cão",
                "ru": { "cyr": "собака", "lat": "sobaka" },
                "il": { "heb": "כלב", "lat": "kelev" }
            }
        }
    ]
}
Words to translate:
"#;

const SENTENCES_INSTRUCTION: &str = r#"
Below is a JSON object holding the translations of one word ("have") into English, French, Spanish, Portuguese, Russian (Cyrillic spelling plus Latin transliteration) and Hebrew (Hebrew spelling plus Latin transliteration).
{
    "have": {
        "en": "have",
        "fr": "avoir",
        "es": "tener",
        "pt": "ter",
        "ru": { "cyr": "иметь", "lat": "imet'" },
        "il": { "heb": "יש לי", "lat": "yesh li" }
    }
}
For every word in the JSON list at the end, write exactly 3 (three) example sentences in each language.
Answer with a single JSON object of this exact shape (shown for "have"):
{
    "result": [
        {
            "have": {
                "en": ["I have a book.", "She has a cat.", "We have time."],
                "fr": ["J'ai un livre.", "Elle a un chat.", "Nous avons du temps."],
                "es": ["Tengo un libro.", "Ella tiene un gato.", "Tenemos tiempo."],
                "pt": ["Tenho um livro.", "Ela tem um gato.", "Temos tempo."],
                "ru": {
                    "cyr": ["У меня есть книга.", "У неё есть кошка.", "У нас есть время."],
                    "lat": ["U menya yest' kniga.", "U neyo yest' koshka.", "U nas yest' vremya."]
                },
                "il": {
                    "heb": ["יש לי ספר.", "יש לה חתול.", "יש לנו זמן."],
                    "lat": ["yesh li sefer.", "yesh la chatul.", "yesh lanu zman."]
                }
            }
        }
    ]
}
Rules:
 - sentence n of "en" must sit at position n in every other language list;
 - sentences sharing a position must be exact translations of each other, not different sentences;
 - keep the sentences simple, suitable for beginners.
Words to process:
"#;

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds generation prompts.
///
/// # Example
/// ```rust
/// use language_ninja::llm::PromptBuilder;
///
/// let prompt = PromptBuilder::words(&["cat".to_string(), "dog".to_string()]);
/// assert!(prompt.ends_with("cat, dog"));
/// ```
pub struct PromptBuilder;

impl PromptBuilder {
    /// Prompt asking for translations of `words`.
    pub fn words(words: &[String]) -> String {
        format!("{WORDS_INSTRUCTION}{}", words.join(", "))
    }

    /// Prompt asking for example sentences, given each word's translations.
    pub fn sentences<'a, I>(entries: I) -> Result<String, serde_json::Error>
    where
        I: IntoIterator<Item = (&'a str, &'a Translations)>,
    {
        let mut list = Vec::new();
        for (key, translations) in entries {
            let mut item = Map::new();
            item.insert(key.to_string(), serde_json::to_value(translations)?);
            list.push(Value::Object(item));
        }
        let input = serde_json::to_string_pretty(&list)?;
        Ok(format!("{SENTENCES_INSTRUCTION}{input}"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
