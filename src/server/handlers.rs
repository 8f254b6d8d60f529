//! JSON API handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::speech::Rate;
use crate::store::{validate_key, Samples, SentenceSelector, Translations, Word};

use super::error::ApiError;
use super::AppState;

/// `GET /api/word/:key` and `GET /api/random` body.
#[derive(Debug, Serialize)]
pub struct WordView {
    pub key: String,
    pub translations: Translations,
    pub samples: Samples,
}

impl From<Word> for WordView {
    fn from(word: Word) -> Self {
        Self {
            key: word.key().to_string(),
            translations: word.translations,
            samples: word.samples,
        }
    }
}

/// `POST /api/say` body.
#[derive(Debug, Clone, Deserialize)]
pub struct SayRequest {
    pub key: String,
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default)]
    pub sentence: SentenceSelector,
    #[serde(default)]
    pub rate: Rate,
    #[serde(default)]
    pub save_to: bool,
}

fn default_lang() -> String {
    "en".into()
}

pub async fn get_word(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<WordView>, ApiError> {
    if !state.store.word_exists(&key) {
        return Err(ApiError::NotFound("Word not found or missing data.".into()));
    }
    Ok(Json(state.store.load_word(&key).into()))
}

pub async fn random_word(State(state): State<AppState>) -> Result<Json<WordView>, ApiError> {
    let key = state
        .store
        .random_key()?
        .ok_or_else(|| ApiError::NotFound("No word files found.".into()))?;
    Ok(Json(state.store.load_word(&key).into()))
}

pub async fn say(
    State(state): State<AppState>,
    payload: Result<Json<SayRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    validate_key(&req.key).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let store = state.store.clone();
    let renderer = state.renderer.clone();
    let job = req.clone();
    let rendered = tokio::task::spawn_blocking(move || {
        let word = store.load_word(&job.key);
        renderer.render(&word, &job.lang, job.sentence, job.rate, job.save_to)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("speech task failed: {e}")))??;

    Ok(Json(json!({
        "ok": true,
        "spoke": {
            "key": req.key,
            "lang": req.lang,
            "sentence": req.sentence,
            "rate": req.rate,
            "saved": req.save_to,
            "text": rendered.text.display_line(),
            "file": rendered.saved,
        }
    })))
}
