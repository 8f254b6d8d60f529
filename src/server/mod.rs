//! HTTP front end.
//!
//! ```text
//! GET  /api/word/:key   → {key, translations, samples} | 404
//! GET  /api/random      → same shape, random key       | 404 when empty
//! POST /api/say         → {ok, spoke}                  | 400 {detail}
//! GET  /                → <ui_dir>/<index_file>
//! GET  /favicon.ico     → <ui_dir>/favicon.ico
//! GET  /audio/*         → files under <data>/audio
//! ```

pub mod error;
pub mod handlers;

use std::path::Path;

use anyhow::Result;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::{AppConfig, ServerConfig};
use crate::speech::SpeechRenderer;
use crate::store::WordStore;

pub use error::ApiError;

/// Shared by every handler; cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub store: WordStore,
    pub renderer: SpeechRenderer,
}

/// Build the full router.
pub fn router(state: AppState, server: &ServerConfig, audio_dir: &Path) -> Router {
    Router::new()
        .route("/api/word/:key", get(handlers::get_word))
        .route("/api/random", get(handlers::random_word))
        .route("/api/say", post(handlers::say))
        .route_service("/", ServeFile::new(server.ui_dir.join(&server.index_file)))
        .route_service("/favicon.ico", ServeFile::new(server.ui_dir.join("favicon.ico")))
        .nest_service("/audio", ServeDir::new(audio_dir))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: &AppConfig) -> Result<()> {
    let paths = config.paths();
    let state = AppState {
        store: WordStore::from_paths(&paths),
        renderer: SpeechRenderer::from_config(&config.speech, &paths.audio_dir),
    };
    let app = router(state, &config.server, &paths.audio_dir);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr.as_str()).await?;
    log::info!("listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::speech::MockSynthesizer;

    struct Fixture {
        dir: TempDir,
        synth: Arc<MockSynthesizer>,
        app: Router,
    }

    fn fixture_with(synth: MockSynthesizer) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let synth = Arc::new(synth);
        let state = AppState {
            store: WordStore::new(root.join("words"), root.join("sentences")),
            renderer: SpeechRenderer::new(synth.clone(), root.join("audio"), "aiff"),
        };
        let server = ServerConfig {
            ui_dir: root.join("ui"),
            ..ServerConfig::default()
        };
        let app = router(state, &server, &root.join("audio"));
        Fixture { dir, synth, app }
    }

    fn fixture() -> Fixture {
        fixture_with(MockSynthesizer::new())
    }

    impl Fixture {
        fn write(&self, rel: &str, content: &str) {
            let path = self.dir.path().join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }

        async fn get(&self, uri: &str) -> (StatusCode, Vec<u8>) {
            let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
            send(self.app.clone(), req).await
        }

        async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
            let req = Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap();
            let (status, bytes) = send(self.app.clone(), req).await;
            (status, serde_json::from_slice(&bytes).unwrap())
        }
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    fn json_of(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    // ---- /api/word ---------------------------------------------------------

    #[tokio::test]
    async fn word_returns_translations_and_empty_samples() {
        let f = fixture();
        f.write("words/cat.json", r#"{"cat": {"en": "cat", "fr": "chat"}}"#);

        let (status, body) = f.get("/api/word/cat").await;
        assert_eq!(status, StatusCode::OK);
        let body = json_of(&body);
        assert_eq!(body["key"], "cat");
        assert_eq!(body["translations"]["fr"], "chat");
        assert_eq!(body["translations"]["ru"], json!({"cyr": null, "lat": null}));
        assert_eq!(body["samples"]["en"], json!([]));
    }

    #[tokio::test]
    async fn unknown_word_is_404_with_detail() {
        let f = fixture();
        let (status, body) = f.get("/api/word/cat").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json_of(&body)["detail"].is_string());
    }

    #[tokio::test]
    async fn null_english_is_404() {
        let f = fixture();
        f.write("words/cat.json", r#"{"cat": {"en": null, "fr": "chat"}}"#);
        let (status, _) = f.get("/api/word/cat").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn dotted_key_is_404() {
        let f = fixture();
        f.write("words/.hidden.json", r#"{".hidden": {"en": "x"}}"#);
        let (status, _) = f.get("/api/word/.hidden").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn corrupt_record_is_404() {
        let f = fixture();
        f.write("words/cat.json", r#"{"cat": {"en": "ca"#);
        f.write("words/dog.json", r#"{"hund": {"en": "dog"}}"#);
        assert_eq!(f.get("/api/word/cat").await.0, StatusCode::NOT_FOUND);
        assert_eq!(f.get("/api/word/dog").await.0, StatusCode::NOT_FOUND);
    }

    // ---- /api/random -------------------------------------------------------

    #[tokio::test]
    async fn random_on_empty_store_is_404() {
        let f = fixture();
        let (status, _) = f.get("/api/random").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn random_ignores_hidden_files() {
        let f = fixture();
        f.write("words/.hidden.json", r#"{".hidden": {"en": "x"}}"#);
        let (status, _) = f.get("/api/random").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn random_returns_a_stored_word() {
        let f = fixture();
        f.write("words/dog.json", r#"{"dog": {"en": "dog"}}"#);
        let (status, body) = f.get("/api/random").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&body)["key"], "dog");
    }

    // ---- /api/say ----------------------------------------------------------

    #[tokio::test]
    async fn say_echoes_parameters() {
        let f = fixture();
        f.write("words/cat.json", r#"{"cat": {"en": "cat", "fr": "chat"}}"#);

        let (status, body) = f
            .post_json("/api/say", json!({"key": "cat", "lang": "fr", "rate": "slow"}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["spoke"]["lang"], "fr");
        assert_eq!(body["spoke"]["rate"], "slow");
        assert_eq!(body["spoke"]["sentence"], Value::Null);
        assert_eq!(body["spoke"]["saved"], false);

        let calls = f.synth.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "Thomas");
        assert_eq!(calls[0].2, "chat");
    }

    #[tokio::test]
    async fn say_defaults_to_english() {
        let f = fixture();
        let (status, _) = f.post_json("/api/say", json!({"key": "cat"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(f.synth.calls()[0].2, "cat");
    }

    #[tokio::test]
    async fn say_with_save_writes_audio_file() {
        let f = fixture();
        f.write("sentences/cat.json", r#"{"cat": {"en": ["A cat.", "The cat."]}}"#);

        let (status, body) = f
            .post_json("/api/say", json!({"key": "cat", "sentence": 1, "save_to": true}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["spoke"]["sentence"], 1);
        assert!(f.dir.path().join("audio/cat_en.aiff").exists());

        let (status, _) = f.get("/audio/cat_en.aiff").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn say_unsupported_language_is_400() {
        let f = fixture();
        let (status, body) = f.post_json("/api/say", json!({"key": "cat", "lang": "de"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "unsupported language code: de");
    }

    #[tokio::test]
    async fn say_out_of_range_sentence_is_400() {
        let f = fixture();
        let (status, _) = f.post_json("/api/say", json!({"key": "cat", "sentence": 5})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(f.synth.calls().is_empty());
    }

    #[tokio::test]
    async fn say_negative_sentence_is_400() {
        let f = fixture();
        let (status, body) = f.post_json("/api/say", json!({"key": "cat", "sentence": -1})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn say_synthesizer_failure_is_400() {
        let f = fixture_with(MockSynthesizer::failing());
        let (status, body) = f.post_json("/api/say", json!({"key": "cat"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("voice not installed"));
    }

    // ---- static files ------------------------------------------------------

    #[tokio::test]
    async fn index_is_served_at_root() {
        let f = fixture();
        f.write("ui/main.html", "<h1>ninja</h1>");
        let (status, body) = f.get("/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<h1>ninja</h1>");
    }
}
