//! Resolve → voice lookup → synthesize.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::SpeechConfig;
use crate::store::{SentenceSelector, SpeechText, Word};

use super::synth::{SayCommand, SpeechError, SpeechSynthesizer, Utterance};
use super::voice::{voice_for, Rate};

/// What was spoken, and where it was saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: SpeechText,
    pub voice: &'static str,
    pub wpm: u32,
    /// Output file when rendering to disk.
    pub saved: Option<PathBuf>,
}

/// Speaks words through a [`SpeechSynthesizer`].
///
/// Calls block until the synthesizer returns; async callers should go
/// through `spawn_blocking`.
#[derive(Clone)]
pub struct SpeechRenderer {
    synth: Arc<dyn SpeechSynthesizer>,
    audio_dir: PathBuf,
    container: String,
}

impl SpeechRenderer {
    pub fn new(
        synth: Arc<dyn SpeechSynthesizer>,
        audio_dir: impl Into<PathBuf>,
        container: impl Into<String>,
    ) -> Self {
        Self {
            synth,
            audio_dir: audio_dir.into(),
            container: container.into(),
        }
    }

    /// A renderer driving the configured speech command.
    pub fn from_config(config: &SpeechConfig, audio_dir: impl Into<PathBuf>) -> Self {
        Self::new(
            Arc::new(SayCommand::new(config.program.clone())),
            audio_dir,
            config.container.clone(),
        )
    }

    pub fn audio_dir(&self) -> &Path {
        &self.audio_dir
    }

    /// `<audio_dir>/<key>_<locale>.<container>`
    pub fn output_path(&self, word: &Word, text: &SpeechText) -> PathBuf {
        self.audio_dir
            .join(format!("{}_{}.{}", word.key(), text.locale, self.container))
    }

    /// Speak `word` in `lang`, or render it to a file when `save` is set.
    pub fn render(
        &self,
        word: &Word,
        lang: &str,
        selector: SentenceSelector,
        rate: Rate,
        save: bool,
    ) -> Result<Rendered, SpeechError> {
        let text = word.resolve_speech_text(lang, selector)?;
        let profile = voice_for(text.locale);
        let wpm = profile.wpm(rate);

        let saved = if save {
            std::fs::create_dir_all(&self.audio_dir)?;
            let path = self.output_path(word, &text);
            log::info!(
                "saving speech to {} in {} ({}): {}",
                path.display(),
                text.locale,
                profile.voice,
                text.display_line()
            );
            Some(path)
        } else {
            log::info!(
                "speaking in {} ({}): {}",
                text.locale,
                profile.voice,
                text.display_line()
            );
            None
        };

        self.synth.speak(&Utterance {
            voice: profile.voice,
            wpm,
            text: &text.speak,
            output: saved.as_deref(),
        })?;

        Ok(Rendered {
            text,
            voice: profile.voice,
            wpm,
            saved,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::MockSynthesizer;
    use crate::store::{Locale, ResolveError};
    use serde_json::json;
    use tempfile::tempdir;

    fn have_word() -> Word {
        let mut w = Word::new("have");
        w.translations = serde_json::from_value(json!({
            "en": "have",
            "fr": "avoir",
            "il": {"heb": "יש לי", "lat": "yesh li"}
        }))
        .unwrap();
        w.samples = serde_json::from_value(json!({
            "en": ["I have a book.", "She has a cat.", "We have time."],
            "il": {
                "heb": ["יש לי ספר.", "יש לה חתול.", "יש לנו זמן."],
                "lat": ["yesh li sefer.", "yesh la chatul.", "yesh lanu zman."]
            }
        }))
        .unwrap();
        w
    }

    #[test]
    fn plays_with_locale_voice_and_rate() {
        let dir = tempdir().unwrap();
        let synth = Arc::new(MockSynthesizer::new());
        let renderer = SpeechRenderer::new(synth.clone(), dir.path().join("audio"), "aiff");

        let out = renderer
            .render(&have_word(), "fr", SentenceSelector::Canonical, Rate::Slow, false)
            .unwrap();

        assert_eq!(out.saved, None);
        assert_eq!(
            synth.calls(),
            vec![("Thomas".to_string(), 70, "avoir".to_string(), None)]
        );
        assert!(!dir.path().join("audio").exists());
    }

    #[test]
    fn saving_writes_key_locale_container_file() {
        let dir = tempdir().unwrap();
        let synth = Arc::new(MockSynthesizer::new());
        let renderer = SpeechRenderer::new(synth.clone(), dir.path().join("audio"), "aiff");

        let out = renderer
            .render(&have_word(), "il", SentenceSelector::Index(1), Rate::Normal, true)
            .unwrap();

        let expected = dir.path().join("audio/have_il.aiff");
        assert_eq!(out.saved.as_deref(), Some(expected.as_path()));
        assert!(expected.exists());
        assert_eq!(out.text.speak, "יש לה חתול.");
        assert_eq!(out.text.display_line(), "yesh la chatul. / יש לה חתול.");
        assert_eq!(out.wpm, 100);
    }

    #[test]
    fn resolve_errors_skip_the_synthesizer() {
        let dir = tempdir().unwrap();
        let synth = Arc::new(MockSynthesizer::new());
        let renderer = SpeechRenderer::new(synth.clone(), dir.path(), "aiff");

        let err = renderer
            .render(&have_word(), "de", SentenceSelector::Canonical, Rate::Normal, false)
            .unwrap_err();
        assert!(matches!(
            err,
            SpeechError::Resolve(ResolveError::UnsupportedLocale(_))
        ));
        assert!(synth.calls().is_empty());
    }

    #[test]
    fn synthesizer_failure_propagates() {
        let dir = tempdir().unwrap();
        let renderer =
            SpeechRenderer::new(Arc::new(MockSynthesizer::failing()), dir.path(), "aiff");

        let err = renderer
            .render(&have_word(), "en", SentenceSelector::Random, Rate::Normal, false)
            .unwrap_err();
        assert!(matches!(err, SpeechError::CommandFailed { .. }));
    }

    #[test]
    fn output_path_uses_locale_code() {
        let renderer = SpeechRenderer::new(Arc::new(MockSynthesizer::new()), "data/audio", "aiff");
        let text = SpeechText {
            locale: Locale::Ru,
            speak: "иметь".into(),
            display: None,
        };
        assert_eq!(
            renderer.output_path(&have_word(), &text),
            PathBuf::from("data/audio/have_ru.aiff")
        );
    }
}
