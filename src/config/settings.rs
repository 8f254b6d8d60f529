//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//! Every section is `#[serde(default)]`, so a partial `settings.toml` only
//! overrides the keys it names.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// DataConfig
// ---------------------------------------------------------------------------

/// Where the word store and audio files live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Root of the data tree (`words/`, `sentences/`, `audio/`).
    pub root: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data"),
        }
    }
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// TCP port.  The `PORT` environment variable takes precedence.
    pub port: u16,
    /// Directory holding the static front-end (`main.html`, `favicon.ico`).
    pub ui_dir: PathBuf,
    /// File inside `ui_dir` served at `/`.
    pub index_file: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            ui_dir: PathBuf::from("ui"),
            index_file: "main.html".into(),
        }
    }
}

impl ServerConfig {
    /// `host:port`, honouring a `PORT` override from the environment.
    pub fn bind_addr(&self) -> String {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(self.port);
        format!("{}:{}", self.host, port)
    }
}

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Settings for the OpenAI-compatible completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of the API endpoint (e.g. `https://api.openai.com`).
    pub base_url: String,
    /// API key.  When `None`, `OPENAI_API_KEY` from the environment is used.
    pub api_key: Option<String>,
    /// Model identifier sent to the API.
    pub model: String,
    /// Maximum seconds to wait for a completion.  Batch prompts are large,
    /// so this is generous.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            api_key: None,
            model: "gpt-5".into(),
            timeout_secs: 600,
        }
    }
}

impl LlmConfig {
    /// The configured key, or `OPENAI_API_KEY` when none is configured.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|k| !k.is_empty())
    }
}

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// OS speech-synthesis command settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Speech command (macOS `say` or a compatible replacement).
    pub program: String,
    /// Container extension of rendered files.
    pub container: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            program: "say".into(),
            container: "aiff".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// TranscodeConfig
// ---------------------------------------------------------------------------

/// Audio transcoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscodeConfig {
    /// Transcoder executable.
    pub program: String,
    /// Constant bitrate of the compressed output, in kbps.
    pub bitrate_kbps: u32,
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Output channel count.
    pub channels: u16,
    /// Extension of files to convert.
    pub source_ext: String,
    /// Extension of converted files.
    pub target_ext: String,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            program: "ffmpeg".into(),
            bitrate_kbps: 64,
            sample_rate: 22_050,
            channels: 1,
            source_ext: "aiff".into(),
            target_ext: "mp3".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// GeneratorConfig
// ---------------------------------------------------------------------------

/// Batch generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Lemmas sent to the LLM per request.
    pub batch_size: usize,
    /// Stop after this many batches that actually produced entries.
    pub max_iterations: usize,
    /// Default candidate word list file.
    pub word_list: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            max_iterations: 100_000,
            word_list: None,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use language_ninja::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// println!("{}", config.data.root.display());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub speech: SpeechConfig,
    pub transcode: TranscodeConfig,
    pub generator: GeneratorConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::default_settings_file())
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save to an explicit path, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Data-tree paths derived from `data.root`.
    pub fn paths(&self) -> AppPaths {
        AppPaths::new(&self.data.root)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.data.root, loaded.data.root);
        assert_eq!(original.server.port, loaded.server.port);
        assert_eq!(original.llm.base_url, loaded.llm.base_url);
        assert_eq!(original.llm.api_key, loaded.llm.api_key);
        assert_eq!(original.llm.model, loaded.llm.model);
        assert_eq!(original.speech.program, loaded.speech.program);
        assert_eq!(original.transcode.bitrate_kbps, loaded.transcode.bitrate_kbps);
        assert_eq!(original.generator.batch_size, loaded.generator.batch_size);
    }

    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        assert_eq!(config.data.root, PathBuf::from("data"));
        assert_eq!(config.generator.batch_size, 5);
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.index_file, "main.html");
        assert_eq!(cfg.llm.model, "gpt-5");
        assert!(cfg.llm.api_key.is_none());
        assert_eq!(cfg.speech.program, "say");
        assert_eq!(cfg.speech.container, "aiff");
        assert_eq!(cfg.transcode.bitrate_kbps, 64);
        assert_eq!(cfg.transcode.sample_rate, 22_050);
        assert_eq!(cfg.transcode.channels, 1);
        assert_eq!(cfg.generator.max_iterations, 100_000);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[transcode]\nbitrate_kbps = 96\n").unwrap();

        let cfg = AppConfig::load_from(&path).expect("load");
        assert_eq!(cfg.transcode.bitrate_kbps, 96);
        assert_eq!(cfg.transcode.program, "ffmpeg");
        assert_eq!(cfg.server.port, 8080);
    }

    #[test]
    fn configured_api_key_wins() {
        let cfg = LlmConfig {
            api_key: Some("sk-test".into()),
            ..LlmConfig::default()
        };
        assert_eq!(cfg.resolved_api_key().as_deref(), Some("sk-test"));
    }

    #[test]
    fn paths_follow_data_root() {
        let mut cfg = AppConfig::default();
        cfg.data.root = PathBuf::from("/tmp/ninja");
        assert_eq!(cfg.paths().words_dir, PathBuf::from("/tmp/ninja/words"));
    }
}
