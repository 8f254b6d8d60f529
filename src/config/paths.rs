//! Application paths.
//!
//! Two families of paths are resolved here:
//!
//! Settings file (via the `dirs` crate):
//!   Windows: %APPDATA%\language-ninja\settings.toml
//!   macOS:   ~/Library/Application Support/language-ninja/settings.toml
//!   Linux:   ~/.config/language-ninja/settings.toml
//!
//! Data tree (relative to the configured data root, `data/` by default):
//!   words/<key>.json
//!   sentences/<key>.json
//!   audio/<key>_<locale>.<container>

use std::path::{Path, PathBuf};

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory holding `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// One translation record per lemma.
    pub words_dir: PathBuf,
    /// One example-sentence record per lemma.
    pub sentences_dir: PathBuf,
    /// Rendered and transcoded speech.
    pub audio_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "language-ninja";

    /// Resolves all paths, rooting the data tree at `data_root`.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard config path.
    pub fn new(data_root: impl AsRef<Path>) -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);
        let settings_file = config_dir.join("settings.toml");

        let root = data_root.as_ref();

        Self {
            config_dir,
            settings_file,
            words_dir: root.join("words"),
            sentences_dir: root.join("sentences"),
            audio_dir: root.join("audio"),
        }
    }

    /// Default location of `settings.toml`, independent of any data root.
    pub fn default_settings_file() -> PathBuf {
        Self::new("data").settings_file
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new("data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_non_empty() {
        let paths = AppPaths::default();
        assert!(paths.config_dir.to_str().is_some_and(|s| !s.is_empty()));
        assert!(paths
            .settings_file
            .file_name()
            .is_some_and(|n| n == "settings.toml"));
    }

    #[test]
    fn data_tree_follows_root() {
        let paths = AppPaths::new("/srv/ninja");
        assert_eq!(paths.words_dir, PathBuf::from("/srv/ninja/words"));
        assert_eq!(paths.sentences_dir, PathBuf::from("/srv/ninja/sentences"));
        assert_eq!(paths.audio_dir, PathBuf::from("/srv/ninja/audio"));
    }
}
