//! Batch conversion of rendered speech files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use crate::config::TranscodeConfig;

use super::transcode::{EncodeParams, FfmpegTranscoder, Transcoder};

/// Per-run counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertSummary {
    pub converted: usize,
    /// Target already present.
    pub skipped: usize,
    pub failed: usize,
}

/// Converts every `<source_ext>` file under a directory tree to
/// `<target_ext>`, next to the original.
pub struct AudioPostprocessor {
    transcoder: Arc<dyn Transcoder>,
    params: EncodeParams,
    source_ext: String,
    target_ext: String,
}

impl AudioPostprocessor {
    pub fn new(
        transcoder: Arc<dyn Transcoder>,
        params: EncodeParams,
        source_ext: impl Into<String>,
        target_ext: impl Into<String>,
    ) -> Self {
        Self {
            transcoder,
            params,
            source_ext: source_ext.into(),
            target_ext: target_ext.into(),
        }
    }

    pub fn from_config(config: &TranscodeConfig) -> Self {
        Self::new(
            Arc::new(FfmpegTranscoder::new(config.program.clone())),
            EncodeParams::from(config),
            config.source_ext.clone(),
            config.target_ext.clone(),
        )
    }

    /// Source files under `root`, sorted.  A missing `root` yields nothing.
    pub fn sources(&self, root: &Path) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = WalkDir::new(root)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(err) => {
                    log::debug!("skipping unreadable entry: {err}");
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| p.extension().is_some_and(|ext| ext == self.source_ext.as_str()))
            .collect();
        found.sort();
        found
    }

    /// Convert every source under `root` whose target does not exist yet.
    ///
    /// A failed file is logged and counted; the run continues.
    pub fn convert_all(&self, root: &Path) -> ConvertSummary {
        let mut summary = ConvertSummary::default();

        for src in self.sources(root) {
            let dst = src.with_extension(&self.target_ext);
            if dst.exists() {
                log::debug!("{} already exists, skipping", dst.display());
                summary.skipped += 1;
                continue;
            }

            log::info!("converting {} ...", src.display());
            match self.transcoder.transcode(&src, &dst, &self.params) {
                Ok(()) => summary.converted += 1,
                Err(e) => {
                    log::warn!("conversion failed: {e}");
                    if let Err(rm) = std::fs::remove_file(&dst) {
                        if rm.kind() != std::io::ErrorKind::NotFound {
                            log::warn!("could not remove partial {}: {rm}", dst.display());
                        }
                    }
                    summary.failed += 1;
                }
            }
        }

        log::info!(
            "audio conversion: {} converted, {} skipped, {} failed",
            summary.converted,
            summary.skipped,
            summary.failed
        );
        summary
    }
}
