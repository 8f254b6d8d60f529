//! External audio transcoder.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use thiserror::Error;

use crate::config::TranscodeConfig;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("{program} exited with code {code:?} for {file}: {stderr}")]
    CommandFailed {
        program: String,
        file: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Fixed output encoding: mono CBR MP3 by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeParams {
    pub channels: u16,
    pub sample_rate: u32,
    pub bitrate_kbps: u32,
}

impl Default for EncodeParams {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: 22_050,
            bitrate_kbps: 64,
        }
    }
}

impl From<&TranscodeConfig> for EncodeParams {
    fn from(config: &TranscodeConfig) -> Self {
        Self {
            channels: config.channels,
            sample_rate: config.sample_rate,
            bitrate_kbps: config.bitrate_kbps,
        }
    }
}

pub trait Transcoder: Send + Sync {
    /// Convert `src` into `dst`, replacing `dst` if present.
    fn transcode(&self, src: &Path, dst: &Path, params: &EncodeParams) -> Result<(), AudioError>;
}

/// Runs `ffmpeg -y -i <src> -ac <n> -ar <hz> -c:a libmp3lame -b:a <k>k <dst>`.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    program: String,
}

impl FfmpegTranscoder {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn args(src: &Path, dst: &Path, params: &EncodeParams) -> Vec<String> {
        vec![
            "-y".into(),
            "-i".into(),
            src.display().to_string(),
            "-ac".into(),
            params.channels.to_string(),
            "-ar".into(),
            params.sample_rate.to_string(),
            "-c:a".into(),
            "libmp3lame".into(),
            "-b:a".into(),
            format!("{}k", params.bitrate_kbps),
            dst.display().to_string(),
        ]
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl Transcoder for FfmpegTranscoder {
    fn transcode(&self, src: &Path, dst: &Path, params: &EncodeParams) -> Result<(), AudioError> {
        if let Some(parent) = dst.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let output = Command::new(&self.program)
            .args(Self::args(src, dst, params))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| AudioError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // ffmpeg prints its banner first; the cause is on the last line.
            let last = stderr.lines().last().unwrap_or_default().trim().to_string();
            return Err(AudioError::CommandFailed {
                program: self.program.clone(),
                file: src.display().to_string(),
                code: output.status.code(),
                stderr: last,
            });
        }
        Ok(())
    }
}
