//! OS speech-synthesis collaborator.
//!
//! [`SpeechSynthesizer`] is object-safe and `Send + Sync` so the renderer can
//! hold it behind an `Arc<dyn SpeechSynthesizer>` and call it from
//! `spawn_blocking`.  [`SayCommand`] drives the macOS `say` command (or any
//! program accepting the same `-v`, `-r` and `-o` flags).

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use thiserror::Error;

use crate::store::ResolveError;

// ---------------------------------------------------------------------------
// SpeechError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SpeechError {
    /// No text could be chosen for the request.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The speech program ran but reported failure.
    #[error("{program} exited with code {code:?}: {stderr}")]
    CommandFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The speech program could not be started.
    #[error("could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

// ---------------------------------------------------------------------------
// SpeechSynthesizer
// ---------------------------------------------------------------------------

/// One synthesis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance<'a> {
    pub voice: &'a str,
    pub wpm: u32,
    pub text: &'a str,
    /// Render to this file instead of playing.
    pub output: Option<&'a Path>,
}

pub trait SpeechSynthesizer: Send + Sync {
    /// Play or render `utterance`, blocking until the command exits.
    fn speak(&self, utterance: &Utterance<'_>) -> Result<(), SpeechError>;
}

// Compile-time assertion: Box<dyn SpeechSynthesizer> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SpeechSynthesizer>) {}
};

// ---------------------------------------------------------------------------
// SayCommand
// ---------------------------------------------------------------------------

/// Runs `<program> -v <voice> -r <wpm> [-o <path>] -- <text>`.
///
/// Arguments are passed directly, never through a shell, so the text needs
/// no quoting.  A `--` ends option parsing so text starting with `-` is
/// spoken, not read as a flag.
#[derive(Debug, Clone)]
pub struct SayCommand {
    program: String,
}

impl SayCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn args(utterance: &Utterance<'_>) -> Vec<String> {
        let mut args = vec![
            "-v".to_string(),
            utterance.voice.to_string(),
            "-r".to_string(),
            utterance.wpm.to_string(),
        ];
        if let Some(path) = utterance.output {
            args.push("-o".into());
            args.push(path.display().to_string());
        }
        args.push("--".into());
        args.push(utterance.text.to_string());
        args
    }
}

impl Default for SayCommand {
    fn default() -> Self {
        Self::new("say")
    }
}

impl SpeechSynthesizer for SayCommand {
    fn speak(&self, utterance: &Utterance<'_>) -> Result<(), SpeechError> {
        let output = Command::new(&self.program)
            .args(Self::args(utterance))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| SpeechError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SpeechError::CommandFailed {
                program: self.program.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MockSynthesizer  (test-only)
// ---------------------------------------------------------------------------

/// Records every utterance; optionally fails each call.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockSynthesizer {
    calls: std::sync::Mutex<Vec<(String, u32, String, Option<std::path::PathBuf>)>>,
    fail: bool,
}

#[cfg(test)]
impl MockSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A synthesizer whose every call fails with `CommandFailed`.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// `(voice, wpm, text, output)` of every call so far.
    pub fn calls(&self) -> Vec<(String, u32, String, Option<std::path::PathBuf>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl SpeechSynthesizer for MockSynthesizer {
    fn speak(&self, u: &Utterance<'_>) -> Result<(), SpeechError> {
        self.calls.lock().unwrap().push((
            u.voice.to_string(),
            u.wpm,
            u.text.to_string(),
            u.output.map(Path::to_path_buf),
        ));
        if self.fail {
            return Err(SpeechError::CommandFailed {
                program: "mock".into(),
                code: Some(1),
                stderr: "voice not installed".into(),
            });
        }
        if let Some(path) = u.output {
            std::fs::write(path, b"FORM")?;
        }
        Ok(())
    }
}
