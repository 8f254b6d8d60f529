//! Audio postprocessing: rendered speech → compressed mono files.
//!
//! ```text
//! data/audio/**/<key>_<locale>.aiff ──Transcoder──▶ data/audio/**/<key>_<locale>.mp3
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use language_ninja::audio::AudioPostprocessor;
//! use language_ninja::config::TranscodeConfig;
//!
//! let pp = AudioPostprocessor::from_config(&TranscodeConfig::default());
//! let summary = pp.convert_all(Path::new("data/audio"));
//! println!("{} converted", summary.converted);
//! ```

pub mod convert;
pub mod transcode;

pub use convert::{AudioPostprocessor, ConvertSummary};
pub use transcode::{AudioError, EncodeParams, FfmpegTranscoder, Transcoder};
