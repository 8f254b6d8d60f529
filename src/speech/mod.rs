//! Speech rendering through an OS text-to-speech command.
//!
//! ```text
//! Word + lang + selector ──resolve_speech_text──▶ SpeechText
//!                         ──voice_for(locale)───▶ voice, wpm
//!                         ──SpeechSynthesizer───▶ speakers | <key>_<locale>.<container>
//! ```

pub mod renderer;
pub mod synth;
pub mod voice;

pub use renderer::{Rendered, SpeechRenderer};
pub use synth::{SayCommand, SpeechError, SpeechSynthesizer, Utterance};
pub use voice::{voice_for, Rate, VoiceProfile};

// test-only re-export so renderer and server tests share one double.
#[cfg(test)]
pub use synth::MockSynthesizer;
