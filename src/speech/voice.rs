//! Per-locale voice dispatch table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::store::Locale;

/// Speaking-rate category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rate {
    Slow,
    #[default]
    Normal,
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rate::Slow => f.write_str("slow"),
            Rate::Normal => f.write_str("normal"),
        }
    }
}

impl FromStr for Rate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "slow" => Ok(Rate::Slow),
            "normal" => Ok(Rate::Normal),
            other => Err(format!("unknown rate {other:?}: expected slow or normal")),
        }
    }
}

/// Voice and speaking rates (words per minute) for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceProfile {
    pub locale: Locale,
    pub voice: &'static str,
    pub normal_wpm: u32,
    pub slow_wpm: u32,
}

impl VoiceProfile {
    pub fn wpm(&self, rate: Rate) -> u32 {
        match rate {
            Rate::Slow => self.slow_wpm,
            Rate::Normal => self.normal_wpm,
        }
    }
}

/// Indexed by `Locale` declaration order.
const VOICES: [VoiceProfile; 6] = [
    VoiceProfile { locale: Locale::En, voice: "Samantha", normal_wpm: 130, slow_wpm: 80 },
    VoiceProfile { locale: Locale::Fr, voice: "Thomas", normal_wpm: 130, slow_wpm: 70 },
    VoiceProfile { locale: Locale::Es, voice: "Mónica", normal_wpm: 90, slow_wpm: 40 },
    VoiceProfile { locale: Locale::Pt, voice: "Joana", normal_wpm: 160, slow_wpm: 90 },
    VoiceProfile { locale: Locale::Ru, voice: "Milena", normal_wpm: 120, slow_wpm: 60 },
    VoiceProfile { locale: Locale::Il, voice: "Carmit", normal_wpm: 100, slow_wpm: 50 },
];

/// The voice profile for `locale`.
pub fn voice_for(locale: Locale) -> &'static VoiceProfile {
    &VOICES[locale.index()]
}
