//! The fixed locale set and its per-locale shape.
//!
//! Four locales carry a single string ([`LocaleKind::Simple`]).  Russian and
//! Hebrew are written in a non-Latin script and additionally carry a Latin
//! transliteration ([`LocaleKind::DualScript`]).  On disk a dual-script value
//! is an object keyed by the script field (`cyr` / `heb`) and `lat`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON field holding the Latin transliteration of a dual-script locale.
pub const LATIN_FIELD: &str = "lat";

/// Returned when a locale code is outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported language code: {0}")]
pub struct UnsupportedLocale(pub String);

/// Shape of the value stored for a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleKind {
    /// One string (or one sentence sequence).
    Simple,
    /// Native script plus Latin transliteration.  `primary` is the JSON
    /// field name of the native script.
    DualScript { primary: &'static str },
}

/// One of the six supported locales.
///
/// Declaration order is the on-disk field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Fr,
    Es,
    Pt,
    Ru,
    Il,
}

impl Locale {
    /// Every supported locale, in on-disk order.
    pub const ALL: [Locale; 6] = [
        Locale::En,
        Locale::Fr,
        Locale::Es,
        Locale::Pt,
        Locale::Ru,
        Locale::Il,
    ];

    /// Two-letter code used in JSON records, file names and the HTTP API.
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Fr => "fr",
            Locale::Es => "es",
            Locale::Pt => "pt",
            Locale::Ru => "ru",
            Locale::Il => "il",
        }
    }

    pub fn kind(self) -> LocaleKind {
        match self {
            Locale::Ru => LocaleKind::DualScript { primary: "cyr" },
            Locale::Il => LocaleKind::DualScript { primary: "heb" },
            _ => LocaleKind::Simple,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Locale::ALL
            .into_iter()
            .find(|l| l.code() == code)
            .ok_or_else(|| UnsupportedLocale(code.to_string()))
    }
}
