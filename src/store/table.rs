//! Per-locale value tables.
//!
//! [`LocaleTable<T>`] holds one [`LocaleValue<T>`] for every [`Locale`].
//! Two instantiations make up a word:
//!
//! * [`Translations`]: `T = Option<String>`, one word per locale.
//! * [`Samples`]:      `T = Vec<String>`, example sentences per locale.
//!
//! On disk a table is a JSON object keyed by locale code; dual-script
//! locales nest `{ "<script>": …, "lat": … }`.  A partially filled object
//! deserialises as a [`LocaleOverlay`], which replaces whole locale entries
//! of an existing table (a shallow merge).

use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::locale::{Locale, LocaleKind, LATIN_FIELD};

// ---------------------------------------------------------------------------
// LocaleValue
// ---------------------------------------------------------------------------

/// The value stored for one locale.
#[derive(Debug, Clone, PartialEq)]
pub enum LocaleValue<T> {
    Simple(T),
    DualScript { primary: T, latin: T },
}

impl<T> LocaleValue<T> {
    /// The spoken form: the value of a simple locale, or the native script
    /// of a dual-script locale.
    pub fn primary(&self) -> &T {
        match self {
            LocaleValue::Simple(v) => v,
            LocaleValue::DualScript { primary, .. } => primary,
        }
    }

    /// The Latin transliteration, for dual-script locales only.
    pub fn latin(&self) -> Option<&T> {
        match self {
            LocaleValue::Simple(_) => None,
            LocaleValue::DualScript { latin, .. } => Some(latin),
        }
    }
}

impl<T: Default> LocaleValue<T> {
    fn empty(locale: Locale) -> Self {
        match locale.kind() {
            LocaleKind::Simple => LocaleValue::Simple(T::default()),
            LocaleKind::DualScript { .. } => LocaleValue::DualScript {
                primary: T::default(),
                latin: T::default(),
            },
        }
    }
}

impl<T: DeserializeOwned + Default> LocaleValue<T> {
    /// Decode the JSON value stored under `locale`.
    ///
    /// Missing script fields of a dual-script object fall back to
    /// `T::default()`.
    fn from_json(locale: Locale, value: Value) -> Result<Self, serde_json::Error> {
        match locale.kind() {
            LocaleKind::Simple => Ok(LocaleValue::Simple(serde_json::from_value(value)?)),
            LocaleKind::DualScript { primary } => {
                let mut obj: Map<String, Value> = serde_json::from_value(value)?;
                let mut take = |field: &str| -> Result<T, serde_json::Error> {
                    match obj.remove(field) {
                        Some(v) => serde_json::from_value(v),
                        None => Ok(T::default()),
                    }
                };
                Ok(LocaleValue::DualScript {
                    primary: take(primary)?,
                    latin: take(LATIN_FIELD)?,
                })
            }
        }
    }
}

/// Serialises a value with the field names its locale requires.
struct Keyed<'a, T>(Locale, &'a LocaleValue<T>);

impl<T: Serialize> Serialize for Keyed<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.1 {
            LocaleValue::Simple(v) => v.serialize(serializer),
            LocaleValue::DualScript { primary, latin } => {
                let primary_field = match self.0.kind() {
                    LocaleKind::DualScript { primary } => primary,
                    LocaleKind::Simple => "primary",
                };
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry(primary_field, primary)?;
                map.serialize_entry(LATIN_FIELD, latin)?;
                map.end()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// LocaleOverlay
// ---------------------------------------------------------------------------

/// A partial table: only the locales present in the source JSON.
///
/// Unknown locale keys are ignored.  A known key with the wrong shape fails
/// the whole decode.
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleOverlay<T> {
    entries: Vec<(Locale, LocaleValue<T>)>,
}

impl<T> LocaleOverlay<T> {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<'de, T: DeserializeOwned + Default> Deserialize<'de> for LocaleOverlay<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        let mut entries = Vec::with_capacity(raw.len());
        for (code, value) in raw {
            let Ok(locale) = code.parse::<Locale>() else {
                log::debug!("ignoring unknown locale key {code:?}");
                continue;
            };
            match LocaleValue::from_json(locale, value) {
                Ok(decoded) => entries.push((locale, decoded)),
                Err(e) => log::warn!("ignoring malformed locale {code:?}: {e}"),
            }
        }
        Ok(Self { entries })
    }
}

// ---------------------------------------------------------------------------
// LocaleTable
// ---------------------------------------------------------------------------

/// One value per supported locale.
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleTable<T> {
    values: [LocaleValue<T>; 6],
}

/// Single translation per locale; `None` until filled.
pub type Translations = LocaleTable<Option<String>>;

/// Example sentences per locale, position-aligned across locales.
pub type Samples = LocaleTable<Vec<String>>;

impl<T: Default> LocaleTable<T> {
    /// A table with every leaf at `T::default()`.
    pub fn empty() -> Self {
        Self {
            values: Locale::ALL.map(LocaleValue::empty),
        }
    }
}

impl<T: Default> Default for LocaleTable<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> LocaleTable<T> {
    pub fn get(&self, locale: Locale) -> &LocaleValue<T> {
        &self.values[locale.index()]
    }

    /// Iterate in on-disk locale order.
    pub fn iter(&self) -> impl Iterator<Item = (Locale, &LocaleValue<T>)> {
        Locale::ALL.into_iter().zip(self.values.iter())
    }

    /// Replace every locale entry present in `overlay`.
    pub fn overlay(&mut self, overlay: LocaleOverlay<T>) {
        for (locale, value) in overlay.entries {
            self.values[locale.index()] = value;
        }
    }
}

impl<T: Serialize> Serialize for LocaleTable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (locale, value) in self.iter() {
            map.serialize_entry(locale.code(), &Keyed(locale, value))?;
        }
        map.end()
    }
}

impl<'de, T: DeserializeOwned + Default> Deserialize<'de> for LocaleTable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut table = Self::empty();
        table.overlay(LocaleOverlay::deserialize(deserializer)?);
        Ok(table)
    }
}

// ---------------------------------------------------------------------------
// Default factories
// ---------------------------------------------------------------------------

/// Fresh all-null translations with `en` seeded to `key`.
pub fn default_translations(key: &str) -> Translations {
    let mut table = Translations::empty();
    table.values[Locale::En.index()] = LocaleValue::Simple(Some(key.to_string()));
    table
}

/// Fresh samples with every sentence sequence empty.
pub fn default_samples() -> Samples {
    Samples::empty()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
