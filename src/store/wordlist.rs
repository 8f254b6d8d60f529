//! Candidate word lists for batch generation.
//!
//! A word list is a plain-text file with one lemma per line.  Frequency
//! lists often carry extra columns (`the 23135851162`); only the first
//! whitespace-separated token is used.  Blank lines and `#` comments are
//! skipped, and repeated lemmas keep their first position.

use std::collections::HashSet;
use std::path::Path;

use super::StoreError;

/// Counters gathered while parsing a word list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WordListStats {
    /// Non-empty, non-comment lines.
    pub lines: usize,
    /// Lemmas kept.
    pub unique: usize,
    /// Lines dropped as repeats of an earlier lemma.
    pub duplicates: usize,
}

/// Parse word-list text into an ordered, duplicate-free lemma list.
pub fn parse_word_list(text: &str) -> (Vec<String>, WordListStats) {
    let mut stats = WordListStats::default();
    let mut seen = HashSet::new();
    let mut words = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(lemma) = line.split_whitespace().next() else {
            continue;
        };
        stats.lines += 1;

        if seen.insert(lemma.to_string()) {
            words.push(lemma.to_string());
        } else {
            stats.duplicates += 1;
        }
    }

    stats.unique = words.len();
    (words, stats)
}

/// Read and parse a word-list file, logging its statistics.
pub fn load_word_list(path: &Path) -> Result<Vec<String>, StoreError> {
    let text = std::fs::read_to_string(path)?;
    let (words, stats) = parse_word_list(&text);
    log::info!(
        "word list {}: {} lines, {} unique, {} duplicates",
        path.display(),
        stats.lines,
        stats.unique,
        stats.duplicates
    );
    Ok(words)
}
