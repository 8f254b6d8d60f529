//! Chunked batch driver over a whole candidate word list.
//!
//! [`run_batches`] splits the list into chunks of `batch_size`, runs one
//! generate (+ save) cycle per chunk, and stops after `max_iterations`
//! chunks that actually produced entries.  A failing chunk is logged and the
//! run moves on to the next one.

use std::sync::Arc;

use crate::llm::LlmClient;
use crate::store::WordStore;

use super::runner::{GenerationMode, Generator, SaveSummary};

/// Knobs for one [`run_batches`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    pub mode: GenerationMode,
    pub batch_size: usize,
    pub max_iterations: usize,
    pub simulate: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            mode: GenerationMode::Words,
            batch_size: 5,
            max_iterations: 100_000,
            simulate: false,
        }
    }
}

/// Totals over a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Chunks attempted.
    pub chunks: usize,
    /// Chunks that produced at least one entry.
    pub iterations: usize,
    /// Entries decoded from LLM replies.
    pub generated: usize,
    pub saved: usize,
    pub skipped: usize,
    /// Failed saves plus failed chunks.
    pub failed: usize,
}

impl BatchReport {
    fn absorb(&mut self, summary: SaveSummary) {
        self.saved += summary.saved.len();
        self.skipped += summary.skipped.len();
        self.failed += summary.failed.len();
    }
}

/// Generate and persist `opts.mode` artifacts for every lemma in `word_list`.
pub async fn run_batches(
    store: WordStore,
    llm: Arc<dyn LlmClient>,
    word_list: &[String],
    opts: &BatchOptions,
) -> BatchReport {
    let mut report = BatchReport::default();
    let mut generator = Generator::new(store.clone(), llm, Vec::new());

    let pending = generator.filter_unprocessed(word_list, opts.mode);
    let pending: Vec<String> = match opts.mode {
        GenerationMode::Words => pending,
        GenerationMode::Sentences => {
            let (ready, untranslated): (Vec<String>, Vec<String>) =
                pending.into_iter().partition(|k| store.word_exists(k));
            if !untranslated.is_empty() {
                log::warn!(
                    "{} word(s) have no translations yet, skipping sentences for them",
                    untranslated.len()
                );
            }
            ready
        }
    };

    log::info!(
        "{} of {} word(s) need {} (batch size {})",
        pending.len(),
        word_list.len(),
        opts.mode,
        opts.batch_size
    );

    for chunk in pending.chunks(opts.batch_size.max(1)) {
        if report.iterations >= opts.max_iterations {
            log::info!("reached {} iteration(s), stopping", opts.max_iterations);
            break;
        }
        report.chunks += 1;
        generator.set_word_list(chunk.to_vec());

        let generated = match opts.mode {
            GenerationMode::Words => generator.generate_words(opts.simulate).await,
            GenerationMode::Sentences => generator.generate_sentences(opts.simulate).await,
        };
        let count = match generated {
            Ok(n) => n,
            Err(e) => {
                log::warn!("chunk {} failed: {e}", report.chunks);
                report.failed += 1;
                continue;
            }
        };
        if count == 0 {
            continue;
        }

        report.iterations += 1;
        report.generated += count;
        let summary = match opts.mode {
            GenerationMode::Words => generator.save_words(),
            GenerationMode::Sentences => generator.save_sentences(),
        };
        report.absorb(summary);
    }

    log::info!(
        "{}: {} generated, {} saved, {} skipped, {} failed",
        opts.mode,
        report.generated,
        report.saved,
        report.skipped,
        report.failed
    );
    report
}
