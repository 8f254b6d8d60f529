//! Batch generation state machine.
//!
//! [`BatchState`] tracks where a [`Generator`](super::Generator) is within
//! one batch run.  Transitions:
//!
//! ```text
//! Idle ──generate──▶ Filtering
//!                    ──nothing left──▶ Idle
//!                    ──simulate──────▶ Simulated
//!                    ──otherwise─────▶ Requesting ──reply──▶ Parsing ──▶ Ready
//! Ready ──save──▶ Saving ──▶ Idle
//! Requesting ──LLM error──▶ Error
//! Simulated / Error ──next generate──▶ Filtering
//! ```

/// States of one batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchState {
    /// No batch in progress.
    #[default]
    Idle,

    /// Dropping lemmas whose artifact already exists.
    Filtering,

    /// Dry run: the prompt was built but never sent.
    Simulated,

    /// Waiting on the LLM.
    Requesting,

    /// Decoding the LLM reply into entries.
    Parsing,

    /// Entries are held in memory, waiting to be saved or discarded.
    Ready,

    /// Writing entries to the store.
    Saving,

    /// The LLM call failed; nothing is held.
    Error,
}

impl BatchState {
    /// Returns `true` while a request or write is in flight.
    ///
    /// ```
    /// use language_ninja::generator::BatchState;
    ///
    /// assert!(!BatchState::Idle.is_busy());
    /// assert!(BatchState::Requesting.is_busy());
    /// assert!(!BatchState::Ready.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            BatchState::Filtering | BatchState::Requesting | BatchState::Parsing | BatchState::Saving
        )
    }

    /// A short human-readable label for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            BatchState::Idle => "Idle",
            BatchState::Filtering => "Filtering",
            BatchState::Simulated => "Simulated",
            BatchState::Requesting => "Requesting",
            BatchState::Parsing => "Parsing",
            BatchState::Ready => "Ready",
            BatchState::Saving => "Saving",
            BatchState::Error => "Error",
        }
    }
}
