//! Expected-vs-completed operation counting for the apply progress bar.

use crate::event::{ChangeAction, ChangeSummary, SummaryOperation};

/// Derives the expected apply operation total from whichever signal arrives
/// first: planned-change events (a fallback, needed when applying a saved
/// plan file where the producer emits no apply-phase summary up front) or
/// the authoritative apply-phase change summary, which overwrites any
/// fallback accumulation.
#[derive(Debug, Default)]
pub struct ProgressCounter {
    expected: u64,
    completed: u64,
    authoritative: bool,
}

fn weight(action: ChangeAction) -> u64 {
    match action {
        ChangeAction::Create
        | ChangeAction::Delete
        | ChangeAction::Update
        | ChangeAction::Import => 1,
        // A replace runs delete + create.
        ChangeAction::Replace => 2,
        _ => 0,
    }
}

impl ProgressCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn note_planned(&mut self, action: ChangeAction) {
        if !self.authoritative {
            self.expected += weight(action);
        }
    }

    pub fn note_summary(&mut self, summary: &ChangeSummary) {
        // The plan-phase summary is informational only.
        if summary.operation != SummaryOperation::Plan {
            self.expected = summary.total();
            self.authoritative = true;
        }
    }

    /// One apply-collection record reached `Completed` or `Errored`.
    pub fn note_done(&mut self) {
        self.completed += 1;
    }

    pub fn expected_total(&self) -> u64 {
        self.expected
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Completion ratio in `0.0..=1.0`, clamped for display. An unknown
    /// total reads as zero progress.
    pub fn ratio(&self) -> f64 {
        if self.expected == 0 {
            if self.authoritative {
                // Nothing to do is 100% done.
                return 1.0;
            }
            return 0.0;
        }
        (self.completed as f64 / self.expected as f64).min(1.0)
    }
}
