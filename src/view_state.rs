//! Dashboard phase machine.
//!
//! Strictly forward-progressing: no transition returns to an earlier phase,
//! and any phase may skip straight to `Summarizing` when a run has nothing
//! to do. Transitions are driven by event content, not arrival order,
//! because a run can legitimately skip refresh, plan, or apply entirely.

use crate::event::{Event, Hook, Payload, SummaryOperation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Refreshing,
    Planning,
    Applying,
    Summarizing,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Idle => write!(f, "IDLE"),
            Phase::Refreshing => write!(f, "REFRESH"),
            Phase::Planning => write!(f, "PLAN"),
            Phase::Applying => write!(f, "APPLY"),
            Phase::Summarizing => write!(f, "SUMMARY"),
        }
    }
}

fn is_apply_summary(event: &Event) -> bool {
    matches!(
        &event.payload,
        Payload::ChangeSummary(s) if s.operation == SummaryOperation::Apply
    )
}

impl Phase {
    /// Returns the phase after `event` and whether it changed.
    pub fn next(self, event: &Event) -> (Phase, bool) {
        let next = match self {
            Phase::Idle => match &event.payload {
                Payload::Hook(Hook::RefreshStart(_)) => Phase::Refreshing,
                Payload::PlannedChange(_) => Phase::Planning,
                Payload::Hook(Hook::OperationStart(_)) => Phase::Applying,
                _ if is_apply_summary(event) => Phase::Summarizing,
                _ => self,
            },
            Phase::Refreshing => match &event.payload {
                Payload::PlannedChange(_) => Phase::Planning,
                _ if is_apply_summary(event) => Phase::Summarizing,
                _ => self,
            },
            Phase::Planning => match &event.payload {
                Payload::Hook(Hook::OperationStart(_)) => Phase::Applying,
                _ if is_apply_summary(event) => Phase::Summarizing,
                _ => self,
            },
            // Any summary reaching the apply phase closes it; the plan
            // summary was consumed long before apply hooks began.
            Phase::Applying => match &event.payload {
                Payload::ChangeSummary(_) => Phase::Summarizing,
                _ => self,
            },
            Phase::Summarizing => self,
        };
        (next, next != self)
    }
}
