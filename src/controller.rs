//! Dashboard controller: the single-threaded cooperative event loop.
//!
//! Line reads, the periodic duration tick, and terminal input are merged
//! into one serialized stream of [`ControlEvent`]s over an mpsc channel; the
//! controller owns all mutable state (tracker collections, progress counter,
//! phase machine) and mutates it only from [`Dashboard::dispatch`]. Ticks
//! never touch decode/tracker state, they only trigger a fresh snapshot so
//! the render sink can recompute displayed durations.

use std::io;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::PlanwatchError;
use crate::event::{
    decode, ChangeAction, Diagnostic, Event, Hook, Level, Payload, ResourceAddr,
};
use crate::progress::ProgressCounter;
use crate::tracker::{OpCollection, OpLocator, OpRecord, OpStatus};
use crate::view_state::Phase;

// ─────────────────────────────────────────────────────────────────────────────
// Control events and outcomes
// ─────────────────────────────────────────────────────────────────────────────

/// Everything that can wake the loop, as one explicit enum consumed by one
/// dispatcher.
#[derive(Debug)]
pub enum ControlEvent {
    /// The line source produced one complete raw line.
    LineReady(String),
    /// The line source failed with something other than end-of-stream.
    LineError(io::Error),
    /// Clean end of stream; the success path.
    EndOfStream,
    /// 1-second duration-refresh tick. Carries no tracker work.
    TimerTick,
    /// Deliberate user cancel. Halts immediately; in-flight reads are
    /// abandoned, not drained.
    UserInterrupt,
    /// Terminal geometry changed; the sink re-measures on the next render.
    WindowResize(u16, u16),
}

/// How a run ended. Hard failures travel as `Err(PlanwatchError)` instead so
/// callers can map the three cases to distinct exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Interrupted,
}

/// Dispatcher verdict for a single control event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Eof,
    Interrupted,
}

// ─────────────────────────────────────────────────────────────────────────────
// Snapshot and sink seam
// ─────────────────────────────────────────────────────────────────────────────

/// A non-`action` output reported at the end of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecord {
    pub name: String,
    pub sensitive: bool,
    pub type_json: Value,
    pub value: Value,
}

/// One planned change, kept for the plan-phase table.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRecord {
    pub resource: ResourceAddr,
    pub action: ChangeAction,
    pub previous: Option<ResourceAddr>,
    pub reason: Option<String>,
}

/// Immutable render input. Borrows the controller state for one draw.
pub struct Snapshot<'a> {
    pub phase: Phase,
    pub visited: &'a [Phase],
    pub refresh: &'a [OpRecord],
    pub apply: &'a [OpRecord],
    pub planned: &'a [PlanRecord],
    pub outputs: &'a [OutputRecord],
    pub diags: &'a [Diagnostic],
    pub completed: u64,
    pub expected_total: u64,
    pub ratio: f64,
    pub is_eof: bool,
    /// True when this snapshot is the first after a phase transition; the
    /// sink drops any cached column layout.
    pub phase_changed: bool,
    pub version: Option<&'a str>,
    /// The event that produced this snapshot; `None` for pure tick renders.
    pub last_event: Option<&'a Event>,
    /// Count of decoded lines so far. Lets sinks tell a new event apart
    /// from a tick re-render of the previous one.
    pub lines: u64,
    pub elapsed: StdDuration,
}

impl Snapshot<'_> {
    pub fn last_message(&self) -> &str {
        self.last_event.map(|e| e.envelope.message.as_str()).unwrap_or("")
    }
}

/// Consumes snapshots synchronously. A slow sink stalls ingestion; that is
/// an accepted tradeoff, not something the loop mitigates.
pub trait RenderSink {
    fn render(&mut self, snapshot: &Snapshot<'_>);
}

// ─────────────────────────────────────────────────────────────────────────────
// Controller
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Dashboard {
    refresh_ops: OpCollection,
    apply_ops: OpCollection,
    counter: ProgressCounter,
    phase: Phase,
    visited: Vec<Phase>,
    planned: Vec<PlanRecord>,
    outputs: Vec<OutputRecord>,
    diags: Vec<Diagnostic>,
    version: Option<String>,
    last_event: Option<Event>,
    lines: u64,
    is_eof: bool,
    phase_changed: bool,
    started: std::time::Instant,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            refresh_ops: OpCollection::new(),
            apply_ops: OpCollection::new(),
            counter: ProgressCounter::new(),
            phase: Phase::Idle,
            visited: vec![Phase::Idle],
            planned: Vec::new(),
            outputs: Vec::new(),
            diags: Vec::new(),
            version: None,
            last_event: None,
            lines: 0,
            is_eof: false,
            phase_changed: false,
            started: std::time::Instant::now(),
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            visited: &self.visited,
            refresh: self.refresh_ops.records(),
            apply: self.apply_ops.records(),
            planned: &self.planned,
            outputs: &self.outputs,
            diags: &self.diags,
            completed: self.counter.completed(),
            expected_total: self.counter.expected_total(),
            ratio: self.counter.ratio(),
            is_eof: self.is_eof,
            phase_changed: self.phase_changed,
            version: self.version.as_deref(),
            last_event: self.last_event.as_ref(),
            lines: self.lines,
            elapsed: self.started.elapsed(),
        }
    }

    pub fn has_error_diags(&self) -> bool {
        self.diags
            .iter()
            .any(|d| d.severity == crate::event::Severity::Error)
    }

    pub fn refresh_ops(&self) -> &OpCollection {
        &self.refresh_ops
    }

    pub fn apply_ops(&self) -> &OpCollection {
        &self.apply_ops
    }

    /// Applies one control event. Line-derived mutations happen here and
    /// only here, in stream arrival order.
    pub fn dispatch(&mut self, event: ControlEvent) -> Result<Step, PlanwatchError> {
        match event {
            ControlEvent::LineReady(line) => {
                let event = decode(&line)?;
                debug!(kind = ?event.kind, "line decoded");
                self.apply_event(event);
                Ok(Step::Continue)
            }
            ControlEvent::LineError(err) => Err(PlanwatchError::Stream(err)),
            ControlEvent::EndOfStream => {
                info!("log stream reached EOF");
                self.is_eof = true;
                Ok(Step::Eof)
            }
            ControlEvent::TimerTick => Ok(Step::Continue),
            ControlEvent::UserInterrupt => {
                warn!("interrupted by user");
                Ok(Step::Interrupted)
            }
            ControlEvent::WindowResize(_, _) => Ok(Step::Continue),
        }
    }

    /// Drains the merged control-event channel until EOF, interrupt or a
    /// fatal error, rendering a fresh snapshot after every event.
    pub async fn run(
        &mut self,
        events: &mut mpsc::Receiver<ControlEvent>,
        sink: &mut dyn RenderSink,
    ) -> Result<Outcome, PlanwatchError> {
        sink.render(&self.snapshot());

        while let Some(event) = events.recv().await {
            match self.dispatch(event)? {
                Step::Continue => {
                    sink.render(&self.snapshot());
                    self.phase_changed = false;
                }
                Step::Eof => {
                    sink.render(&self.snapshot());
                    return Ok(Outcome::Completed);
                }
                Step::Interrupted => return Ok(Outcome::Interrupted),
            }
        }

        // All senders dropped without a terminal event; treat it like EOF.
        Ok(Outcome::Completed)
    }

    fn apply_event(&mut self, event: Event) {
        let ts = event.envelope.timestamp;

        match &event.payload {
            Payload::Version(_) => {
                self.version = Some(event.envelope.message.clone());
            }
            Payload::Log(_) => {}
            Payload::Diagnostic(diag) => {
                if matches!(event.envelope.level, Level::Warn | Level::Error) {
                    self.diags.push(diag.clone());
                }
            }
            Payload::ResourceDrift(_) => {}
            Payload::PlannedChange(change) => {
                self.counter.note_planned(change.action);
                self.planned.push(PlanRecord {
                    resource: change.resource.clone(),
                    action: change.action,
                    previous: change.previous_resource.clone(),
                    reason: change.reason.clone(),
                });
            }
            Payload::ChangeSummary(summary) => {
                debug!(
                    add = summary.add,
                    change = summary.change,
                    import = summary.import,
                    remove = summary.remove,
                    "change summary"
                );
                self.counter.note_summary(summary);
            }
            Payload::Outputs(outputs) => {
                for (name, output) in outputs {
                    if output.action.is_some() {
                        continue;
                    }
                    self.outputs.push(OutputRecord {
                        name: name.clone(),
                        sensitive: output.sensitive,
                        type_json: output.r#type.clone(),
                        value: output.value.clone(),
                    });
                }
            }
            Payload::Hook(hook) => self.apply_hook(ts, hook),
        }

        let (next, changed) = self.phase.next(&event);
        if changed {
            info!(old = %self.phase, new = %next, "phase change");
            self.phase = next;
            self.visited.push(next);
            self.phase_changed = true;
        }

        self.last_event = Some(event);
        self.lines += 1;
    }

    fn apply_hook(&mut self, ts: DateTime<Utc>, hook: &Hook) {
        match hook {
            Hook::RefreshStart(h) => {
                let locator = OpLocator::refresh(&h.resource);
                self.refresh_ops.insert(h.resource.clone(), locator, ts);
            }
            Hook::RefreshComplete(h) => {
                let locator = OpLocator::refresh(&h.resource);
                if self
                    .refresh_ops
                    .update(&locator, OpStatus::Completed, Some(ts))
                    .is_none()
                {
                    Self::warn_miss("refresh_complete", &locator);
                }
            }
            Hook::OperationStart(h) => {
                let locator =
                    OpLocator::new(h.resource.module.clone(), h.resource.addr.clone(), h.action.as_str());
                self.apply_ops.insert(h.resource.clone(), locator, ts);
            }
            Hook::OperationProgress(_) => {}
            Hook::OperationComplete(h) => {
                self.finish_apply(ts, &h.resource, h.action, OpStatus::Completed);
            }
            Hook::OperationErrored(h) => {
                self.finish_apply(ts, &h.resource, h.action, OpStatus::Errored);
            }
            Hook::ProvisionStart(_)
            | Hook::ProvisionProgress(_)
            | Hook::ProvisionComplete(_)
            | Hook::ProvisionErrored(_) => {}
        }
    }

    fn finish_apply(
        &mut self,
        ts: DateTime<Utc>,
        resource: &ResourceAddr,
        action: ChangeAction,
        status: OpStatus,
    ) {
        let locator = OpLocator::new(resource.module.clone(), resource.addr.clone(), action.as_str());
        if self.apply_ops.update(&locator, status, Some(ts)).is_some() {
            self.counter.note_done();
        } else {
            Self::warn_miss(status.as_str(), &locator);
        }
    }

    fn warn_miss(stage: &str, locator: &OpLocator) {
        warn!(
            stage,
            module = %locator.module,
            addr = %locator.resource_addr,
            action = %locator.action,
            "lifecycle event for an operation that never started"
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tick source
// ─────────────────────────────────────────────────────────────────────────────

/// Feeds a 1-second [`ControlEvent::TimerTick`] into the merged channel so
/// open-operation durations keep moving between lines. Exits when the
/// receiver is gone.
pub fn spawn_ticker(tx: mpsc::Sender<ControlEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(StdDuration::from_secs(1));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick fires immediately; skip it.
        interval.tick().await;
        loop {
            interval.tick().await;
            if tx.send(ControlEvent::TimerTick).await.is_err() {
                break;
            }
        }
    })
}
