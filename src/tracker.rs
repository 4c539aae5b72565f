//! Per-resource operation lifecycle tracking.
//!
//! Two independent collections exist per run: one for refresh operations and
//! one for apply operations. Both are append-only; records are identified by
//! a `{module, resource address, action}` locator and updated in place as
//! lifecycle hooks arrive.

use chrono::{DateTime, Duration, Utc};

use crate::event::ResourceAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpStatus {
    Started,
    Completed,
    Errored,
}

impl OpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpStatus::Started => "start",
            OpStatus::Completed => "complete",
            OpStatus::Errored => "error",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            OpStatus::Started => "🕛",
            OpStatus::Completed => "✅",
            OpStatus::Errored => "❌",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, OpStatus::Started)
    }
}

/// Identity key for one operation lifecycle. The action is part of the key:
/// a replace legitimately runs delete and create against the same address at
/// the same time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpLocator {
    pub module: String,
    pub resource_addr: String,
    pub action: String,
}

impl OpLocator {
    pub fn new(
        module: impl Into<String>,
        resource_addr: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            module: module.into(),
            resource_addr: resource_addr.into(),
            action: action.into(),
        }
    }

    /// Refresh hooks carry no action of their own.
    pub fn refresh(addr: &ResourceAddr) -> Self {
        Self::new(addr.module.clone(), addr.addr.clone(), "refresh")
    }
}

#[derive(Debug, Clone)]
pub struct OpRecord {
    /// 1-based assignment order within the collection. Never reused.
    pub index: usize,
    pub raw_addr: ResourceAddr,
    pub locator: OpLocator,
    pub status: OpStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

impl OpRecord {
    /// Elapsed time, truncated to whole seconds. Open records measure
    /// against `now`.
    pub fn duration(&self, now: DateTime<Utc>) -> Duration {
        let end = self.end_time.unwrap_or(now);
        Duration::seconds((end - self.start_time).num_seconds())
    }
}

/// Ordered, append-only collection of operation records.
#[derive(Debug, Default)]
pub struct OpCollection {
    records: Vec<OpRecord>,
}

impl OpCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new `Started` record and returns its 1-based index.
    /// Duplicate locators are accepted silently; see [`OpCollection::update`]
    /// for which of them later lookups hit.
    pub fn insert(
        &mut self,
        raw_addr: ResourceAddr,
        locator: OpLocator,
        start_time: DateTime<Utc>,
    ) -> usize {
        let index = self.records.len() + 1;
        self.records.push(OpRecord {
            index,
            raw_addr,
            locator,
            status: OpStatus::Started,
            start_time,
            end_time: None,
        });
        index
    }

    /// Mutates the **first** record matching `locator`, in insertion order,
    /// and returns it. First-match is load-bearing when duplicate locators
    /// exist; do not switch to last-match without flagging the behavior
    /// change. `None` means the producer sent a lifecycle event for an
    /// operation that never started here; callers log it and continue.
    pub fn update(
        &mut self,
        locator: &OpLocator,
        status: OpStatus,
        end_time: Option<DateTime<Utc>>,
    ) -> Option<&OpRecord> {
        let record = self.records.iter_mut().find(|r| &r.locator == locator)?;
        record.status = status;
        if end_time.is_some() {
            record.end_time = end_time;
        }
        Some(record)
    }

    pub fn find(&self, locator: &OpLocator) -> Option<&OpRecord> {
        self.records.iter().find(|r| &r.locator == locator)
    }

    pub fn records(&self) -> &[OpRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
