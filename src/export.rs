//! CSV export of finished operation lifecycles.
//!
//! Rows cover terminal records only (completed or errored); operations still
//! open when the run ends are omitted. Refresh records come first, then
//! apply records, each group in insertion order.

use serde_json::Value;

use crate::tracker::{OpCollection, OpRecord};

const HEADER: &str = "Start Timestamp,End Timestamp,Stage,Action,Module,Resource Type,Resource Name,Resource Key,Status,Duration (sec)";

fn field(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn key_display(key: &Value) -> String {
    match key {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn row(stage: &str, rec: &OpRecord) -> String {
    // Terminal records always carry an end time; fall back to the start
    // time rather than panicking if the producer omitted it.
    let end = rec.end_time.unwrap_or(rec.start_time);
    [
        rec.start_time.timestamp().to_string(),
        end.timestamp().to_string(),
        stage.to_string(),
        field(&rec.locator.action),
        field(&rec.locator.module),
        field(&rec.raw_addr.resource_type),
        field(&rec.raw_addr.resource_name),
        field(&key_display(&rec.raw_addr.resource_key)),
        rec.status.as_str().to_string(),
        (end - rec.start_time).num_seconds().to_string(),
    ]
    .join(",")
}

/// Renders both collections as one CSV document, header included.
pub fn to_csv(refresh: &OpCollection, apply: &OpCollection) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for (stage, ops) in [("refresh", refresh), ("apply", apply)] {
        for rec in ops.records().iter().filter(|r| r.status.is_terminal()) {
            out.push_str(&row(stage, rec));
            out.push('\n');
        }
    }
    out
}
