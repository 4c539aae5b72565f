//! Line-oriented renderer for non-interactive terminals and piped output.
//!
//! Prints one line per decoded event, in arrival order. Ticks and resizes
//! re-deliver the previous snapshot; those are suppressed by comparing the
//! decoded-line counter, so redirected output never contains duplicates.

use std::io::Write;

use crate::controller::{RenderSink, Snapshot};
use crate::event::{Hook, Level, Payload, Severity};
use crate::tracker::OpLocator;

pub struct PlainSink<W: Write> {
    out: W,
    last_lines: u64,
}

impl<W: Write> PlainSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, last_lines: 0 }
    }
}

fn severity_prefix(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "[ERROR] ",
        Severity::Warning => "[WARN] ",
        Severity::Unknown => "",
    }
}

fn level_prefix(level: Level) -> &'static str {
    match level {
        Level::Warn => "[WARN] ",
        Level::Error => "[ERROR] ",
        _ => "",
    }
}

/// `[ i/total]` progress tag for apply-lifecycle lines, width-padded to the
/// expected total's digit count. Falls back to the bare index while the
/// expected total is still unknown. Empty when the operation is not in the
/// collection.
fn apply_tag(snap: &Snapshot<'_>, locator: &OpLocator) -> String {
    let total = snap.expected_total;
    match snap.apply.iter().find(|r| &r.locator == locator) {
        Some(rec) if total == 0 => format!("[{}] ", rec.index),
        Some(rec) => {
            let width = total.to_string().len();
            format!("[{:>width$}/{total}] ", rec.index)
        }
        None => String::new(),
    }
}

/// Resource and action for the hook subtypes that carry the progress tag.
fn operation_parts(hook: &Hook) -> Option<(&crate::event::ResourceAddr, crate::event::ChangeAction)> {
    match hook {
        Hook::OperationStart(h) => Some((&h.resource, h.action)),
        Hook::OperationProgress(h) => Some((&h.resource, h.action)),
        Hook::OperationComplete(h) => Some((&h.resource, h.action)),
        Hook::OperationErrored(h) => Some((&h.resource, h.action)),
        _ => None,
    }
}

fn format_line(snap: &Snapshot<'_>) -> Option<String> {
    let event = snap.last_event?;
    let msg = event.envelope.message.as_str();

    let line = match &event.payload {
        Payload::Log(extra) => {
            let mut line = format!("{}{msg}", level_prefix(event.envelope.level));
            for (k, v) in extra {
                line.push_str(&format!(" {k}={v}"));
            }
            line
        }
        Payload::Diagnostic(diag) => {
            let mut line = format!("{}Summary: {}.", severity_prefix(diag.severity), diag.summary);
            if !diag.detail.is_empty() {
                line.push_str(&format!(" Detail: {}", diag.detail));
            }
            line
        }
        Payload::Outputs(outputs) => {
            let mut line = msg.to_string();
            for (name, output) in outputs {
                if output.action.is_some() {
                    continue;
                }
                if output.sensitive {
                    line.push_str(&format!(" {name}=(sensitive)"));
                } else {
                    line.push_str(&format!(" {name}={}", output.value));
                }
            }
            line
        }
        Payload::Hook(hook) => match operation_parts(hook) {
            Some((resource, action)) => {
                let loc =
                    OpLocator::new(resource.module.clone(), resource.addr.clone(), action.as_str());
                format!("{}{msg}", apply_tag(snap, &loc))
            }
            None => format!("{}{msg}", level_prefix(event.envelope.level)),
        },
        _ => format!("{}{msg}", level_prefix(event.envelope.level)),
    };
    Some(line)
}

impl<W: Write> RenderSink for PlainSink<W> {
    fn render(&mut self, snapshot: &Snapshot<'_>) {
        // Same line count means a tick or resize re-render; nothing new.
        if snapshot.lines == self.last_lines {
            return;
        }
        self.last_lines = snapshot.lines;

        if let Some(line) = format_line(snapshot) {
            let _ = writeln!(self.out, "{line}");
            let _ = self.out.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{ControlEvent, Dashboard};

    fn render_lines(raw: &[&str]) -> String {
        let mut dash = Dashboard::new();
        let mut buf = Vec::new();
        {
            let mut sink = PlainSink::new(&mut buf);
            sink.render(&dash.snapshot());
            for line in raw {
                dash.dispatch(ControlEvent::LineReady(line.to_string()))
                    .unwrap();
                sink.render(&dash.snapshot());
            }
            // A trailing tick must not duplicate the last line.
            dash.dispatch(ControlEvent::TimerTick).unwrap();
            sink.render(&dash.snapshot());
        }
        String::from_utf8(buf).unwrap()
    }

    fn line(kind: &str, rest: &str) -> String {
        format!(
            r#"{{"@level":"info","@message":"{kind} happened","@module":"","@timestamp":"2024-05-01T10:00:00Z","type":"{kind}"{rest}}}"#
        )
    }

    #[test]
    fn one_output_line_per_event_no_tick_duplicates() {
        let out = render_lines(&[
            &line("version", r#","terraform":"1.9.0","ui":"1.2""#),
            &line("log", r#","foo":"bar""#),
        ]);
        assert_eq!(out.lines().count(), 2);
        assert!(out.contains("log happened foo=\"bar\""));
    }

    #[test]
    fn progress_tag_denominator_is_the_expected_total() {
        // Three planned creates set the expected total; only one operation
        // has started, so the tag must read 1-of-3, not 1-of-1.
        let planned: Vec<String> = ["a.one", "a.two", "a.three"]
            .iter()
            .map(|addr| {
                line(
                    "planned_change",
                    &format!(r#","change":{{"resource":{{"addr":"{addr}","module":""}},"action":"create"}}"#),
                )
            })
            .collect();
        let start = line(
            "apply_start",
            r#","hook":{"resource":{"addr":"a.one","module":""},"action":"create"}"#,
        );
        let mut raw: Vec<&str> = planned.iter().map(String::as_str).collect();
        raw.push(&start);

        let out = render_lines(&raw);
        assert!(out.contains("[1/3] apply_start happened"), "got: {out}");
    }

    #[test]
    fn unknown_total_falls_back_to_bare_index() {
        let start = line(
            "apply_start",
            r#","hook":{"resource":{"addr":"a.b","module":""},"action":"create"}"#,
        );
        let done = line(
            "apply_complete",
            r#","hook":{"resource":{"addr":"a.b","module":""},"action":"create","elapsed_seconds":1}"#,
        );
        let out = render_lines(&[&start, &done]);
        assert!(out.contains("[1] apply_start happened"));
        assert!(out.contains("[1] apply_complete happened"));
    }

    #[test]
    fn progress_hooks_carry_the_tag_too() {
        let planned = line(
            "planned_change",
            r#","change":{"resource":{"addr":"a.b","module":""},"action":"create"}"#,
        );
        let start = line(
            "apply_start",
            r#","hook":{"resource":{"addr":"a.b","module":""},"action":"create"}"#,
        );
        let progress = line(
            "apply_progress",
            r#","hook":{"resource":{"addr":"a.b","module":""},"action":"create","elapsed_seconds":10}"#,
        );
        let out = render_lines(&[&planned, &start, &progress]);
        assert!(out.contains("[1/1] apply_progress happened"));
    }

    #[test]
    fn diagnostics_are_prefixed_by_severity() {
        let diag = r#"{"@level":"error","@message":"m","@module":"","@timestamp":"2024-05-01T10:00:00Z","type":"diagnostic","diagnostic":{"severity":"error","summary":"boom","detail":"ka"}}"#;
        let out = render_lines(&[diag]);
        assert!(out.contains("[ERROR] Summary: boom. Detail: ka"));
    }

    #[test]
    fn sensitive_outputs_are_masked() {
        let outputs = line(
            "outputs",
            r#","outputs":{"ip":{"sensitive":false,"type":"string","value":"10.0.0.1"},"token":{"sensitive":true,"type":"string","value":"hunter2"}}"#,
        );
        let out = render_lines(&[&outputs]);
        assert!(out.contains("ip=\"10.0.0.1\""));
        assert!(out.contains("token=(sensitive)"));
        assert!(!out.contains("hunter2"));
    }
}
