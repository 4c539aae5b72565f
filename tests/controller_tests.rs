//! End-to-end controller tests over scripted streams.
//!
//! These drive the real channel + run loop with a recording sink, the same
//! wiring the binary uses minus the terminal.

use tokio::sync::mpsc;

use planwatch::controller::{spawn_ticker, ControlEvent, Dashboard, Outcome, RenderSink, Snapshot};
use planwatch::reader::{spawn_source, JsonLineReader};
use planwatch::tracker::OpStatus;
use planwatch::view_state::Phase;

/// Captures the facts each snapshot carried, frame by frame.
#[derive(Default)]
struct RecordingSink {
    frames: Vec<FrameFacts>,
}

#[derive(Debug, Clone)]
struct FrameFacts {
    phase: Phase,
    completed: u64,
    expected: u64,
    is_eof: bool,
    message: String,
}

impl RenderSink for RecordingSink {
    fn render(&mut self, snap: &Snapshot<'_>) {
        self.frames.push(FrameFacts {
            phase: snap.phase,
            completed: snap.completed,
            expected: snap.expected_total,
            is_eof: snap.is_eof,
            message: snap.last_message().to_string(),
        });
    }
}

fn line_at(level: &str, kind: &str, msg: &str, rest: &str) -> String {
    format!(
        r#"{{"@level":"{level}","@message":"{msg}","@module":"terraform.ui","@timestamp":"2024-05-01T10:00:00Z","type":"{kind}"{rest}}}"#
    )
}

fn line(kind: &str, msg: &str, rest: &str) -> String {
    line_at("info", kind, msg, rest)
}

/// A realistic full run: version, refresh, plan, apply, summary, outputs.
fn full_run_script() -> Vec<String> {
    vec![
        line("version", "Terraform 1.9.0", r#","terraform":"1.9.0","ui":"1.2""#),
        line(
            "refresh_start",
            "aws_instance.web: Refreshing state...",
            r#","hook":{"resource":{"addr":"aws_instance.web","module":""}}"#,
        ),
        line(
            "refresh_complete",
            "aws_instance.web: Refresh complete",
            r#","hook":{"resource":{"addr":"aws_instance.web","module":""}}"#,
        ),
        line(
            "planned_change",
            "aws_db.main: Plan to create",
            r#","change":{"resource":{"addr":"aws_db.main","module":""},"action":"create"}"#,
        ),
        line(
            "planned_change",
            "aws_db.replica: Plan to create",
            r#","change":{"resource":{"addr":"aws_db.replica","module":""},"action":"create"}"#,
        ),
        line(
            "change_summary",
            "Plan: 2 to add, 0 to change, 0 to destroy.",
            r#","changes":{"add":2,"change":0,"import":0,"remove":0,"operation":"plan"}"#,
        ),
        line(
            "apply_start",
            "aws_db.main: Creating...",
            r#","hook":{"resource":{"addr":"aws_db.main","module":""},"action":"create"}"#,
        ),
        line(
            "apply_complete",
            "aws_db.main: Creation complete after 3s",
            r#","hook":{"resource":{"addr":"aws_db.main","module":""},"action":"create","elapsed_seconds":3}"#,
        ),
        line(
            "apply_start",
            "aws_db.replica: Creating...",
            r#","hook":{"resource":{"addr":"aws_db.replica","module":""},"action":"create"}"#,
        ),
        line(
            "apply_errored",
            "aws_db.replica: Creation errored after 1s",
            r#","hook":{"resource":{"addr":"aws_db.replica","module":""},"action":"create","elapsed_seconds":1}"#,
        ),
        line_at(
            "error",
            "diagnostic",
            "Error: quota exceeded",
            r#","diagnostic":{"severity":"error","summary":"quota exceeded","detail":"db instance limit"}"#,
        ),
        line(
            "change_summary",
            "Apply complete! Resources: 1 added.",
            r#","changes":{"add":1,"change":0,"import":0,"remove":0,"operation":"apply"}"#,
        ),
        line(
            "outputs",
            "Outputs: 1",
            r#","outputs":{"db_endpoint":{"sensitive":false,"type":"string","value":"db.internal:5432"}}"#,
        ),
    ]
}

async fn run_script(script: Vec<String>) -> (Dashboard, RecordingSink, Outcome) {
    let (tx, mut rx) = mpsc::channel(64);
    let source = script.join("\n") + "\n";
    spawn_source(JsonLineReader::new(std::io::Cursor::new(source.into_bytes())), tx);

    let mut dashboard = Dashboard::new();
    let mut sink = RecordingSink::default();
    let outcome = dashboard.run(&mut rx, &mut sink).await.unwrap();
    (dashboard, sink, outcome)
}

#[tokio::test]
async fn full_run_reaches_summary_with_correct_counts() {
    let (dashboard, sink, outcome) = run_script(full_run_script()).await;

    assert_eq!(outcome, Outcome::Completed);

    let last = sink.frames.last().unwrap();
    assert_eq!(last.phase, Phase::Summarizing);
    assert!(last.is_eof);
    assert_eq!(last.completed, 2);
    // The apply summary (1 added) overwrote the plan fallback of 2.
    assert_eq!(last.expected, 1);

    let snap = dashboard.snapshot();
    assert_eq!(snap.refresh.len(), 1);
    assert_eq!(snap.apply.len(), 2);
    assert_eq!(snap.apply[0].status, OpStatus::Completed);
    assert_eq!(snap.apply[1].status, OpStatus::Errored);
    assert_eq!(snap.planned.len(), 2);
    assert_eq!(snap.outputs.len(), 1);
    assert_eq!(snap.outputs[0].name, "db_endpoint");
    assert_eq!(snap.diags.len(), 1);
    assert!(dashboard.has_error_diags());
    assert_eq!(snap.version, Some("Terraform 1.9.0"));
    assert_eq!(
        snap.visited,
        &[
            Phase::Idle,
            Phase::Refreshing,
            Phase::Planning,
            Phase::Applying,
            Phase::Summarizing
        ]
    );
}

#[tokio::test]
async fn every_line_and_eof_produce_a_render() {
    let script = full_run_script();
    let lines = script.len();
    let (_, sink, _) = run_script(script).await;

    // Initial frame + one per line + the EOF frame.
    assert_eq!(sink.frames.len(), lines + 2);
    assert!(!sink.frames[lines].is_eof);
    assert!(sink.frames[lines + 1].is_eof);
}

#[tokio::test]
async fn interrupt_wins_over_pending_lines() {
    let (tx, mut rx) = mpsc::channel(64);
    tx.send(ControlEvent::LineReady(line(
        "version",
        "Terraform 1.9.0",
        r#","terraform":"1.9.0","ui":"1.2""#,
    )))
    .await
    .unwrap();
    tx.send(ControlEvent::UserInterrupt).await.unwrap();
    tx.send(ControlEvent::EndOfStream).await.unwrap();

    let mut dashboard = Dashboard::new();
    let mut sink = RecordingSink::default();
    let outcome = dashboard.run(&mut rx, &mut sink).await.unwrap();

    assert_eq!(outcome, Outcome::Interrupted);
    assert!(!dashboard.snapshot().is_eof);
}

#[tokio::test]
async fn malformed_line_fails_the_run() {
    let (tx, mut rx) = mpsc::channel(8);
    tx.send(ControlEvent::LineReady("{not json".into()))
        .await
        .unwrap();
    drop(tx);

    let mut dashboard = Dashboard::new();
    let mut sink = RecordingSink::default();
    assert!(dashboard.run(&mut rx, &mut sink).await.is_err());
}

#[tokio::test]
async fn ticker_refreshes_without_mutating() {
    let (tx, mut rx) = mpsc::channel(8);
    spawn_ticker(tx);

    // First real tick arrives after one second and nothing else.
    let event = rx.recv().await.unwrap();
    assert!(matches!(event, ControlEvent::TimerTick));

    let mut dashboard = Dashboard::new();
    let before = dashboard.snapshot().lines;
    dashboard.dispatch(event).unwrap();
    assert_eq!(dashboard.snapshot().lines, before);
}

#[tokio::test]
async fn saved_plan_apply_uses_fallback_total() {
    // Applying a saved plan file: no plan-phase events, apply hooks only,
    // with the summary arriving at the very end.
    let script = vec![
        line(
            "apply_start",
            "null_resource.a: Creating...",
            r#","hook":{"resource":{"addr":"null_resource.a","module":""},"action":"create"}"#,
        ),
        line(
            "apply_complete",
            "null_resource.a: Creation complete",
            r#","hook":{"resource":{"addr":"null_resource.a","module":""},"action":"create","elapsed_seconds":0}"#,
        ),
        line(
            "change_summary",
            "Apply complete! Resources: 1 added.",
            r#","changes":{"add":1,"change":0,"import":0,"remove":0,"operation":"apply"}"#,
        ),
    ];
    let (dashboard, _, outcome) = run_script(script).await;

    assert_eq!(outcome, Outcome::Completed);
    let snap = dashboard.snapshot();
    assert_eq!(snap.completed, 1);
    assert_eq!(snap.expected_total, 1);
    assert_eq!(
        snap.visited,
        &[Phase::Idle, Phase::Applying, Phase::Summarizing]
    );
}
