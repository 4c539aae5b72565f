//! Typed events for the Terraform/OpenTofu machine-readable UI stream.
//!
//! Every line of `terraform apply -json` output is one JSON object carrying a
//! common envelope (`@level`, `@message`, `@module`, `@timestamp`) plus a
//! `type` discriminator that selects the payload shape. The vocabulary is
//! closed and versioned by the producer, so an unrecognized `type` means we
//! are talking to an incompatible producer and is a decode failure, not a
//! skippable line.
//!
//! Decoding is two-pass: the envelope and discriminator are read first, then
//! the payload is deserialized from the same object. Hook messages carry a
//! secondary subtype (e.g. `apply_start` vs `refresh_start`) that is the
//! outer `type` itself; the hook body sits under the `hook` key.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Decode failure for one stream line.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The line is not valid JSON, or a known payload has the wrong shape.
    #[error("malformed JSON log line: {0}")]
    Malformed(#[source] serde_json::Error),

    /// Valid JSON with a `type` outside the producer's closed vocabulary.
    /// Treated as a producer/consumer version mismatch.
    #[error("unrecognized message type {kind:?}")]
    UnknownKind { kind: String },
}

// ─────────────────────────────────────────────────────────────────────────────
// Envelope
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

/// Fields present on every stream line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "@level")]
    pub level: Level,
    #[serde(rename = "@message")]
    pub message: String,
    #[serde(rename = "@module", default)]
    pub module: String,
    #[serde(rename = "@timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// The `type` discriminator. Closed vocabulary; see module docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Version,
    Log,
    Diagnostic,
    ResourceDrift,
    PlannedChange,
    ChangeSummary,
    Outputs,
    ApplyStart,
    ApplyProgress,
    ApplyComplete,
    ApplyErrored,
    EphemeralOpStart,
    EphemeralOpProgress,
    EphemeralOpComplete,
    EphemeralOpErrored,
    ProvisionStart,
    ProvisionProgress,
    ProvisionComplete,
    ProvisionErrored,
    RefreshStart,
    RefreshComplete,
}

// ─────────────────────────────────────────────────────────────────────────────
// Payload shapes
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VersionInfo {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub terraform: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tofu: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ui: String,
}

/// One resource instance address, as the producer spells it.
///
/// `resource_key` is a dynamically-typed scalar (string, number or null) and
/// is kept verbatim for display and export.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceAddr {
    #[serde(default)]
    pub addr: String,
    #[serde(default)]
    pub module: String,
    #[serde(default)]
    pub resource: String,
    #[serde(default)]
    pub implied_provider: String,
    #[serde(default)]
    pub resource_type: String,
    #[serde(default)]
    pub resource_name: String,
    #[serde(default)]
    pub resource_key: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    #[serde(rename = "noop")]
    NoOp,
    Move,
    #[serde(rename = "remove")]
    Forget,
    Create,
    Read,
    Update,
    Replace,
    Delete,
    Import,
    Open,
    Renew,
    Close,
}

impl ChangeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeAction::NoOp => "noop",
            ChangeAction::Move => "move",
            ChangeAction::Forget => "remove",
            ChangeAction::Create => "create",
            ChangeAction::Read => "read",
            ChangeAction::Update => "update",
            ChangeAction::Replace => "replace",
            ChangeAction::Delete => "delete",
            ChangeAction::Import => "import",
            ChangeAction::Open => "open",
            ChangeAction::Renew => "renew",
            ChangeAction::Close => "close",
        }
    }
}

/// Payload of `planned_change` and `resource_drift` lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceChange {
    pub resource: ResourceAddr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_resource: Option<ResourceAddr>,
    pub action: ChangeAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryOperation {
    Plan,
    Apply,
    Destroy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub add: u64,
    pub change: u64,
    #[serde(default)]
    pub import: u64,
    pub remove: u64,
    pub operation: SummaryOperation,
}

impl ChangeSummary {
    /// Total operation count the apply phase is expected to perform.
    pub fn total(&self) -> u64 {
        self.add + self.change + self.import + self.remove
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pos {
    pub line: u64,
    pub column: u64,
    pub byte: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRange {
    pub filename: String,
    pub start: Pos,
    pub end: Pos,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<SourceRange>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OutputChange {
    #[serde(default)]
    pub sensitive: bool,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub r#type: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ChangeAction>,
}

pub type Outputs = BTreeMap<String, OutputChange>;

// ─────────────────────────────────────────────────────────────────────────────
// Hook payloads
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationStart {
    pub resource: ResourceAddr,
    pub action: ChangeAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationProgress {
    pub resource: ResourceAddr,
    pub action: ChangeAction,
    pub elapsed_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationComplete {
    pub resource: ResourceAddr,
    pub action: ChangeAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_value: Option<String>,
    pub elapsed_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationErrored {
    pub resource: ResourceAddr,
    pub action: ChangeAction,
    pub elapsed_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisionStart {
    pub resource: ResourceAddr,
    pub provisioner: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisionProgress {
    pub resource: ResourceAddr,
    pub provisioner: String,
    #[serde(default)]
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisionComplete {
    pub resource: ResourceAddr,
    pub provisioner: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisionErrored {
    pub resource: ResourceAddr,
    pub provisioner: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshStart {
    pub resource: ResourceAddr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshComplete {
    pub resource: ResourceAddr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_value: Option<String>,
}

/// Hook body variants. The subtype is carried by the outer [`Kind`]; both
/// `apply_*` and `ephemeral_op_*` lines decode to the `Operation*` variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Hook {
    OperationStart(OperationStart),
    OperationProgress(OperationProgress),
    OperationComplete(OperationComplete),
    OperationErrored(OperationErrored),
    ProvisionStart(ProvisionStart),
    ProvisionProgress(ProvisionProgress),
    ProvisionComplete(ProvisionComplete),
    ProvisionErrored(ProvisionErrored),
    RefreshStart(RefreshStart),
    RefreshComplete(RefreshComplete),
}

// ─────────────────────────────────────────────────────────────────────────────
// Event
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Version(VersionInfo),
    /// Free-form log line. Holds every top-level key that is not part of the
    /// envelope, in producer order; used only for display.
    Log(Map<String, Value>),
    Diagnostic(Diagnostic),
    ResourceDrift(ResourceChange),
    PlannedChange(ResourceChange),
    ChangeSummary(ChangeSummary),
    Outputs(Outputs),
    Hook(Hook),
}

/// One decoded stream line.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub envelope: Envelope,
    pub kind: Kind,
    pub payload: Payload,
}

impl Event {
    pub fn hook(&self) -> Option<&Hook> {
        match &self.payload {
            Payload::Hook(h) => Some(h),
            _ => None,
        }
    }

    /// Re-encodes the event into the producer's wire shape. Lossy only in
    /// key ordering of `Outputs`; `decode(encode(e)) == e` holds for every
    /// decodable line.
    pub fn encode(&self) -> Result<Value, serde_json::Error> {
        let mut obj = match serde_json::to_value(&self.envelope)? {
            Value::Object(m) => m,
            _ => Map::new(),
        };
        obj.insert("type".to_string(), serde_json::to_value(self.kind)?);

        match &self.payload {
            Payload::Version(v) => {
                if let Value::Object(m) = serde_json::to_value(v)? {
                    obj.extend(m);
                }
            }
            Payload::Log(extra) => {
                // Envelope fields win on collision, matching the producer.
                for (k, v) in extra {
                    obj.entry(k.clone()).or_insert_with(|| v.clone());
                }
            }
            Payload::Diagnostic(d) => {
                obj.insert("diagnostic".to_string(), serde_json::to_value(d)?);
            }
            Payload::ResourceDrift(c) | Payload::PlannedChange(c) => {
                obj.insert("change".to_string(), serde_json::to_value(c)?);
            }
            Payload::ChangeSummary(s) => {
                obj.insert("changes".to_string(), serde_json::to_value(s)?);
            }
            Payload::Outputs(o) => {
                obj.insert("outputs".to_string(), serde_json::to_value(o)?);
            }
            Payload::Hook(h) => {
                let body = match h {
                    Hook::OperationStart(x) => serde_json::to_value(x)?,
                    Hook::OperationProgress(x) => serde_json::to_value(x)?,
                    Hook::OperationComplete(x) => serde_json::to_value(x)?,
                    Hook::OperationErrored(x) => serde_json::to_value(x)?,
                    Hook::ProvisionStart(x) => serde_json::to_value(x)?,
                    Hook::ProvisionProgress(x) => serde_json::to_value(x)?,
                    Hook::ProvisionComplete(x) => serde_json::to_value(x)?,
                    Hook::ProvisionErrored(x) => serde_json::to_value(x)?,
                    Hook::RefreshStart(x) => serde_json::to_value(x)?,
                    Hook::RefreshComplete(x) => serde_json::to_value(x)?,
                };
                obj.insert("hook".to_string(), body);
            }
        }

        Ok(Value::Object(obj))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoding
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct HookWrap<T> {
    hook: T,
}

fn payload_field<T: DeserializeOwned>(root: &Value, field: &'static str) -> Result<T, DecodeError> {
    match root.get(field) {
        Some(v) => serde_json::from_value(v.clone()).map_err(DecodeError::Malformed),
        None => {
            // Force a descriptive serde error for the missing key.
            Err(DecodeError::Malformed(serde::de::Error::custom(format!(
                "missing field `{field}`"
            ))))
        }
    }
}

fn hook_payload<T: DeserializeOwned>(root: &Value) -> Result<Hook, DecodeError>
where
    T: Into<Hook>,
{
    let wrap: HookWrap<T> =
        serde_json::from_value(root.clone()).map_err(DecodeError::Malformed)?;
    Ok(wrap.hook.into())
}

macro_rules! impl_into_hook {
    ($($ty:ident),+ $(,)?) => {
        $(impl From<$ty> for Hook {
            fn from(v: $ty) -> Hook {
                Hook::$ty(v)
            }
        })+
    };
}

impl_into_hook!(
    OperationStart,
    OperationProgress,
    OperationComplete,
    OperationErrored,
    ProvisionStart,
    ProvisionProgress,
    ProvisionComplete,
    ProvisionErrored,
    RefreshStart,
    RefreshComplete,
);

/// Free-form log lines carry arbitrary key/value pairs next to the envelope.
/// Re-serialize the envelope and treat every key outside it as an extra field.
fn extra_fields(root: &Value, envelope: &Envelope) -> Result<Map<String, Value>, DecodeError> {
    let known = match serde_json::to_value(envelope).map_err(DecodeError::Malformed)? {
        Value::Object(m) => m,
        _ => Map::new(),
    };
    let mut extra = Map::new();
    if let Value::Object(obj) = root {
        for (k, v) in obj {
            if k == "type" || known.contains_key(k) {
                continue;
            }
            extra.insert(k.clone(), v.clone());
        }
    }
    Ok(extra)
}

/// Decodes one stream line. Pure: identical input yields identical output.
pub fn decode(line: &str) -> Result<Event, DecodeError> {
    let root: Value = serde_json::from_str(line).map_err(DecodeError::Malformed)?;

    // First pass: envelope and discriminator only.
    let envelope: Envelope =
        serde_json::from_value(root.clone()).map_err(DecodeError::Malformed)?;
    let kind_str = root.get("type").and_then(Value::as_str).unwrap_or_default();
    let kind: Kind = serde_json::from_value(Value::String(kind_str.to_string()))
        .map_err(|_| DecodeError::UnknownKind {
            kind: kind_str.to_string(),
        })?;

    // Second pass: payload, selected by the discriminator.
    let payload = match kind {
        Kind::Version => Payload::Version(
            serde_json::from_value(root.clone()).map_err(DecodeError::Malformed)?,
        ),
        Kind::Log => Payload::Log(extra_fields(&root, &envelope)?),
        Kind::Diagnostic => Payload::Diagnostic(payload_field(&root, "diagnostic")?),
        Kind::ResourceDrift => Payload::ResourceDrift(payload_field(&root, "change")?),
        Kind::PlannedChange => Payload::PlannedChange(payload_field(&root, "change")?),
        Kind::ChangeSummary => Payload::ChangeSummary(payload_field(&root, "changes")?),
        Kind::Outputs => Payload::Outputs(payload_field(&root, "outputs")?),
        Kind::ApplyStart | Kind::EphemeralOpStart => {
            Payload::Hook(hook_payload::<OperationStart>(&root)?)
        }
        Kind::ApplyProgress | Kind::EphemeralOpProgress => {
            Payload::Hook(hook_payload::<OperationProgress>(&root)?)
        }
        Kind::ApplyComplete | Kind::EphemeralOpComplete => {
            Payload::Hook(hook_payload::<OperationComplete>(&root)?)
        }
        Kind::ApplyErrored | Kind::EphemeralOpErrored => {
            Payload::Hook(hook_payload::<OperationErrored>(&root)?)
        }
        Kind::ProvisionStart => Payload::Hook(hook_payload::<ProvisionStart>(&root)?),
        Kind::ProvisionProgress => Payload::Hook(hook_payload::<ProvisionProgress>(&root)?),
        Kind::ProvisionComplete => Payload::Hook(hook_payload::<ProvisionComplete>(&root)?),
        Kind::ProvisionErrored => Payload::Hook(hook_payload::<ProvisionErrored>(&root)?),
        Kind::RefreshStart => Payload::Hook(hook_payload::<RefreshStart>(&root)?),
        Kind::RefreshComplete => Payload::Hook(hook_payload::<RefreshComplete>(&root)?),
    };

    Ok(Event {
        envelope,
        kind,
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(kind: &str, rest: &str) -> String {
        format!(
            r#"{{"@level":"info","@message":"m","@module":"terraform.ui","@timestamp":"2024-05-01T10:00:00Z","type":"{kind}"{rest}}}"#
        )
    }

    #[test]
    fn decodes_version() {
        let l = line("version", r#","terraform":"1.9.0","ui":"1.2""#);
        let ev = decode(&l).unwrap();
        assert_eq!(ev.kind, Kind::Version);
        match ev.payload {
            Payload::Version(v) => {
                assert_eq!(v.terraform, "1.9.0");
                assert_eq!(v.ui, "1.2");
                assert!(v.tofu.is_empty());
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn log_extra_fields_exclude_envelope() {
        let l = line("log", r#","foo":"bar","count":3"#);
        let ev = decode(&l).unwrap();
        match ev.payload {
            Payload::Log(extra) => {
                assert_eq!(extra.len(), 2);
                assert_eq!(extra["foo"], "bar");
                assert_eq!(extra["count"], 3);
                assert!(!extra.contains_key("@level"));
                assert!(!extra.contains_key("type"));
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn decodes_apply_start_hook() {
        let l = line(
            "apply_start",
            r#","hook":{"resource":{"addr":"null_resource.a","module":"","resource":"null_resource.a","implied_provider":"null","resource_type":"null_resource","resource_name":"a","resource_key":null},"action":"create"}"#,
        );
        let ev = decode(&l).unwrap();
        assert_eq!(ev.kind, Kind::ApplyStart);
        match ev.hook() {
            Some(Hook::OperationStart(op)) => {
                assert_eq!(op.resource.addr, "null_resource.a");
                assert_eq!(op.action, ChangeAction::Create);
                assert!(op.id_key.is_none());
            }
            other => panic!("unexpected hook: {other:?}"),
        }
    }

    #[test]
    fn ephemeral_start_shares_operation_payload() {
        let l = line(
            "ephemeral_op_start",
            r#","hook":{"resource":{"addr":"ephemeral.x.y"},"action":"open"}"#,
        );
        let ev = decode(&l).unwrap();
        assert_eq!(ev.kind, Kind::EphemeralOpStart);
        assert!(matches!(ev.hook(), Some(Hook::OperationStart(_))));
    }

    #[test]
    fn decodes_change_summary() {
        let l = line(
            "change_summary",
            r#","changes":{"add":2,"change":1,"import":0,"remove":1,"operation":"apply"}"#,
        );
        let ev = decode(&l).unwrap();
        match ev.payload {
            Payload::ChangeSummary(s) => {
                assert_eq!(s.total(), 4);
                assert_eq!(s.operation, SummaryOperation::Apply);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn decodes_diagnostic() {
        let l = line(
            "diagnostic",
            r#","diagnostic":{"severity":"error","summary":"boom","detail":"d","address":"null_resource.a"}"#,
        );
        let ev = decode(&l).unwrap();
        match ev.payload {
            Payload::Diagnostic(d) => {
                assert_eq!(d.severity, Severity::Error);
                assert_eq!(d.summary, "boom");
                assert_eq!(d.address.as_deref(), Some("null_resource.a"));
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn decodes_outputs_with_raw_values() {
        let l = line(
            "outputs",
            r#","outputs":{"ip":{"sensitive":false,"type":"string","value":"10.0.0.1"},"secret":{"sensitive":true,"type":"string"}}"#,
        );
        let ev = decode(&l).unwrap();
        match ev.payload {
            Payload::Outputs(o) => {
                assert_eq!(o.len(), 2);
                assert_eq!(o["ip"].value, Value::String("10.0.0.1".into()));
                assert!(o["secret"].sensitive);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn resource_key_kept_verbatim() {
        let l = line(
            "refresh_start",
            r#","hook":{"resource":{"addr":"aws_instance.web[0]","resource_key":0}}"#,
        );
        let ev = decode(&l).unwrap();
        match ev.hook() {
            Some(Hook::RefreshStart(r)) => assert_eq!(r.resource.resource_key, Value::from(0)),
            other => panic!("unexpected hook: {other:?}"),
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let l = line("telemetry_blob", "");
        match decode(&l) {
            Err(DecodeError::UnknownKind { kind }) => assert_eq!(kind, "telemetry_blob"),
            other => panic!("expected UnknownKind, got {other:?}"),
        }
    }

    #[test]
    fn missing_kind_is_rejected() {
        let l = r#"{"@level":"info","@message":"m","@module":"","@timestamp":"2024-05-01T10:00:00Z"}"#;
        assert!(matches!(
            decode(l),
            Err(DecodeError::UnknownKind { kind }) if kind.is_empty()
        ));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            decode("{not json"),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn wrong_payload_shape_is_malformed_not_partial() {
        let l = line("change_summary", r#","changes":"not an object""#);
        assert!(matches!(decode(&l), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn round_trips_every_kind() {
        let lines = [
            line("version", r#","terraform":"1.9.0","ui":"1.2""#),
            line("log", r#","foo":"bar","n":1"#),
            line(
                "diagnostic",
                r#","diagnostic":{"severity":"warning","summary":"s","detail":""}"#,
            ),
            line(
                "resource_drift",
                r#","change":{"resource":{"addr":"a.b"},"action":"update"}"#,
            ),
            line(
                "planned_change",
                r#","change":{"resource":{"addr":"a.b"},"action":"replace","reason":"tainted"}"#,
            ),
            line(
                "change_summary",
                r#","changes":{"add":1,"change":0,"import":0,"remove":0,"operation":"plan"}"#,
            ),
            line(
                "outputs",
                r#","outputs":{"o":{"sensitive":false,"type":"string","value":"v"}}"#,
            ),
            line(
                "apply_start",
                r#","hook":{"resource":{"addr":"a.b"},"action":"create"}"#,
            ),
            line(
                "apply_progress",
                r#","hook":{"resource":{"addr":"a.b"},"action":"create","elapsed_seconds":10}"#,
            ),
            line(
                "apply_complete",
                r#","hook":{"resource":{"addr":"a.b"},"action":"create","id_key":"id","id_value":"i-1","elapsed_seconds":12}"#,
            ),
            line(
                "apply_errored",
                r#","hook":{"resource":{"addr":"a.b"},"action":"delete","elapsed_seconds":3}"#,
            ),
            line(
                "provision_start",
                r#","hook":{"resource":{"addr":"a.b"},"provisioner":"local-exec"}"#,
            ),
            line(
                "provision_progress",
                r#","hook":{"resource":{"addr":"a.b"},"provisioner":"local-exec","output":"hi"}"#,
            ),
            line(
                "provision_complete",
                r#","hook":{"resource":{"addr":"a.b"},"provisioner":"local-exec"}"#,
            ),
            line(
                "provision_errored",
                r#","hook":{"resource":{"addr":"a.b"},"provisioner":"local-exec"}"#,
            ),
            line(
                "refresh_start",
                r#","hook":{"resource":{"addr":"a.b"},"id_key":"id","id_value":"i-2"}"#,
            ),
            line("refresh_complete", r#","hook":{"resource":{"addr":"a.b"}}"#),
            line(
                "ephemeral_op_complete",
                r#","hook":{"resource":{"addr":"e.f"},"action":"close","elapsed_seconds":1}"#,
            ),
        ];

        for l in &lines {
            let first = decode(l).unwrap();
            let encoded = first.encode().unwrap().to_string();
            let second = decode(&encoded).unwrap();
            assert_eq!(first, second, "round trip mismatch for {l}");
        }
    }
}
