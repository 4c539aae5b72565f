//! Planwatch - live terminal dashboard for Terraform/OpenTofu JSON log streams

pub mod controller;
pub mod error;
pub mod event;
pub mod export;
pub mod plain;
pub mod progress;
pub mod reader;
pub mod tracker;
pub mod tui;
pub mod view_state;

pub use controller::{ControlEvent, Dashboard, Outcome, RenderSink, Snapshot, Step};
pub use error::PlanwatchError;
pub use event::{decode, DecodeError, Event, Kind, Payload};
pub use plain::PlainSink;
pub use progress::ProgressCounter;
pub use reader::{spawn_source, JsonLineReader, LineSource};
pub use tracker::{OpCollection, OpLocator, OpRecord, OpStatus};
pub use view_state::Phase;
