//! Interactive terminal dashboard
//!
//! Architecture:
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        UI LAYER (widgets/)                          │
//! │  Pure rendering. No stream logic. Receives Snapshot + UiOptions.    │
//! └─────────────────────────────────────────────────────────────────────┘
//!                               ▲
//!                               │ Snapshot (borrowed per draw)
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                  CONTROLLER (crate::controller)                     │
//! │  Owns tracker/progress/phase state. Single serialized event loop.   │
//! └─────────────────────────────────────────────────────────────────────┘
//!                               ▲
//!                               │ ControlEvent stream (one mpsc channel)
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │        PRODUCERS (reader, ticker, events::spawn_input)              │
//! │  Line source, 1s tick, keyboard. Each is an independent task.       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

mod app;
mod events;
mod state;
mod theme;

pub mod widgets;

pub use app::TuiApp;
pub use state::UiOptions;
pub use theme::DashboardTheme;

use tokio::sync::mpsc;

use crate::controller::{ControlEvent, Dashboard, Outcome};
use crate::error::PlanwatchError;

/// Run the interactive dashboard until EOF + quit, interrupt or failure.
pub async fn run(
    dashboard: &mut Dashboard,
    rx: mpsc::Receiver<ControlEvent>,
    tx: mpsc::Sender<ControlEvent>,
) -> Result<Outcome, PlanwatchError> {
    TuiApp::new().run(dashboard, rx, tx).await
}
