//! TUI application - terminal lifecycle and run loop

use std::io::{self, Stdout};
use std::sync::{Arc, Mutex};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::error;

use crate::controller::{ControlEvent, Dashboard, Outcome, RenderSink, Snapshot};
use crate::error::PlanwatchError;

use super::events::spawn_input;
use super::state::UiOptions;
use super::theme::DashboardTheme;
use super::widgets;

/// Renders snapshots onto the alternate screen. Draw failures are logged,
/// not raised; losing one frame is recoverable, aborting mid-stream is not.
struct TuiSink<'t> {
    terminal: &'t mut Terminal<CrosstermBackend<Stdout>>,
    theme: DashboardTheme,
    options: Arc<Mutex<UiOptions>>,
}

impl RenderSink for TuiSink<'_> {
    fn render(&mut self, snapshot: &Snapshot<'_>) {
        let opts = self.options.lock().unwrap().clone();
        if let Err(err) = self
            .terminal
            .draw(|frame| widgets::draw(frame, snapshot, &self.theme, &opts))
        {
            error!(%err, "frame draw failed");
        }
    }
}

/// Interactive dashboard application
pub struct TuiApp {
    theme: DashboardTheme,
    options: Arc<Mutex<UiOptions>>,
}

impl TuiApp {
    pub fn new() -> Self {
        Self {
            theme: DashboardTheme::new(),
            options: Arc::new(Mutex::new(UiOptions::default())),
        }
    }

    /// Run the dashboard over the merged control-event channel. Keyboard
    /// input is spawned here and feeds the same channel via `tx`.
    pub async fn run(
        self,
        dashboard: &mut Dashboard,
        mut rx: mpsc::Receiver<ControlEvent>,
        tx: mpsc::Sender<ControlEvent>,
    ) -> Result<Outcome, PlanwatchError> {
        let mut terminal = setup_terminal()?;
        spawn_input(tx, self.options.clone());

        let mut sink = TuiSink {
            terminal: &mut terminal,
            theme: self.theme,
            options: self.options.clone(),
        };

        let result = dashboard.run(&mut rx, &mut sink).await;

        // After a clean EOF the final state stays on screen for review;
        // paging and scrolling keep working until the user quits.
        if matches!(result, Ok(Outcome::Completed)) {
            review_loop(dashboard, &mut rx, &mut sink).await;
        }

        restore_terminal(&mut terminal)?;
        result
    }
}

impl Default for TuiApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps redrawing the final snapshot on ticks, resizes and view-option
/// changes until the user quits or every sender is gone.
async fn review_loop(
    dashboard: &Dashboard,
    rx: &mut mpsc::Receiver<ControlEvent>,
    sink: &mut dyn RenderSink,
) {
    while let Some(event) = rx.recv().await {
        match event {
            ControlEvent::UserInterrupt => break,
            ControlEvent::TimerTick | ControlEvent::WindowResize(_, _) => {
                sink.render(&dashboard.snapshot());
            }
            _ => {}
        }
    }
}

/// Setup terminal for TUI
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, PlanwatchError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
) -> Result<(), PlanwatchError> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
