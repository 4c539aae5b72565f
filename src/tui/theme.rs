//! Dashboard theme - Visual design system
//!
//! Deep indigo + amber palette on a dark background, with fixed status
//! colors for operation lifecycles and diagnostics.

use ratatui::style::{Color, Modifier, Style};

use crate::view_state::Phase;

/// Dashboard color palette
pub struct DashboardTheme {
    // Primary palette
    pub indigo: Color,
    pub amber: Color,
    pub teal: Color,
    pub night: Color,
    pub fog: Color,

    // Status colors
    pub success_green: Color,
    pub warning_orange: Color,
    pub error_red: Color,

    // Dimmed versions
    pub dim_indigo: Color,
    pub dim_amber: Color,
}

impl Default for DashboardTheme {
    fn default() -> Self {
        Self {
            // Primary palette
            indigo: Color::Rgb(92, 79, 221),  // #5C4FDD
            amber: Color::Rgb(255, 183, 77),  // #FFB74D
            teal: Color::Rgb(38, 198, 218),   // #26C6DA
            night: Color::Rgb(16, 18, 28),    // #10121C
            fog: Color::Rgb(224, 226, 235),   // #E0E2EB

            // Status colors
            success_green: Color::Rgb(63, 185, 80),   // #3FB950
            warning_orange: Color::Rgb(210, 153, 34), // #D29922
            error_red: Color::Rgb(248, 81, 73),       // #F85149

            // Dimmed versions
            dim_indigo: Color::Rgb(58, 50, 140),
            dim_amber: Color::Rgb(153, 110, 46),
        }
    }
}

impl DashboardTheme {
    /// Create a new theme instance
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Styles
    // ─────────────────────────────────────────────────────────────────────

    /// Default text style
    pub fn text(&self) -> Style {
        Style::default().fg(self.fog)
    }

    /// Dimmed text style
    pub fn dimmed(&self) -> Style {
        Style::default().fg(Color::Rgb(128, 128, 128))
    }

    /// Bold header style
    pub fn header(&self) -> Style {
        Style::default()
            .fg(self.indigo)
            .add_modifier(Modifier::BOLD)
    }

    /// Accent style (amber)
    pub fn accent(&self) -> Style {
        Style::default().fg(self.amber)
    }

    /// Highlight style (teal)
    pub fn highlight(&self) -> Style {
        Style::default().fg(self.teal).add_modifier(Modifier::BOLD)
    }

    /// Success style
    pub fn success(&self) -> Style {
        Style::default().fg(self.success_green)
    }

    /// Warning style
    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning_orange)
    }

    /// Error style
    pub fn error(&self) -> Style {
        Style::default()
            .fg(self.error_red)
            .add_modifier(Modifier::BOLD)
    }

    /// Panel border style
    pub fn border(&self) -> Style {
        Style::default().fg(self.dim_indigo)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Phase and progress colors
    // ─────────────────────────────────────────────────────────────────────

    /// Color for one lifecycle phase in the header trail and page titles
    pub fn phase_color(&self, phase: Phase) -> Color {
        match phase {
            Phase::Idle => Color::Rgb(128, 128, 128),
            Phase::Refreshing => self.teal,
            Phase::Planning => self.indigo,
            Phase::Applying => self.amber,
            Phase::Summarizing => self.success_green,
        }
    }

    /// Gauge color for the apply progress ratio
    pub fn gauge_color(&self, ratio: f64) -> Color {
        match ratio {
            r if r >= 1.0 => self.success_green,
            r if r >= 0.5 => self.amber,
            _ => self.indigo,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Icons and Symbols
// ─────────────────────────────────────────────────────────────────────────────

/// UI icons used throughout the dashboard
pub mod icons {
    pub const LOGO: &str = "◉";
    pub const PHASE_SEP: &str = " › ";
    pub const FOLLOW: &str = "⤓";
}
