//! Dashboard widgets - stateless renderers
//!
//! Every function here takes an immutable [`Snapshot`] plus view options and
//! produces Ratatui primitives. Stream processing never happens at draw
//! time; a draw with the same snapshot and options yields the same frame.

use chrono::Utc;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table},
    Frame,
};

use crate::controller::Snapshot;
use crate::event::{Level, Severity};
use crate::tracker::OpRecord;
use crate::view_state::Phase;

use super::state::UiOptions;
use super::theme::{icons, DashboardTheme};

/// Draw one full frame from a snapshot.
pub fn draw(frame: &mut Frame, snap: &Snapshot<'_>, theme: &DashboardTheme, opts: &UiOptions) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),    // Phase page
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0], snap, theme);
    render_page(frame, chunks[1], snap, theme, opts);
    render_status(frame, chunks[2], snap, theme, opts);
    render_footer(frame, chunks[3], theme);
}

// ─────────────────────────────────────────────────────────────────────────────
// Header
// ─────────────────────────────────────────────────────────────────────────────

fn render_header(frame: &mut Frame, area: Rect, snap: &Snapshot<'_>, theme: &DashboardTheme) {
    let elapsed = utils::format_duration(snap.elapsed.as_secs());

    let mut spans = vec![
        Span::styled(format!("{} planwatch", icons::LOGO), theme.header()),
        Span::raw("  │  "),
        Span::styled(snap.version.unwrap_or("waiting for version"), theme.text()),
        Span::raw("  │  "),
    ];
    spans.extend(phase_trail(snap, theme));
    spans.push(Span::raw("  │  "));
    spans.push(Span::styled(format!("⏱ {elapsed}"), theme.text()));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border())
        .title(" PLANWATCH ");

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Visited phases in order, current one highlighted.
fn phase_trail<'a>(snap: &Snapshot<'a>, theme: &DashboardTheme) -> Vec<Span<'a>> {
    let mut spans = Vec::new();
    for (i, phase) in snap.visited.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(icons::PHASE_SEP, theme.dimmed()));
        }
        let mut style = Style::default().fg(theme.phase_color(*phase));
        if *phase == snap.phase {
            style = style.add_modifier(ratatui::style::Modifier::BOLD);
        }
        spans.push(Span::styled(phase.to_string(), style));
    }
    spans
}

// ─────────────────────────────────────────────────────────────────────────────
// Phase pages
// ─────────────────────────────────────────────────────────────────────────────

fn render_page(
    frame: &mut Frame,
    area: Rect,
    snap: &Snapshot<'_>,
    theme: &DashboardTheme,
    opts: &UiOptions,
) {
    match opts.page(snap.visited) {
        Phase::Idle => render_idle(frame, area, snap, theme),
        Phase::Refreshing => render_refresh(frame, area, snap, theme, opts),
        Phase::Planning => render_plan(frame, area, snap, theme, opts),
        Phase::Applying => render_apply(frame, area, snap, theme, opts),
        Phase::Summarizing => render_summary(frame, area, snap, theme),
    }
}

fn render_idle(frame: &mut Frame, area: Rect, snap: &Snapshot<'_>, theme: &DashboardTheme) {
    let text = if snap.lines == 0 {
        "waiting for the log stream…"
    } else {
        snap.last_message()
    };
    let block = page_block(Phase::Idle, theme);
    let paragraph = Paragraph::new(Line::from(Span::styled(text, theme.dimmed())))
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(paragraph, area);
}

fn render_refresh(
    frame: &mut Frame,
    area: Rect,
    snap: &Snapshot<'_>,
    theme: &DashboardTheme,
    opts: &UiOptions,
) {
    let now = Utc::now();
    let rows: Vec<Row> = snap
        .refresh
        .iter()
        .map(|rec| op_row(rec, format!("{:>4}", rec.index), now, theme))
        .collect();

    let header = Row::new(["#", "Status", "Module", "Resource", "Time"]).style(theme.accent());
    let widths = [
        Constraint::Length(5),
        Constraint::Length(8),
        Constraint::Percentage(25),
        Constraint::Percentage(45),
        Constraint::Length(10),
    ];

    let visible = utils::visible_window(rows.len(), table_height(area), opts);
    let table = Table::new(rows[visible].to_vec(), widths)
        .header(header)
        .block(page_block(Phase::Refreshing, theme));
    frame.render_widget(table, area);
}

fn render_plan(
    frame: &mut Frame,
    area: Rect,
    snap: &Snapshot<'_>,
    theme: &DashboardTheme,
    opts: &UiOptions,
) {
    let rows: Vec<Row> = snap
        .planned
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let comment = match (&rec.previous, &rec.reason) {
                (Some(prev), _) => format!("was {}", prev.addr),
                (None, Some(reason)) => reason.clone(),
                (None, None) => String::new(),
            };
            Row::new(vec![
                Cell::from(format!("{:>4}", i + 1)),
                Cell::from(rec.action.as_str()).style(theme.accent()),
                Cell::from(rec.resource.module.clone()),
                Cell::from(rec.resource.addr.clone()),
                Cell::from(comment).style(theme.dimmed()),
            ])
        })
        .collect();

    let header = Row::new(["#", "Action", "Module", "Resource", "Comment"]).style(theme.accent());
    let widths = [
        Constraint::Length(5),
        Constraint::Length(8),
        Constraint::Percentage(20),
        Constraint::Percentage(45),
        Constraint::Percentage(25),
    ];

    let visible = utils::visible_window(rows.len(), table_height(area), opts);
    let table = Table::new(rows[visible].to_vec(), widths)
        .header(header)
        .block(page_block(Phase::Planning, theme));
    frame.render_widget(table, area);
}

fn render_apply(
    frame: &mut Frame,
    area: Rect,
    snap: &Snapshot<'_>,
    theme: &DashboardTheme,
    opts: &UiOptions,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4)])
        .split(area);

    // The counter can overshoot when completions arrive for operations the
    // authoritative total never covered; the gauge clamps, the label shows
    // the raw numbers.
    let ratio = snap.ratio.clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border())
                .title(" PROGRESS "),
        )
        .gauge_style(Style::default().fg(theme.gauge_color(ratio)))
        .label(format!("{}/{}", snap.completed, snap.expected_total))
        .ratio(ratio);
    frame.render_widget(gauge, chunks[0]);

    let now = Utc::now();
    let rows: Vec<Row> = snap
        .apply
        .iter()
        .map(|rec| op_row(rec, utils::apply_index(rec.index, snap.expected_total), now, theme))
        .collect();

    let header = Row::new(["#", "Status", "Module", "Resource", "Time"]).style(theme.accent());
    let widths = [
        Constraint::Length(9),
        Constraint::Length(8),
        Constraint::Percentage(25),
        Constraint::Percentage(45),
        Constraint::Length(10),
    ];

    let visible = utils::visible_window(rows.len(), table_height(chunks[1]), opts);
    let table = Table::new(rows[visible].to_vec(), widths)
        .header(header)
        .block(page_block(Phase::Applying, theme));
    frame.render_widget(table, chunks[1]);
}

fn render_summary(frame: &mut Frame, area: Rect, snap: &Snapshot<'_>, theme: &DashboardTheme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let rows: Vec<Row> = snap
        .outputs
        .iter()
        .map(|out| {
            let value = if out.sensitive {
                "(sensitive)".to_string()
            } else {
                out.value.to_string()
            };
            Row::new(vec![
                Cell::from(out.name.clone()).style(theme.accent()),
                Cell::from(out.type_json.to_string()).style(theme.dimmed()),
                Cell::from(if out.sensitive { "yes" } else { "" }),
                Cell::from(value),
            ])
        })
        .collect();

    let header = Row::new(["Name", "Type", "Sensitive", "Value"]).style(theme.accent());
    let widths = [
        Constraint::Percentage(25),
        Constraint::Percentage(15),
        Constraint::Length(10),
        Constraint::Percentage(50),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(page_block(Phase::Summarizing, theme));
    frame.render_widget(table, chunks[0]);

    let diag_lines: Vec<Line> = snap
        .diags
        .iter()
        .map(|d| {
            let style = match d.severity {
                Severity::Error => theme.error(),
                Severity::Warning => theme.warning(),
                Severity::Unknown => theme.dimmed(),
            };
            let mut text = d.summary.clone();
            if !d.detail.is_empty() {
                text.push_str(": ");
                text.push_str(&utils::truncate(&d.detail, 120));
            }
            Line::from(Span::styled(text, style))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border())
        .title(format!(" DIAGNOSTICS ({}) ", snap.diags.len()));
    frame.render_widget(Paragraph::new(diag_lines).block(block), chunks[1]);
}

fn page_block(phase: Phase, theme: &DashboardTheme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.phase_color(phase)))
        .title(format!(" {phase} "))
}

fn op_row<'a>(
    rec: &'a OpRecord,
    index: String,
    now: chrono::DateTime<Utc>,
    theme: &DashboardTheme,
) -> Row<'a> {
    let status_style = match rec.status {
        crate::tracker::OpStatus::Started => theme.text(),
        crate::tracker::OpStatus::Completed => theme.success(),
        crate::tracker::OpStatus::Errored => theme.error(),
    };
    let secs = rec.duration(now).num_seconds().max(0) as u64;
    Row::new(vec![
        Cell::from(index),
        Cell::from(format!("{} {}", rec.status.glyph(), rec.status.as_str())).style(status_style),
        Cell::from(rec.locator.module.as_str()),
        Cell::from(rec.raw_addr.addr.as_str()),
        Cell::from(utils::format_duration(secs)).style(theme.dimmed()),
    ])
}

fn table_height(area: Rect) -> usize {
    // Borders plus the header row.
    area.height.saturating_sub(3) as usize
}

// ─────────────────────────────────────────────────────────────────────────────
// Status line and footer
// ─────────────────────────────────────────────────────────────────────────────

fn render_status(
    frame: &mut Frame,
    area: Rect,
    snap: &Snapshot<'_>,
    theme: &DashboardTheme,
    opts: &UiOptions,
) {
    let mut spans = Vec::new();

    if snap.is_eof {
        spans.push(Span::styled(
            format!(
                " stream closed in {} — press q to exit ",
                utils::format_duration(snap.elapsed.as_secs())
            ),
            theme.highlight(),
        ));
    } else if let Some(event) = snap.last_event {
        let style = match event.envelope.level {
            Level::Error => theme.error(),
            Level::Warn => theme.warning(),
            _ => theme.dimmed(),
        };
        spans.push(Span::styled(
            format!(" {}", utils::truncate(snap.last_message(), area.width.saturating_sub(16) as usize)),
            style,
        ));
    }

    if opts.follow {
        spans.push(Span::styled(
            format!("  {} following", icons::FOLLOW),
            theme.accent(),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_footer(frame: &mut Frame, area: Rect, theme: &DashboardTheme) {
    let help = Line::from(vec![
        Span::styled(" [q]", theme.accent()),
        Span::styled("uit  ", theme.dimmed()),
        Span::styled("[f]", theme.accent()),
        Span::styled("ollow  ", theme.dimmed()),
        Span::styled("[←→]", theme.accent()),
        Span::styled(" phase  ", theme.dimmed()),
        Span::styled("[↑↓]", theme.accent()),
        Span::styled(" scroll", theme.dimmed()),
    ]);
    frame.render_widget(Paragraph::new(help), area);
}

// ─────────────────────────────────────────────────────────────────────────────
// Pure helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Common widget utilities
pub mod utils {
    use std::ops::Range;

    use crate::tui::state::UiOptions;

    /// Format duration as HH:MM:SS
    pub fn format_duration(secs: u64) -> String {
        format!(
            "{:02}:{:02}:{:02}",
            secs / 3600,
            (secs % 3600) / 60,
            secs % 60
        )
    }

    /// Truncate string with ellipsis
    pub fn truncate(s: &str, max_len: usize) -> String {
        if s.chars().count() <= max_len {
            s.to_string()
        } else if max_len <= 3 {
            s.chars().take(max_len).collect()
        } else {
            let head: String = s.chars().take(max_len - 3).collect();
            format!("{head}...")
        }
    }

    /// Apply-row index cell: `i/total` against the expected operation
    /// count, width-padded to its digit count, or the bare index while the
    /// expected total is still unknown.
    pub fn apply_index(index: usize, expected_total: u64) -> String {
        if expected_total == 0 {
            return format!("{index:>4}");
        }
        let width = expected_total.to_string().len();
        format!("{index:>width$}/{expected_total}")
    }

    /// The slice of rows that fits the viewport: pinned to the tail in
    /// follow mode, anchored at the manual scroll offset otherwise.
    pub fn visible_window(len: usize, height: usize, opts: &UiOptions) -> Range<usize> {
        if height == 0 || len == 0 {
            return 0..0;
        }
        let start = if opts.follow {
            len.saturating_sub(height)
        } else {
            opts.scroll.min(len.saturating_sub(1))
        };
        start..(start + height).min(len)
    }
}
