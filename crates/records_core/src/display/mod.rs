//! Console rendering for stores and reports.
//!
//! Pure string formatting; callers decide where the output goes. Color
//! output follows the `colored` crate's terminal detection and overrides.

use crate::repo::record_store::RecordStore;
use crate::service::report_service::{ReportRow, Tier};
use colored::Colorize;

/// How a store describes itself on the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Plain,
    Highlighted,
}

/// Wraps `text` in the color for `tier`.
///
/// Single is green, Double is red, Many is magenta.
pub fn colorize(text: &str, tier: Tier) -> String {
    match tier {
        Tier::Single => text.green().to_string(),
        Tier::Double => text.red().to_string(),
        Tier::Many => text.magenta().to_string(),
    }
}

/// One-line store label, e.g. `StudentFile: math.txt`.
pub fn describe_store(store: &RecordStore, mode: DisplayMode) -> String {
    match mode {
        DisplayMode::Plain => format!("StudentFile: {}", store.path().display())
            .blue()
            .to_string(),
        DisplayMode::Highlighted => format!("ColoredStudentFile: {}", store.path().display())
            .green()
            .to_string(),
    }
}

/// Renders each report row as its colorized name, one per line.
pub fn render_report(rows: &[ReportRow]) -> String {
    rows.iter()
        .map(|row| colorize(&row.name, row.tier()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders a row with its count and average, colorized by tier.
pub fn render_report_row(row: &ReportRow) -> String {
    let text = format!(
        "{} (stores={}, average={})",
        row.name, row.appearance_count, row.average_score
    );
    colorize(&text, row.tier())
}
