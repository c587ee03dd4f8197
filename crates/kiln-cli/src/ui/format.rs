//! Durations and per-task run summaries.

use std::time::Duration;

use kiln_pipeline::{RunSummary, TaskOutcome};
use owo_colors::{OwoColorize, Stream::Stderr, Style};

/// Format a duration as `50ms`, `1.50s` or `1m 30s`.
///
/// ```
/// use std::time::Duration;
/// use kiln_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{total_ms}ms")
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

fn outcome_line(outcome: &TaskOutcome) -> String {
    let timing = format_duration(outcome.duration);
    match &outcome.result {
        Ok(report) if report.swallowed.is_empty() => format!(
            "{} {:<7} {} file(s) {}",
            "✓".if_supports_color(Stderr, |t| t.style(Style::new().green().bold())),
            outcome.task.as_str(),
            report.written.len(),
            timing.if_supports_color(Stderr, |t| t.dimmed())
        ),
        Ok(report) => format!(
            "{} {:<7} {} file(s), {} skipped {}",
            "⚠".if_supports_color(Stderr, |t| t.style(Style::new().yellow().bold())),
            outcome.task.as_str(),
            report.written.len(),
            report.swallowed.len(),
            timing.if_supports_color(Stderr, |t| t.dimmed())
        ),
        Err(err) => format!(
            "{} {:<7} {} {}",
            "✗".if_supports_color(Stderr, |t| t.style(Style::new().red().bold())),
            outcome.task.as_str(),
            err.if_supports_color(Stderr, |t| t.red()),
            timing.if_supports_color(Stderr, |t| t.dimmed())
        ),
    }
}

/// Print one line per task to stderr.
pub fn print_run_summary(summary: &RunSummary) {
    for outcome in &summary.outcomes {
        eprintln!("  {}", outcome_line(outcome));
    }
}
