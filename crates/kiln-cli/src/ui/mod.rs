//! Terminal status lines and formatting.
//!
//! ```no_run
//! use kiln_cli::ui;
//!
//! ui::init_colors(false);
//! ui::success("build finished");
//! ui::warning("1 stylesheet skipped");
//! ```

mod format;
mod messages;

pub use format::{format_duration, print_run_summary};
pub use messages::{error, info, success, warning};

/// Check if color output should be enabled.
///
/// `NO_COLOR` disables, `FORCE_COLOR` forces, otherwise stderr must be a
/// terminal.
pub fn should_use_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }
    console::user_attended_stderr()
}

/// Apply the color decision to every status line.
pub fn init_colors(no_color: bool) {
    owo_colors::set_override(!no_color && should_use_color());
}
