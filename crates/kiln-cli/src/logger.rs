//! Logging setup for the kiln CLI.
//!
//! Library crates log through `tracing`; this module installs the subscriber.
//! `--verbose` enables debug output for the kiln crates, `--quiet` keeps only
//! errors, and otherwise `RUST_LOG` is honoured with an info default.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "kiln=debug,kiln_config=debug,kiln_pipeline=debug,kiln_cli=debug";
const QUIET_FILTER: &str = "error";
const DEFAULT_FILTER: &str = "kiln=info,kiln_config=info,kiln_pipeline=info,kiln_cli=info";

/// Install the global tracing subscriber.
///
/// Call once, before anything logs.
///
/// ```rust,no_run
/// use kiln_cli::logger::init_logger;
///
/// init_logger(true, false, false);
/// tracing::debug!("[styles] compiled main.scss");
/// ```
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose, quiet), no_color);
}

/// Install the subscriber with an explicit filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    // A second initialization (tests) is not an error worth surfacing.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}
