//! kiln CLI - static site asset pipeline with live reload.
//!
//! - [`cli`] - clap argument definitions
//! - [`commands`] - one-shot task execution and watch mode
//! - [`dev`] - file watcher, reload hub and the live-reload HTTP server
//! - [`error`] - `CliError` and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - terminal status lines
//!
//! ```rust,no_run
//! use kiln_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod dev;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result, ResultExt};
