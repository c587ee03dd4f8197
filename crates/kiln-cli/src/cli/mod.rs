//! Command-line interface definition.
//!
//! - `kiln clean` - empty the build directory
//! - `kiln html|styles|fonts|img|js` - run one asset task
//! - `kiln build` - clean, then every asset task concurrently
//! - `kiln watch` - build, then rebuild on change (with `--sync`, live reload)

mod commands;

use std::path::PathBuf;

use clap::Parser;
use kiln_config::ModeFlags;

pub use commands::{Command, TaskArgs};

/// kiln - static site asset pipeline
#[derive(Parser, Debug)]
#[command(
    name = "kiln",
    version,
    about = "Static site asset pipeline",
    long_about = "kiln compiles SCSS, bundles and minifies scripts, inlines HTML partials,\n\
                  optimizes images and copies fonts into a build directory.\n\
                  `kiln watch --sync` rebuilds on change and reloads connected browsers."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Development mode: source maps, no minification, images copied as is
    #[arg(long, global = true)]
    pub dev: bool,

    /// Serve the build directory and reload browsers on change
    #[arg(long, global = true)]
    pub sync: bool,

    /// Project root (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Config file (defaults to kiln.config.json in the project root)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Task to run
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Mode flags from parsed switches plus any passthrough arguments.
    pub fn mode_flags(&self) -> ModeFlags {
        ModeFlags::new(self.dev, self.sync).union(ModeFlags::from_args(&self.command.args().extra))
    }
}
