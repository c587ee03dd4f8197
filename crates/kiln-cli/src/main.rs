//! kiln - static site asset pipeline.
//!
//! Parses arguments, installs logging, and dispatches to the selected task.

use clap::Parser;
use kiln_cli::{cli, commands, error, logger, ui};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    commands::execute(args).await.map_err(error::cli_error_to_miette)
}
