//! Conversion from CLI errors to miette reports.

use kiln_config::ConfigError;
use miette::Report;

use crate::error::CliError;

/// Convert a `CliError` into a report with a hint where one helps.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => config_error_to_miette(e),
        CliError::Task(kiln_pipeline::TaskError::MissingScript(path)) => miette::miette!(
            help = "Update scripts.files in kiln.config.json or create the file",
            "Script listed in the bundle was not found: {}",
            path.display()
        ),
        CliError::TasksFailed { failed } => miette::miette!(
            help = "Run again with --verbose for per-file details",
            "{} task(s) failed: {}",
            failed.len(),
            failed.join(", ")
        ),
        CliError::Server(msg) => miette::miette!(
            help = "Set server.port in kiln.config.json or KILN_SERVER__PORT to use another port",
            "Server error: {}",
            msg
        ),
        _ => miette::miette!("{}", err),
    }
}

fn config_error_to_miette(err: ConfigError) -> Report {
    match err {
        ConfigError::NotFound(path) => miette::miette!(
            help = "Create the file or drop --config to use built-in defaults",
            "Config file not found: {}",
            path.display()
        ),
        ConfigError::DestinationOutsideRoot { .. } => miette::miette!(
            help = "Every paths.*.dest must lie under buildRoot",
            "Configuration error: {}",
            err
        ),
        _ => miette::miette!("Configuration error: {}", err),
    }
}
