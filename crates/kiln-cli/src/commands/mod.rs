//! Command implementations.
//!
//! - [`run`] - one-shot tasks (`clean`, the category tasks, `build`)
//! - [`watch`] - initial build, then rebuild on change and optional live reload
//!
//! Both load the project the same way; [`execute`] picks one by whether the
//! selected task graph record watches.

pub mod run;
pub mod watch;

use std::path::PathBuf;

use kiln_config::Project;
use kiln_pipeline::TaskGraph;

use crate::cli::Cli;
use crate::error::{Result, ResultExt};
use crate::ui;

/// Run the command selected on the command line.
pub async fn execute(cli: Cli) -> Result<()> {
    let project = load_project(&cli)?;
    let graph = TaskGraph::standard();
    let name = cli.command.task_name();

    let record = graph.get(name).ok_or_else(|| {
        crate::error::CliError::InvalidArgument(format!("unknown task '{name}'"))
    })?;

    ui::info(&format!("{name} ({})", project.mode.label()));
    tracing::debug!("project root: {}", project.root().display());

    if record.watches {
        watch::execute(project, &graph, name).await
    } else {
        run::execute(project, &graph, name).await
    }
}

/// Resolve the project root and load its configuration.
pub(crate) fn load_project(cli: &Cli) -> Result<Project> {
    let root = project_root(cli.cwd.as_ref())?;
    Ok(Project::load(&root, cli.config.as_deref(), cli.mode_flags())?)
}

/// Absolute, canonical project root. Watch events report canonical paths on
/// some platforms, so routing compares against the canonical form.
fn project_root(cwd: Option<&PathBuf>) -> Result<PathBuf> {
    let current = std::env::current_dir()?;
    let root = match cwd {
        Some(dir) => current.join(dir),
        None => current,
    };
    std::fs::canonicalize(&root).with_path(&root)
}
