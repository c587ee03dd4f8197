//! One-shot task execution.

use kiln_config::Project;
use kiln_pipeline::{Pipeline, RunSummary, TaskGraph};

use crate::error::{CliError, Result};
use crate::ui;

/// Run `name` to completion and report each task's outcome.
///
/// Files skipped for compile errors are reported but do not fail the run;
/// a task that errors does, once its siblings have finished.
pub async fn execute(project: Project, graph: &TaskGraph, name: &str) -> Result<()> {
    let pipeline = Pipeline::new(project);
    let summary = pipeline.run(graph, name).await?;
    report(&summary)
}

/// Print the summary and turn failed tasks into an error.
pub(crate) fn report(summary: &RunSummary) -> Result<()> {
    ui::print_run_summary(summary);

    let skipped = summary.swallowed_count();
    if skipped > 0 {
        ui::warning(&format!("{skipped} file(s) skipped, see errors above"));
    }

    let failed: Vec<String> = summary.failed().map(|o| o.task.to_string()).collect();
    if failed.is_empty() {
        ui::success(&format!("Wrote {} file(s)", summary.written().len()));
        Ok(())
    } else {
        Err(CliError::TasksFailed { failed })
    }
}
