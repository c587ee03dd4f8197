use kiln_config::Project;

use crate::error::Result;
use crate::fileset;
use crate::graph::TaskName;
use crate::output;
use crate::report::TaskReport;
use crate::transform::{minify_html, resolve_file};

/// Inline includes and minify every top-level page.
///
/// A page whose includes fail is logged and skipped.
pub async fn run(project: &Project) -> Result<TaskReport> {
    let spec = &project.paths.html;
    let mut report = TaskReport::default();

    for file in fileset::discover(project.root(), spec).await? {
        let path = file.path.clone();
        let processed =
            tokio::task::spawn_blocking(move || resolve_file(&path).map(|html| minify_html(&html)))
                .await?;

        match processed {
            Ok(html) => report.wrote(output::write(&spec.dest, &file.relative, html).await?),
            Err(err) if err.is_recoverable() => report.swallow(TaskName::Html, err),
            Err(err) => return Err(err),
        }
    }

    Ok(report)
}
