use kiln_config::Project;

use crate::error::Result;
use crate::fileset;
use crate::output;
use crate::report::TaskReport;

/// Copy fonts verbatim.
pub async fn run(project: &Project) -> Result<TaskReport> {
    let spec = &project.paths.fonts;
    let mut report = TaskReport::default();

    for file in fileset::discover(project.root(), spec).await? {
        let written = output::copy(&file.path, &spec.dest, &file.relative).await?;
        report.wrote(written);
    }

    Ok(report)
}
