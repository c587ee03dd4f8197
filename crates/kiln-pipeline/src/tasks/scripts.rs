use std::path::Path;

use kiln_config::Project;

use crate::error::{Result, TaskError};
use crate::output;
use crate::reload::ReloadNotifier;
use crate::report::TaskReport;
use crate::transform::minify_js;

/// Concatenate the configured scripts in order, minify, and write the bundle.
///
/// In sync mode the written bundle is announced to `notifier`.
pub async fn run(project: &Project, notifier: &dyn ReloadNotifier) -> Result<TaskReport> {
    let bundle = &project.scripts;
    let mut sources = Vec::with_capacity(bundle.files.len());

    for file in &bundle.files {
        match tokio::fs::read_to_string(file).await {
            Ok(source) => sources.push(source),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TaskError::MissingScript(file.clone()));
            }
            Err(e) => return Err(TaskError::io(file, e)),
        }
    }

    let joined = sources.join("\n");
    let bundle_name = bundle.name.clone();
    let minified =
        tokio::task::spawn_blocking(move || minify_js(Path::new(&bundle_name), &joined)).await??;

    let written = output::write(&project.paths.scripts.dest, Path::new(&bundle.name), minified).await?;
    if project.mode.is_sync() {
        notifier.notify(std::slice::from_ref(&written));
    }

    let mut report = TaskReport::default();
    report.wrote(written);
    Ok(report)
}
