//! Leaf tasks. Each `run` is one invocation against a resolved project.

pub mod clean;
pub mod fonts;
pub mod html;
pub mod images;
pub mod scripts;
pub mod styles;

use kiln_config::Project;

use crate::error::Result;
use crate::graph::TaskName;
use crate::reload::ReloadNotifier;
use crate::report::TaskReport;

pub(crate) async fn dispatch(
    task: TaskName,
    project: &Project,
    notifier: &dyn ReloadNotifier,
) -> Result<TaskReport> {
    match task {
        TaskName::Clean => clean::run(project.build_root()).await,
        TaskName::Html => html::run(project).await,
        TaskName::Styles => styles::run(project).await,
        TaskName::Fonts => fonts::run(project).await,
        TaskName::Img => images::run(project).await,
        TaskName::Js => scripts::run(project, notifier).await,
    }
}
