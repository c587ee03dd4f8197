//! Interprets task graph steps against a project.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use kiln_config::Project;
use tokio::task::JoinSet;

use crate::error::Result;
use crate::graph::{Step, TaskGraph, TaskName};
use crate::reload::{NoopNotifier, ReloadNotifier};
use crate::report::{RunSummary, TaskOutcome};
use crate::tasks;

type StepFuture<'a> = Pin<Box<dyn Future<Output = Vec<TaskOutcome>> + Send + 'a>>;

/// Shared context for every task invocation.
///
/// Cloning is cheap; watch mode hands a clone to each spawned invocation.
#[derive(Clone)]
pub struct Pipeline {
    project: Arc<Project>,
    notifier: Arc<dyn ReloadNotifier>,
}

impl Pipeline {
    pub fn new(project: Project) -> Self {
        Self {
            project: Arc::new(project),
            notifier: Arc::new(NoopNotifier),
        }
    }

    /// Route script bundle notifications to `notifier`.
    pub fn with_notifier(mut self, notifier: Arc<dyn ReloadNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Run one leaf task and time it.
    pub async fn run_task(&self, task: TaskName) -> TaskOutcome {
        let start = Instant::now();
        tracing::debug!("[{task}] starting");

        let result = tasks::dispatch(task, &self.project, self.notifier.as_ref()).await;
        let duration = start.elapsed();

        match &result {
            Ok(report) => tracing::info!(
                "[{task}] wrote {} file(s) in {:?}{}",
                report.written.len(),
                duration,
                if report.swallowed.is_empty() {
                    String::new()
                } else {
                    format!(", skipped {}", report.swallowed.len())
                }
            ),
            Err(err) => tracing::error!("[{task}] failed after {duration:?}: {err}"),
        }

        TaskOutcome {
            task,
            duration,
            result,
        }
    }

    /// Run a named record from `graph` to completion.
    pub async fn run(&self, graph: &TaskGraph, name: &str) -> Result<RunSummary> {
        let plan = graph.expand(name)?;
        let outcomes = self.run_step(plan).await;
        Ok(RunSummary { outcomes })
    }

    fn run_step(&self, step: Step) -> StepFuture<'_> {
        Box::pin(async move {
            match step {
                Step::Run(task) => vec![self.run_task(task).await],
                Step::Series(steps) => {
                    let mut outcomes = Vec::new();
                    for step in steps {
                        let results = self.run_step(step).await;
                        let failed = results.iter().any(|o| !o.is_ok());
                        outcomes.extend(results);
                        if failed {
                            break;
                        }
                    }
                    outcomes
                }
                Step::Parallel(steps) => self.run_parallel(steps).await,
                Step::Ref(name) => {
                    tracing::error!("unexpanded reference to '{name}' skipped");
                    Vec::new()
                }
            }
        })
    }

    async fn run_parallel(&self, steps: Vec<Step>) -> Vec<TaskOutcome> {
        let mut set = JoinSet::new();
        let mut leaders = HashMap::new();
        let mut slots: Vec<Vec<TaskOutcome>> = Vec::with_capacity(steps.len());

        for (index, step) in steps.into_iter().enumerate() {
            let leader = first_task(&step);
            let pipeline = self.clone();
            let handle = set.spawn(async move { (index, pipeline.run_step(step).await) });
            leaders.insert(handle.id(), (index, leader));
            slots.push(Vec::new());
        }

        while let Some(joined) = set.join_next_with_id().await {
            match joined {
                Ok((_, (index, outcomes))) => slots[index] = outcomes,
                Err(err) => {
                    let Some(&(index, leader)) = leaders.get(&err.id()) else {
                        continue;
                    };
                    if let Some(task) = leader {
                        tracing::error!("[{task}] worker panicked: {err}");
                        slots[index] = vec![TaskOutcome {
                            task,
                            duration: Duration::ZERO,
                            result: Err(err.into()),
                        }];
                    }
                }
            }
        }

        slots.into_iter().flatten().collect()
    }
}

fn first_task(step: &Step) -> Option<TaskName> {
    match step {
        Step::Run(task) => Some(*task),
        Step::Series(steps) | Step::Parallel(steps) => steps.iter().find_map(first_task),
        Step::Ref(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_config::{KilnConfig, ModeFlags};
    use crate::error::TaskError;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<PathBuf>>);

    impl ReloadNotifier for Recorder {
        fn notify(&self, paths: &[PathBuf]) {
            self.0.lock().unwrap().extend_from_slice(paths);
        }
    }

    fn project(root: &Path, mode: ModeFlags) -> Project {
        Project::resolve(root, KilnConfig::default(), mode).unwrap()
    }

    fn write_scripts(root: &Path) {
        let dir = root.join("src/javascript");
        std::fs::create_dir_all(&dir).unwrap();
        for name in ["index", "burger", "animation"] {
            std::fs::write(dir.join(format!("{name}.js")), format!("var {name}Loaded = true;\n"))
                .unwrap();
        }
    }

    #[tokio::test]
    async fn sync_mode_notifies_on_bundle_write() {
        let temp = TempDir::new().unwrap();
        write_scripts(temp.path());

        let recorder = Arc::new(Recorder::default());
        let pipeline = Pipeline::new(project(temp.path(), ModeFlags::new(false, true)))
            .with_notifier(recorder.clone());

        let outcome = pipeline.run_task(TaskName::Js).await;
        assert!(outcome.is_ok());
        let notified = recorder.0.lock().unwrap().clone();
        assert_eq!(notified, vec![pipeline.project().bundle_path()]);
    }

    #[tokio::test]
    async fn no_notification_without_sync() {
        let temp = TempDir::new().unwrap();
        write_scripts(temp.path());

        let recorder = Arc::new(Recorder::default());
        let pipeline = Pipeline::new(project(temp.path(), ModeFlags::default()))
            .with_notifier(recorder.clone());

        pipeline.run_task(TaskName::Js).await.result.unwrap();
        assert!(recorder.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failing_task_does_not_cancel_siblings() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("src/fonts")).unwrap();
        std::fs::write(temp.path().join("src/fonts/a.woff"), b"wOFF").unwrap();

        let pipeline = Pipeline::new(project(temp.path(), ModeFlags::default()));
        let summary = pipeline.run(&TaskGraph::standard(), "build").await.unwrap();

        let js = summary.outcomes.iter().find(|o| o.task == TaskName::Js).unwrap();
        assert!(matches!(js.result, Err(TaskError::MissingScript(_))));
        assert!(temp.path().join("build/fonts/a.woff").is_file());
        assert_eq!(summary.outcomes.len(), 6);
        assert_eq!(summary.outcomes[0].task, TaskName::Clean);
    }

    #[tokio::test]
    async fn series_stops_after_failure() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("build"), "file, not dir").unwrap();

        let pipeline = Pipeline::new(project(temp.path(), ModeFlags::default()));
        let summary = pipeline.run(&TaskGraph::standard(), "build").await.unwrap();

        assert_eq!(summary.outcomes.len(), 1);
        assert!(!summary.is_success());
    }
}
