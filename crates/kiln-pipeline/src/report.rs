//! What a task did, and how each task in a run ended.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::TaskError;
use crate::graph::TaskName;

/// Files written and per-file errors that were logged and skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskReport {
    pub written: Vec<PathBuf>,
    pub swallowed: Vec<String>,
}

impl TaskReport {
    pub fn wrote(&mut self, path: PathBuf) {
        self.written.push(path);
    }

    /// Log a per-file failure and carry on.
    pub fn swallow(&mut self, task: TaskName, err: TaskError) {
        tracing::error!("[{task}] {err}");
        self.swallowed.push(err.to_string());
    }
}

/// Result of one leaf task invocation.
#[derive(Debug)]
pub struct TaskOutcome {
    pub task: TaskName,
    pub duration: Duration,
    pub result: Result<TaskReport, TaskError>,
}

impl TaskOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Every leaf outcome of a graph run, in plan order.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<TaskOutcome>,
}

impl RunSummary {
    pub fn failed(&self) -> impl Iterator<Item = &TaskOutcome> {
        self.outcomes.iter().filter(|o| !o.is_ok())
    }

    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }

    /// Output paths across all successful tasks.
    pub fn written(&self) -> Vec<PathBuf> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .flat_map(|r| r.written.iter().cloned())
            .collect()
    }

    pub fn swallowed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(|r| r.swallowed.len())
            .sum()
    }
}
