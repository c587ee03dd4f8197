//! The task graph: named records, each a tree of steps.
//!
//! [`TaskGraph::standard`] is the single place the public task set is
//! composed. Runners only interpret steps; they never look tasks up
//! anywhere else.

use std::fmt;
use std::str::FromStr;

use kiln_config::Category;

use crate::error::TaskError;

/// Leaf units of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskName {
    Clean,
    Html,
    Styles,
    Fonts,
    Img,
    Js,
}

impl TaskName {
    /// Per-category tasks in a stable order.
    pub const CATEGORY_TASKS: [TaskName; 5] = [
        TaskName::Html,
        TaskName::Styles,
        TaskName::Fonts,
        TaskName::Img,
        TaskName::Js,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskName::Clean => "clean",
            TaskName::Html => "html",
            TaskName::Styles => "styles",
            TaskName::Fonts => "fonts",
            TaskName::Img => "img",
            TaskName::Js => "js",
        }
    }

    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Html => TaskName::Html,
            Category::Styles => TaskName::Styles,
            Category::Fonts => TaskName::Fonts,
            Category::Images => TaskName::Img,
            Category::Scripts => TaskName::Js,
        }
    }

    pub fn category(&self) -> Option<Category> {
        match self {
            TaskName::Clean => None,
            TaskName::Html => Some(Category::Html),
            TaskName::Styles => Some(Category::Styles),
            TaskName::Fonts => Some(Category::Fonts),
            TaskName::Img => Some(Category::Images),
            TaskName::Js => Some(Category::Scripts),
        }
    }
}

impl fmt::Display for TaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskName {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [TaskName::Clean]
            .into_iter()
            .chain(TaskName::CATEGORY_TASKS)
            .find(|t| t.as_str() == s)
            .ok_or_else(|| TaskError::UnknownTask(s.to_string()))
    }
}

/// How a record's work is sequenced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Run(TaskName),
    /// Each step starts after the previous one finished successfully
    Series(Vec<Step>),
    /// All steps start together; none cancels another
    Parallel(Vec<Step>),
    /// Another record's plan, by name
    Ref(&'static str),
}

/// A named entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub name: &'static str,
    pub about: &'static str,
    pub plan: Step,
    /// After the plan completes, keep watching sources
    pub watches: bool,
}

#[derive(Debug, Clone)]
pub struct TaskGraph {
    records: Vec<TaskRecord>,
}

impl TaskGraph {
    /// clean, html, styles, fonts, img, js, build and watch.
    pub fn standard() -> Self {
        let single = |name: TaskName, about: &'static str| TaskRecord {
            name: name.as_str(),
            about,
            plan: Step::Run(name),
            watches: false,
        };

        let records = vec![
            single(TaskName::Clean, "Empty the build directory"),
            single(TaskName::Html, "Inline includes and minify HTML pages"),
            single(TaskName::Styles, "Compile, prefix and minify stylesheets"),
            single(TaskName::Fonts, "Copy fonts"),
            single(TaskName::Img, "Optimize images"),
            single(TaskName::Js, "Concatenate and minify scripts"),
            TaskRecord {
                name: "build",
                about: "Clean, then run every asset task concurrently",
                plan: Step::Series(vec![
                    Step::Run(TaskName::Clean),
                    Step::Parallel(TaskName::CATEGORY_TASKS.into_iter().map(Step::Run).collect()),
                ]),
                watches: false,
            },
            TaskRecord {
                name: "watch",
                about: "Build once, then rebuild on source changes",
                plan: Step::Series(vec![Step::Ref("build")]),
                watches: true,
            },
        ];

        Self { records }
    }

    pub fn get(&self, name: &str) -> Option<&TaskRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn records(&self) -> &[TaskRecord] {
        &self.records
    }

    /// A record's plan with every [`Step::Ref`] inlined.
    pub fn expand(&self, name: &str) -> Result<Step, TaskError> {
        let record = self
            .get(name)
            .ok_or_else(|| TaskError::UnknownTask(name.to_string()))?;
        self.inline(&record.plan, &mut vec![record.name])
    }

    fn inline(&self, step: &Step, seen: &mut Vec<&'static str>) -> Result<Step, TaskError> {
        Ok(match step {
            Step::Run(task) => Step::Run(*task),
            Step::Series(steps) => Step::Series(
                steps
                    .iter()
                    .map(|s| self.inline(s, seen))
                    .collect::<Result<_, _>>()?,
            ),
            Step::Parallel(steps) => Step::Parallel(
                steps
                    .iter()
                    .map(|s| self.inline(s, seen))
                    .collect::<Result<_, _>>()?,
            ),
            Step::Ref(name) => {
                if seen.contains(name) {
                    return Err(TaskError::UnknownTask(format!("{name} (recursive reference)")));
                }
                let record = self
                    .get(name)
                    .ok_or_else(|| TaskError::UnknownTask(name.to_string()))?;
                seen.push(*name);
                let expanded = self.inline(&record.plan, seen)?;
                seen.pop();
                expanded
            }
        })
    }
}
