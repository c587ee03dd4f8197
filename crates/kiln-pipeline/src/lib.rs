//! # kiln-pipeline
//!
//! The asset tasks and the runner that sequences them.
//!
//! Each leaf task reads one category of sources from the project's path
//! table, transforms them on the blocking pool, and writes the results under
//! the build root:
//!
//! | task | work |
//! |---|---|
//! | `clean` | empty the build root |
//! | `html` | inline `@@include` partials, minify |
//! | `styles` | compile SCSS, group media queries, prefix, minify or map |
//! | `fonts` | copy |
//! | `img` | recompress JPEG, optimize PNG (production) |
//! | `js` | concatenate the script list in order, minify |
//!
//! Composite tasks (`build`, `watch`) are records in [`TaskGraph`], run by a
//! [`Pipeline`].
//!
//! ```no_run
//! use kiln_config::{ModeFlags, Project};
//! use kiln_pipeline::{Pipeline, TaskGraph};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let project = Project::load(std::path::Path::new("."), None, ModeFlags::default())?;
//! let summary = Pipeline::new(project)
//!     .run(&TaskGraph::standard(), "build")
//!     .await?;
//! assert!(summary.is_success());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod fileset;
pub mod graph;
pub mod output;
pub mod pipeline;
pub mod reload;
pub mod report;
pub mod tasks;
pub mod transform;

pub use error::{Result, TaskError};
pub use graph::{Step, TaskGraph, TaskName, TaskRecord};
pub use pipeline::Pipeline;
pub use reload::{NoopNotifier, ReloadNotifier};
pub use report::{RunSummary, TaskOutcome, TaskReport};
