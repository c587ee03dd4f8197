//! Error types for task execution.
//!
//! Two families live here. Transform errors (`Compile`, `Include`,
//! `Minify`, `Image`) describe a single bad input file; the html and styles
//! tasks log them and move on. Everything else fails the task invocation.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T, E = TaskError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum TaskError {
    /// Filesystem failure while reading, writing or deleting
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed
    #[error("failed to walk {}: {message}", .path.display())]
    Walk { path: PathBuf, message: String },

    /// SCSS or CSS could not be compiled
    #[error("failed to compile {}: {message}", .file.display())]
    Compile { file: PathBuf, message: String },

    /// An `@@include` directive could not be resolved
    #[error("failed to resolve include in {}: {message}", .file.display())]
    Include { file: PathBuf, message: String },

    /// Minifier rejected its input
    #[error("failed to minify {}: {message}", .file.display())]
    Minify { file: PathBuf, message: String },

    /// Image codec failure
    #[error("failed to optimize image {}: {message}", .file.display())]
    Image { file: PathBuf, message: String },

    /// A file listed in the script bundle does not exist
    #[error("script listed in bundle not found: {}", .0.display())]
    MissingScript(PathBuf),

    /// Task graph lookup failed
    #[error("unknown task '{0}'")]
    UnknownTask(String),

    /// A blocking worker panicked or was cancelled
    #[error("task worker failed: {0}")]
    Join(String),
}

impl TaskError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        TaskError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Errors that concern one input file and can be skipped.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TaskError::Compile { .. }
                | TaskError::Include { .. }
                | TaskError::Minify { .. }
                | TaskError::Image { .. }
        )
    }
}

impl From<tokio::task::JoinError> for TaskError {
    fn from(err: tokio::task::JoinError) -> Self {
        TaskError::Join(err.to_string())
    }
}

/// Attach a path to I/O results.
pub(crate) trait IoResultExt<T> {
    fn at(self, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn at(self, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|e| TaskError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_path() {
        let err = TaskError::io(
            "build/styles",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("build/styles"));
        assert!(msg.contains("denied"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn transform_errors_are_recoverable() {
        let err = TaskError::Compile {
            file: PathBuf::from("src/scss/main.scss"),
            message: "expected \";\"".to_string(),
        };
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("main.scss"));
        assert!(!TaskError::MissingScript(PathBuf::from("a.js")).is_recoverable());
    }
}
