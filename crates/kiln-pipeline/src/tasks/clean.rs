use std::path::Path;

use tokio::fs;

use crate::error::{IoResultExt, Result};
use crate::report::TaskReport;

/// Remove everything under the build root, keeping the root itself.
///
/// A missing root is left missing; tasks create what they need.
pub async fn run(build_root: &Path) -> Result<TaskReport> {
    let mut entries = match fs::read_dir(build_root).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("[clean] {} does not exist", build_root.display());
            return Ok(TaskReport::default());
        }
        Err(e) => return Err(crate::error::TaskError::io(build_root, e)),
    };

    let mut removed = 0usize;
    while let Some(entry) = entries.next_entry().await.at(build_root)? {
        let path = entry.path();
        if entry.file_type().await.at(&path)?.is_dir() {
            fs::remove_dir_all(&path).await.at(&path)?;
        } else {
            fs::remove_file(&path).await.at(&path)?;
        }
        removed += 1;
    }

    tracing::debug!("[clean] removed {removed} entries from {}", build_root.display());
    Ok(TaskReport::default())
}
