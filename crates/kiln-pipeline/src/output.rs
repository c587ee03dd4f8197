//! Writing task output under the build root.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::{IoResultExt, Result};

/// Write `contents` to `dest/relative`, creating parent directories.
pub async fn write(dest: &Path, relative: &Path, contents: impl AsRef<[u8]>) -> Result<PathBuf> {
    let target = dest.join(relative);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).await.at(parent)?;
    }
    fs::write(&target, contents).await.at(&target)?;
    tracing::debug!("wrote {}", target.display());
    Ok(target)
}

/// Copy a file verbatim to `dest/relative`.
pub async fn copy(source: &Path, dest: &Path, relative: &Path) -> Result<PathBuf> {
    let target = dest.join(relative);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).await.at(parent)?;
    }
    fs::copy(source, &target).await.at(source)?;
    tracing::debug!("copied {} -> {}", source.display(), target.display());
    Ok(target)
}

/// Swap the extension of a relative output path (`main.scss` -> `main.css`).
pub fn with_extension(relative: &Path, extension: &str) -> PathBuf {
    relative.with_extension(extension)
}
