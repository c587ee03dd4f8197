//! Source file discovery for a category's glob.

use std::path::{Path, PathBuf};

use kiln_config::PathSpec;
use walkdir::WalkDir;

use crate::error::{Result, TaskError};

/// A matched input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute path
    pub path: PathBuf,
    /// Path relative to the glob's literal base; mirrored under the destination
    pub relative: PathBuf,
}

/// Collect files matching the category's source glob, sorted by path.
///
/// A missing base directory yields an empty set rather than an error.
pub fn collect(root: &Path, spec: &PathSpec) -> Result<Vec<SourceFile>> {
    let base = root.join(spec.source_base());
    if !base.is_dir() {
        tracing::debug!("{}: no source directory at {}", spec.category, base.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(&base).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| TaskError::Walk {
            path: base.clone(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let Ok(from_root) = path.strip_prefix(root) else {
            continue;
        };
        if !spec.matches_source(from_root) {
            continue;
        }

        let relative = path.strip_prefix(&base).unwrap_or(path).to_path_buf();
        files.push(SourceFile {
            path: path.to_path_buf(),
            relative,
        });
    }

    Ok(files)
}

/// [`collect`] on the blocking pool.
pub async fn discover(root: &Path, spec: &PathSpec) -> Result<Vec<SourceFile>> {
    let root = root.to_path_buf();
    let spec = spec.clone();
    tokio::task::spawn_blocking(move || collect(&root, &spec)).await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_config::{KilnConfig, PathTable};
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, rel).unwrap();
    }

    #[test]
    fn collects_matching_files_with_relative_paths() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "src/scss/main.scss");
        touch(temp.path(), "src/scss/blocks/_nav.scss");
        touch(temp.path(), "src/scss/notes.txt");

        let table = PathTable::from_config(temp.path(), &KilnConfig::default()).unwrap();
        let files = collect(&table.root, &table.styles).unwrap();
        let relative: Vec<_> = files.iter().map(|f| f.relative.clone()).collect();

        assert_eq!(
            relative,
            vec![PathBuf::from("blocks/_nav.scss"), PathBuf::from("main.scss")]
        );
    }

    #[test]
    fn top_level_html_only() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "src/index.html");
        touch(temp.path(), "src/about.html");
        touch(temp.path(), "src/partials/header.html");

        let table = PathTable::from_config(temp.path(), &KilnConfig::default()).unwrap();
        let files = collect(&table.root, &table.html).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.relative.clone()).collect();

        assert_eq!(
            names,
            vec![PathBuf::from("about.html"), PathBuf::from("index.html")]
        );
    }

    #[test]
    fn missing_base_is_empty() {
        let temp = TempDir::new().unwrap();
        let table = PathTable::from_config(temp.path(), &KilnConfig::default()).unwrap();
        assert!(collect(&table.root, &table.fonts).unwrap().is_empty());
    }
}
