//! The path table: one source/watch/destination triple per asset category.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use serde::{Deserialize, Serialize};

use crate::config::{KilnConfig, PathEntry};
use crate::error::{ConfigError, Result};

/// Asset categories handled by the per-category tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Html,
    Styles,
    Fonts,
    Images,
    Scripts,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Html,
        Category::Styles,
        Category::Fonts,
        Category::Images,
        Category::Scripts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Html => "html",
            Category::Styles => "styles",
            Category::Fonts => "fonts",
            Category::Images => "images",
            Category::Scripts => "scripts",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated source/watch/destination triple.
///
/// Globs are relative to the project root and matched against `/`-separated
/// relative paths; `*` never crosses a directory boundary, `**` does.
#[derive(Debug, Clone)]
pub struct PathSpec {
    pub category: Category,
    pub source_pattern: String,
    pub watch_pattern: String,
    /// Absolute destination directory
    pub dest: PathBuf,
    source: GlobMatcher,
    watch: GlobMatcher,
}

impl PathSpec {
    fn from_entry(category: Category, entry: &PathEntry, root: &Path) -> Result<Self> {
        let watch_pattern = entry.watch.clone().unwrap_or_else(|| entry.source.clone());
        Ok(Self {
            category,
            source: compile_glob(category, &entry.source)?,
            watch: compile_glob(category, &watch_pattern)?,
            source_pattern: entry.source.clone(),
            watch_pattern,
            dest: absolutize(&entry.dest, root),
        })
    }

    /// Does a root-relative path belong to this category's input set?
    pub fn matches_source(&self, relative: &Path) -> bool {
        self.source.is_match(normalize(relative))
    }

    /// Does a root-relative path trigger this category in watch mode?
    pub fn matches_watch(&self, relative: &Path) -> bool {
        self.watch.is_match(normalize(relative))
    }

    /// Literal directory prefix of the source glob (`src/scss` for `src/scss/**/*.scss`).
    pub fn source_base(&self) -> PathBuf {
        glob_base(&self.source_pattern)
    }

    pub fn watch_base(&self) -> PathBuf {
        glob_base(&self.watch_pattern)
    }
}

/// Strongly typed path table, one field per category.
#[derive(Debug, Clone)]
pub struct PathTable {
    /// Absolute project root every pattern is relative to
    pub root: PathBuf,
    /// Absolute build root; every destination lies under it
    pub build_root: PathBuf,
    pub html: PathSpec,
    pub styles: PathSpec,
    pub fonts: PathSpec,
    pub images: PathSpec,
    pub scripts: PathSpec,
}

impl PathTable {
    /// Build and validate the table from configuration.
    pub fn from_config(root: &Path, config: &KilnConfig) -> Result<Self> {
        let root = path_clean::clean(root);
        let build_root = absolutize(&config.build_root, &root);
        let paths = &config.paths;

        let table = Self {
            html: PathSpec::from_entry(Category::Html, &paths.html, &root)?,
            styles: PathSpec::from_entry(Category::Styles, &paths.styles, &root)?,
            fonts: PathSpec::from_entry(Category::Fonts, &paths.fonts, &root)?,
            images: PathSpec::from_entry(Category::Images, &paths.images, &root)?,
            scripts: PathSpec::from_entry(Category::Scripts, &paths.scripts, &root)?,
            root,
            build_root,
        };

        table.check_build_root()?;

        for spec in table.iter() {
            if !spec.dest.starts_with(&table.build_root) {
                return Err(ConfigError::DestinationOutsideRoot {
                    category: spec.category,
                    dest: spec.dest.clone(),
                    root: table.build_root.clone(),
                });
            }
        }

        Ok(table)
    }

    /// Clean empties the build root, so it must not hold the project or any
    /// source or watch tree.
    fn check_build_root(&self) -> Result<()> {
        if self.root.starts_with(&self.build_root) {
            return Err(ConfigError::InvalidValue {
                field: "buildRoot".to_string(),
                hint: Some(format!(
                    "{} contains the project root {}",
                    self.build_root.display(),
                    self.root.display()
                )),
            });
        }

        for spec in self.iter() {
            for base in [spec.source_base(), spec.watch_base()] {
                let base = self.root.join(base);
                if base.starts_with(&self.build_root) {
                    return Err(ConfigError::InvalidValue {
                        field: "buildRoot".to_string(),
                        hint: Some(format!(
                            "{} contains the {} sources at {}",
                            self.build_root.display(),
                            spec.category,
                            base.display()
                        )),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn get(&self, category: Category) -> &PathSpec {
        match category {
            Category::Html => &self.html,
            Category::Styles => &self.styles,
            Category::Fonts => &self.fonts,
            Category::Images => &self.images,
            Category::Scripts => &self.scripts,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathSpec> {
        Category::ALL.into_iter().map(move |c| self.get(c))
    }

    /// Categories whose watch glob matches an absolute path.
    pub fn categories_for(&self, path: &Path) -> Vec<Category> {
        if path.starts_with(&self.build_root) {
            return Vec::new();
        }
        let Ok(relative) = path.strip_prefix(&self.root) else {
            return Vec::new();
        };
        self.iter()
            .filter(|spec| spec.matches_watch(relative))
            .map(|spec| spec.category)
            .collect()
    }

    /// Absolute directories that need watching, with nested ones removed.
    pub fn watch_roots(&self) -> Vec<PathBuf> {
        let mut bases: Vec<PathBuf> = self.iter().map(|s| self.root.join(s.watch_base())).collect();
        bases.sort();
        bases.dedup();

        let mut roots: Vec<PathBuf> = Vec::new();
        for base in bases {
            if !roots.iter().any(|r| base.starts_with(r)) {
                roots.push(base);
            }
        }
        roots
    }
}

fn compile_glob(category: Category, pattern: &str) -> Result<GlobMatcher> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| ConfigError::InvalidGlob {
            category,
            pattern: pattern.to_string(),
            message: e.kind().to_string(),
        })
}

fn absolutize(path: &Path, root: &Path) -> PathBuf {
    if path.is_absolute() {
        path_clean::clean(path)
    } else {
        path_clean::clean(root.join(path))
    }
}

/// Glob matching happens on `/`-separated strings regardless of platform.
fn normalize(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn glob_base(pattern: &str) -> PathBuf {
    let is_glob = |part: &str| part.contains(['*', '?', '[', '{']);
    let parts: Vec<&str> = pattern
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect();
    let literal = parts.iter().take_while(|part| !is_glob(part)).count();
    // A pattern without wildcards names a single file; its base is the parent.
    let take = if literal == parts.len() {
        literal.saturating_sub(1)
    } else {
        literal
    };
    parts[..take].iter().collect()
}
