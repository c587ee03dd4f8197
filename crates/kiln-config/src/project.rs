//! The resolved, immutable project every task receives.

use std::path::{Path, PathBuf};

use crate::config::{ImagesConfig, KilnConfig, ServerConfig, StylesConfig};
use crate::error::{ConfigError, Result};
use crate::mode::ModeFlags;
use crate::paths::PathTable;

/// Ordered list of scripts concatenated into one bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptBundle {
    /// Absolute paths, in concatenation order
    pub files: Vec<PathBuf>,
    /// Bundle file name inside the scripts destination
    pub name: String,
}

/// Everything a task needs, computed once at startup.
#[derive(Debug, Clone)]
pub struct Project {
    pub paths: PathTable,
    pub scripts: ScriptBundle,
    pub styles: StylesConfig,
    pub images: ImagesConfig,
    pub server: ServerConfig,
    pub mode: ModeFlags,
}

impl Project {
    /// Validate configuration and resolve all paths against `root`.
    pub fn resolve(root: &Path, config: KilnConfig, mode: ModeFlags) -> Result<Self> {
        let paths = PathTable::from_config(root, &config)?;

        if config.scripts.files.is_empty() {
            return Err(ConfigError::NoScripts);
        }
        if config.scripts.bundle.is_empty() || config.scripts.bundle.contains(['/', '\\']) {
            return Err(ConfigError::InvalidValue {
                field: "scripts.bundle".to_string(),
                hint: Some("must be a plain file name such as 'index.js'".to_string()),
            });
        }
        if !(1..=100).contains(&config.images.jpeg_quality) {
            return Err(ConfigError::InvalidValue {
                field: "images.jpegQuality".to_string(),
                hint: Some("must be between 1 and 100".to_string()),
            });
        }
        if config.images.png_level > 6 {
            return Err(ConfigError::InvalidValue {
                field: "images.pngLevel".to_string(),
                hint: Some("must be between 0 and 6".to_string()),
            });
        }
        if config.styles.browsers.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "styles.browsers".to_string(),
                hint: Some("provide at least one browserslist query, e.g. \"defaults\"".to_string()),
            });
        }

        let scripts = ScriptBundle {
            files: config
                .scripts
                .files
                .iter()
                .map(|file| path_clean::clean(paths.root.join(file)))
                .collect(),
            name: config.scripts.bundle,
        };

        Ok(Self {
            paths,
            scripts,
            styles: config.styles,
            images: config.images,
            server: config.server,
            mode,
        })
    }

    /// Load `kiln.config.json` (or `config_path`) from `root` and resolve it.
    pub fn load(root: &Path, config_path: Option<&Path>, mode: ModeFlags) -> Result<Self> {
        let config = KilnConfig::load(root, config_path)?;
        Self::resolve(root, config, mode)
    }

    pub fn root(&self) -> &Path {
        &self.paths.root
    }

    pub fn build_root(&self) -> &Path {
        &self.paths.build_root
    }

    /// Output path of the script bundle.
    pub fn bundle_path(&self) -> PathBuf {
        self.paths.scripts.dest.join(&self.scripts.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_script_order_against_root() {
        let project =
            Project::resolve(Path::new("/site"), KilnConfig::default(), ModeFlags::default())
                .unwrap();
        assert_eq!(
            project.scripts.files,
            vec![
                PathBuf::from("/site/src/javascript/index.js"),
                PathBuf::from("/site/src/javascript/burger.js"),
                PathBuf::from("/site/src/javascript/animation.js"),
            ]
        );
        assert_eq!(
            project.bundle_path(),
            PathBuf::from("/site/build/scripts/index.js")
        );
    }

    #[test]
    fn rejects_empty_script_list() {
        let mut config = KilnConfig::default();
        config.scripts.files.clear();
        let err = Project::resolve(Path::new("/site"), config, ModeFlags::default()).unwrap_err();
        assert!(matches!(err, ConfigError::NoScripts));
    }

    #[test]
    fn rejects_nested_bundle_name() {
        let mut config = KilnConfig::default();
        config.scripts.bundle = "js/app.js".to_string();
        assert!(Project::resolve(Path::new("/site"), config, ModeFlags::default()).is_err());
    }

    #[test]
    fn rejects_out_of_range_image_settings() {
        let mut config = KilnConfig::default();
        config.images.jpeg_quality = 0;
        assert!(Project::resolve(Path::new("/site"), config, ModeFlags::default()).is_err());

        let mut config = KilnConfig::default();
        config.images.png_level = 7;
        assert!(Project::resolve(Path::new("/site"), config, ModeFlags::default()).is_err());
    }

    #[test]
    fn keeps_mode_flags() {
        let mode = ModeFlags::new(true, true);
        let project = Project::resolve(Path::new("/site"), KilnConfig::default(), mode).unwrap();
        assert_eq!(project.mode, mode);
    }
}
