//! Serde model of `kiln.config.json`.
//!
//! All fields are optional in the file; missing values fall back to the
//! defaults below, which describe the conventional `src/` -> `build/` layout.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Config file looked up in the project root when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "kiln.config.json";

/// Kiln configuration - loaded from kiln.config.json, environment and defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KilnConfig {
    /// Single output directory every task writes under
    #[serde(default = "default_build_root")]
    pub build_root: PathBuf,

    /// Source globs and destinations per asset category
    #[serde(default)]
    pub paths: PathsConfig,

    /// Ordered script bundle
    #[serde(default)]
    pub scripts: ScriptsConfig,

    #[serde(default)]
    pub styles: StylesConfig,

    #[serde(default)]
    pub images: ImagesConfig,

    /// Live-reload server
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for KilnConfig {
    fn default() -> Self {
        Self {
            build_root: default_build_root(),
            paths: PathsConfig::default(),
            scripts: ScriptsConfig::default(),
            styles: StylesConfig::default(),
            images: ImagesConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Source pattern, optional watch pattern and destination for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathEntry {
    /// Glob selecting the files the task reads, relative to the project root
    pub source: String,

    /// Glob that triggers the task in watch mode (defaults to `source`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch: Option<String>,

    /// Output directory, relative to the project root
    pub dest: PathBuf,
}

impl PathEntry {
    fn new(source: &str, watch: Option<&str>, dest: &str) -> Self {
        Self {
            source: source.to_string(),
            watch: watch.map(str::to_string),
            dest: PathBuf::from(dest),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathsConfig {
    pub html: PathEntry,
    pub styles: PathEntry,
    pub fonts: PathEntry,
    pub images: PathEntry,
    pub scripts: PathEntry,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            // Partials live in subfolders; any of them changing rebuilds the pages.
            html: PathEntry::new("src/*.html", Some("src/**/*.html"), "build"),
            styles: PathEntry::new("src/scss/**/*.scss", None, "build/styles"),
            fonts: PathEntry::new("src/fonts/*.woff", None, "build/fonts"),
            images: PathEntry::new("src/images/**/*", None, "build/images"),
            scripts: PathEntry::new("src/javascript/**/*.js", None, "build/scripts"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptsConfig {
    /// Files to concatenate, in order. Not a glob: order is load order.
    #[serde(default = "default_script_files")]
    pub files: Vec<PathBuf>,

    /// Name of the bundled output file
    #[serde(default = "default_bundle_name")]
    pub bundle: String,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            files: default_script_files(),
            bundle: default_bundle_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylesConfig {
    /// Browserslist queries driving vendor prefixes
    #[serde(default = "default_browsers")]
    pub browsers: Vec<String>,
}

impl Default for StylesConfig {
    fn default() -> Self {
        Self {
            browsers: default_browsers(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagesConfig {
    /// Lossy JPEG quality (1-100)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    /// Lossless PNG optimization preset (0-6)
    #[serde(default = "default_png_level")]
    pub png_level: u8,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: default_jpeg_quality(),
            png_level: default_png_level(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

pub fn default_build_root() -> PathBuf {
    PathBuf::from("build")
}

pub fn default_script_files() -> Vec<PathBuf> {
    ["index.js", "burger.js", "animation.js"]
        .iter()
        .map(|name| PathBuf::from("src/javascript").join(name))
        .collect()
}

pub fn default_bundle_name() -> String {
    "index.js".to_string()
}

pub fn default_browsers() -> Vec<String> {
    vec!["defaults".to_string()]
}

pub fn default_jpeg_quality() -> u8 {
    50
}

pub fn default_png_level() -> u8 {
    6 // oxipng's highest preset
}

pub fn default_port() -> u16 {
    3000
}
