//! Configuration layer for the kiln asset pipeline.
//!
//! Everything in here is computed once at startup and treated as immutable
//! afterwards:
//!
//! - [`ModeFlags`] - development/production and live-reload switches
//! - [`KilnConfig`] - the serde model of `kiln.config.json`, layered with figment
//! - [`PathTable`] - one validated [`PathSpec`] per asset [`Category`]
//! - [`Project`] - the resolved bundle of all of the above that tasks receive
//!
//! # Example
//!
//! ```
//! use kiln_config::{KilnConfig, ModeFlags, Project};
//! use std::path::Path;
//!
//! let mode = ModeFlags::from_args(["kiln", "build", "--dev"]);
//! let project = Project::resolve(Path::new("/site"), KilnConfig::default(), mode).unwrap();
//!
//! assert!(project.mode.is_dev());
//! assert_eq!(project.paths.build_root, Path::new("/site/build"));
//! ```

pub mod config;
pub mod error;
mod loading;
pub mod mode;
pub mod paths;
pub mod project;

pub use config::{
    ImagesConfig, KilnConfig, PathEntry, PathsConfig, ScriptsConfig, ServerConfig, StylesConfig,
    CONFIG_FILE_NAME,
};
pub use error::{ConfigError, Result};
pub use mode::ModeFlags;
pub use paths::{Category, PathSpec, PathTable};
pub use project::{Project, ScriptBundle};
