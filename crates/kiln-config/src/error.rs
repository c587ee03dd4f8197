//! Error types for configuration loading and validation.

use std::path::PathBuf;

use thiserror::Error;

use crate::paths::Category;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("invalid config value for '{field}'{}", .hint.as_ref().map(|h| format!(": {h}")).unwrap_or_default())]
    InvalidValue { field: String, hint: Option<String> },

    #[error("invalid glob pattern '{pattern}' for {category}: {message}")]
    InvalidGlob {
        category: Category,
        pattern: String,
        message: String,
    },

    #[error("destination {} for {category} is outside the build root {}", .dest.display(), .root.display())]
    DestinationOutsideRoot {
        category: Category,
        dest: PathBuf,
        root: PathBuf,
    },

    #[error("no script files configured for the bundle")]
    NoScripts,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_value_includes_hint() {
        let err = ConfigError::InvalidValue {
            field: "images.jpegQuality".to_string(),
            hint: Some("must be between 1 and 100".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("images.jpegQuality"));
        assert!(msg.contains("between 1 and 100"));
    }

    #[test]
    fn invalid_value_without_hint() {
        let err = ConfigError::InvalidValue {
            field: "server.port".to_string(),
            hint: None,
        };
        assert_eq!(err.to_string(), "invalid config value for 'server.port'");
    }

    #[test]
    fn destination_outside_root_names_category() {
        let err = ConfigError::DestinationOutsideRoot {
            category: Category::Fonts,
            dest: PathBuf::from("/site/public/fonts"),
            root: PathBuf::from("/site/build"),
        };
        let msg = err.to_string();
        assert!(msg.contains("fonts"));
        assert!(msg.contains("/site/public/fonts"));
    }
}
