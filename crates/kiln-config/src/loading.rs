use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format as _, Json, Serialized},
    Figment,
};

use crate::config::{KilnConfig, CONFIG_FILE_NAME};
use crate::error::{ConfigError, Result};

impl KilnConfig {
    /// Load configuration for a project.
    ///
    /// Priority: environment (`KILN_*`, `__` separates nesting) > config file > defaults.
    /// An explicit `config_path` must exist; the implicit `kiln.config.json`
    /// in `root` is optional.
    pub fn load(root: &Path, config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = Self::locate(root, config_path)? {
            tracing::debug!("Loading config from {}", path.display());
            figment = figment.merge(Json::file(path));
        }

        figment = figment.merge(Env::prefixed("KILN_").split("__"));

        figment.extract().map_err(|e| ConfigError::InvalidValue {
            field: "configuration".to_string(),
            hint: Some(e.to_string()),
        })
    }

    fn locate(root: &Path, config_path: Option<&Path>) -> Result<Option<PathBuf>> {
        match config_path {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    root.join(path)
                };
                if path.is_file() {
                    Ok(Some(path))
                } else {
                    Err(ConfigError::NotFound(path))
                }
            }
            None => {
                let path = root.join(CONFIG_FILE_NAME);
                Ok(path.is_file().then_some(path))
            }
        }
    }
}
