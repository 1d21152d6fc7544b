use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use super::paths::AppPaths;
use super::types::AppConfig;
use super::validation::validate_config;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid config at '{path}': {message}")]
    Invalid { path: String, message: String },

    #[error("{0}")]
    MissingCredential(String),
}

pub const PORT_ENV: &str = "PORT";

#[derive(Clone)]
pub struct ConfigService {
    paths: Arc<AppPaths>,
}

impl ConfigService {
    pub fn new(paths: Arc<AppPaths>) -> Self {
        Self { paths }
    }

    pub fn config_path(&self) -> PathBuf {
        if let Ok(path) = env::var("LECTURE_CHAT_CONFIG_PATH") {
            return PathBuf::from(path);
        }

        let user_config = self.paths.data_dir.join("config.yml");
        if user_config.exists() {
            return user_config;
        }

        self.paths.project_root.join("config.yml")
    }

    /// Loads and validates the configuration. A missing file yields the
    /// defaults; an unreadable or malformed one is an error.
    pub fn load_config(&self) -> Result<AppConfig, ConfigError> {
        let path = self.config_path();
        let config = load_yaml_file(&path)?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Absolute location of the persisted vector index.
    pub fn index_dir(&self, config: &AppConfig) -> PathBuf {
        self.paths.resolve(&config.index.index_dir())
    }
}

/// Applies the `PORT` environment override. A value that is not a valid
/// non-zero port fails startup like any other invalid setting.
pub fn apply_port_override(config: &mut AppConfig, raw: Option<&str>) -> Result<(), ConfigError> {
    let Some(raw) = raw else {
        return Ok(());
    };

    match raw.trim().parse::<u16>() {
        Ok(port) if port > 0 => {
            tracing::info!("Port overridden by PORT: {}", port);
            config.server.port = port;
            Ok(())
        }
        _ => Err(ConfigError::Invalid {
            path: PORT_ENV.to_string(),
            message: format!("must be an integer between 1 and 65535, got '{}'", raw),
        }),
    }
}

fn load_yaml_file(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("No config file at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if contents.trim().is_empty() {
        return Ok(AppConfig::default());
    }

    serde_yaml::from_str::<AppConfig>(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
