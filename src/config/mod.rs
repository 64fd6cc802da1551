use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

static CONFIG: OnceLock<Config> = OnceLock::new();

mod config_dir;
pub use config_dir::{find_config_file, read_config_at};

mod error;
pub use error::{ConfigError, ConfigResult};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    storage: Storage,
    app: App,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Storage {
    data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct App {
    seed_catalog: bool,
    demo_user: bool,
}

impl Default for Storage {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self {
            seed_catalog: true,
            demo_user: true,
        }
    }
}

impl Config {
    /// Reads the config file, falling back to defaults when none exists.
    pub fn load(use_local: bool) -> ConfigResult<Self> {
        Self::load_from(&find_config_file(use_local))
    }

    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        match read_config_at(path) {
            Ok(bytes) => Self::from_slice(&bytes),
            Err(ConfigError::ConfigNotFound) => {
                tracing::debug!("no config file found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    pub fn from_slice(bytes: &[u8]) -> ConfigResult<Self> {
        let config: Self = toml::from_slice(bytes)?;
        Ok(config)
    }

    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    #[tracing::instrument]
    pub fn get_or_init(use_local: bool) -> &'static Config {
        if let Some(config) = CONFIG.get() {
            return config;
        }

        let config = match Self::load(use_local) {
            Ok(c) => c,
            Err(e) => {
                crate::error::log_error(&e);
                tracing::error!("Config is malformed.");
                std::process::exit(1);
            }
        };

        CONFIG.get_or_init(|| config)
    }

    pub fn with_data_dir<P: Into<PathBuf>>(mut self, data_dir: P) -> Self {
        self.storage.data_dir = data_dir.into();
        self
    }

    #[inline]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    #[inline]
    pub fn app(&self) -> &App {
        &self.app
    }
}

impl Storage {
    #[inline]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl App {
    #[inline]
    pub fn seed_catalog(&self) -> bool {
        self.seed_catalog
    }

    #[inline]
    pub fn demo_user(&self) -> bool {
        self.demo_user
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn config_defaults_when_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config.storage().data_dir(), Path::new("./data"));
        assert!(config.app().seed_catalog());
        assert!(config.app().demo_user());
    }

    #[test]
    fn config_partial_file_keeps_defaults() {
        let config = Config::from_slice(b"[storage]\ndata_dir = \"/tmp/ct\"\n").unwrap();
        assert_eq!(config.storage().data_dir(), Path::new("/tmp/ct"));
        assert!(config.app().seed_catalog());
    }

    #[test]
    fn config_malformed_file_is_an_error() {
        let result = Config::from_slice(b"[storage\ndata_dir = 1");
        assert!(matches!(result, Err(ConfigError::TomlDeError(_))));
    }

    #[test]
    fn config_invalid_utf8_is_an_error() {
        let result = Config::from_slice(b"[storage]\ndata_dir = \"\xff\xfe\"\n");
        assert!(matches!(result, Err(ConfigError::TomlDeError(_))));
    }

    #[test]
    fn config_renders_back_to_toml() {
        let config = Config::default().with_data_dir("/var/lib/ct");
        let text = config.to_toml().unwrap();
        let parsed = Config::from_slice(text.as_bytes()).unwrap();
        assert_eq!(parsed.storage().data_dir(), Path::new("/var/lib/ct"));
    }
}
