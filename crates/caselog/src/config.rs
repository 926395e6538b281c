//! Configuration management for caselog.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "caselog";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "crimes.db";

/// Default photo directory name, under the data directory.
const PHOTO_DIR_NAME: &str = "photos";

/// Environment variable prefix.
const ENV_PREFIX: &str = "CASELOG_";

/// Upper bound on `seed.count`.
pub const MAX_SEED_COUNT: usize = 10_000;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `CASELOG_`, sections split on `__`)
/// 2. TOML config file at `~/.config/caselog/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Sample data configuration.
    pub seed: SeedConfig,
    /// Store worker configuration.
    pub worker: WorkerConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/caselog/crimes.db`
    pub database_path: Option<PathBuf>,
    /// Directory holding record photos.
    /// Defaults to `~/.local/share/caselog/photos`
    pub photo_dir: Option<PathBuf>,
}

/// Sample data written into an empty store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Seed an empty store when it is opened.
    pub enabled: bool,
    /// Number of sample records.
    pub count: usize,
    /// Fixed random seed. Unset means a different sample set per install.
    pub rng_seed: Option<u64>,
}

/// Store worker configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Maximum number of queued requests.
    pub queue_capacity: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            count: 100,
            rng_seed: None,
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self { queue_capacity: 64 }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        Self::from_figment(Self::figment(config_file))
    }

    /// The layered configuration sources for the given file.
    #[must_use]
    pub fn figment(config_file: PathBuf) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Extract and validate a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if extraction or validation fails.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.seed.count > MAX_SEED_COUNT {
            return Err(Error::ConfigValidation {
                message: format!(
                    "seed.count ({}) cannot exceed {MAX_SEED_COUNT}",
                    self.seed.count
                ),
            });
        }

        if self.worker.queue_capacity == 0 {
            return Err(Error::ConfigValidation {
                message: "worker.queue_capacity must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the photo directory, resolving defaults if not set.
    #[must_use]
    pub fn photo_dir(&self) -> PathBuf {
        self.storage
            .photo_dir
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(PHOTO_DIR_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert!(config.storage.photo_dir.is_none());
        assert!(config.seed.enabled);
        assert_eq!(config.seed.count, 100);
        assert!(config.seed.rng_seed.is_none());
        assert_eq!(config.worker.queue_capacity, 64);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_seed_count_too_large() {
        let mut config = Config::default();
        config.seed.count = MAX_SEED_COUNT + 1;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("seed.count"));
    }

    #[test]
    fn test_validate_zero_queue_capacity() {
        let mut config = Config::default();
        config.worker.queue_capacity = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("queue_capacity"));
    }

    #[test]
    fn test_database_path_default() {
        let path = Config::default().database_path();
        assert!(path.ends_with("caselog/crimes.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_photo_dir_default() {
        let path = Config::default().photo_dir();
        assert!(path.ends_with("caselog/photos"));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.ends_with("caselog/config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Inside a jail so env overrides from other tests cannot leak in.
        Jail::expect_with(|_jail| {
            let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_toml_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [storage]
                photo_dir = "/srv/photos"

                [seed]
                count = 12
                rng_seed = 99
                "#,
            )?;

            let config = Config::from_figment(Config::figment("config.toml".into()))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.photo_dir(), PathBuf::from("/srv/photos"));
            assert_eq!(config.seed.count, 12);
            assert_eq!(config.seed.rng_seed, Some(99));
            assert!(config.seed.enabled);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_toml() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[seed]\nenabled = true\n")?;
            jail.set_env("CASELOG_SEED__ENABLED", "false");
            jail.set_env("CASELOG_STORAGE__DATABASE_PATH", "/tmp/env.db");

            let config = Config::from_figment(Config::figment("config.toml".into()))
                .map_err(|e| e.to_string())?;
            assert!(!config.seed.enabled);
            assert_eq!(config.database_path(), PathBuf::from("/tmp/env.db"));
            Ok(())
        });
    }

    #[test]
    fn test_invalid_file_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[worker]\nqueue_capacity = 0\n")?;

            let result = Config::from_figment(Config::figment("config.toml".into()));
            assert!(matches!(result, Err(Error::ConfigValidation { .. })));
            Ok(())
        });
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("queue_capacity"));
        assert!(json.contains("rng_seed"));
    }

    #[test]
    fn test_seed_config_deserialize() {
        let json = r#"{"count": 5}"#;
        let seed: SeedConfig = serde_json::from_str(json).unwrap();
        assert_eq!(seed.count, 5);
        assert!(seed.enabled);
    }
}
