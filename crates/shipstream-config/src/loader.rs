//! Configuration loader with layered sources.

use crate::AppConfig;
use config::{Config, ConfigError, Environment, File};
use shipstream_core::ShipstreamError;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Configuration loader with runtime refresh support.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<AppConfig>>,
    config_dir: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides (not committed)
    /// 4. Environment variables with `SHIPSTREAM_` prefix
    pub fn new(config_dir: impl Into<String>) -> Result<Self, ShipstreamError> {
        let config_dir = config_dir.into();
        let config = Self::load_config(&config_dir)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, ShipstreamError> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    /// Reloads the configuration from disk.
    pub async fn reload(&self) -> Result<(), ShipstreamError> {
        let new_config = Self::load_config(&self.config_dir)?;
        let mut config = self.config.write().await;
        *config = new_config;
        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Loads configuration from the specified directory.
    fn load_config(config_dir: &str) -> Result<AppConfig, ShipstreamError> {
        // Load .env file if present
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment =
            std::env::var("SHIPSTREAM_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        // 1. Load default configuration
        let default_path = format!("{}/default.toml", config_dir);
        if Path::new(&default_path).exists() {
            debug!("Loading default config from: {}", default_path);
            builder = builder.add_source(File::with_name(&default_path).required(false));
        }

        // 2. Load environment-specific configuration
        let env_path = format!("{}/{}.toml", config_dir, environment);
        if Path::new(&env_path).exists() {
            debug!("Loading environment config from: {}", env_path);
            builder = builder.add_source(File::with_name(&env_path).required(false));
        }

        // 3. Load local overrides (not committed to version control)
        let local_path = format!("{}/local.toml", config_dir);
        if Path::new(&local_path).exists() {
            debug!("Loading local config from: {}", local_path);
            builder = builder.add_source(File::with_name(&local_path).required(false));
        }

        // 4. Override with environment variables (SHIPSTREAM_ prefix)
        builder = builder.add_source(
            Environment::with_prefix("SHIPSTREAM")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_error_to_shipstream_error)?;

        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(config_error_to_shipstream_error)?;

        Self::validate_config(&app_config)?;

        Ok(app_config)
    }

    /// Validates the configuration.
    fn validate_config(config: &AppConfig) -> Result<(), ShipstreamError> {
        if config.database.url.is_empty() {
            return Err(ShipstreamError::Configuration(
                "Database URL is required".to_string(),
            ));
        }

        if config.redis.url.is_empty() {
            return Err(ShipstreamError::Configuration(
                "Redis URL is required".to_string(),
            ));
        }

        if config.redis.pool_timeout_secs == 0 {
            return Err(ShipstreamError::Configuration(
                "Redis pool timeout must be positive".to_string(),
            ));
        }

        if config.queue.visibility_timeout_secs == 0 {
            return Err(ShipstreamError::Configuration(
                "Queue visibility timeout must be positive".to_string(),
            ));
        }

        if config.reconciler.enabled && config.reconciler.sweep_interval_secs == 0 {
            return Err(ShipstreamError::Configuration(
                "Reconciler sweep interval must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Gets a specific configuration value by key path.
    pub async fn get_value<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let config = self.config.read().await;
        let json = serde_json::to_value(&*config).ok()?;

        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }

        serde_json::from_value(current.clone()).ok()
    }
}

fn config_error_to_shipstream_error(err: ConfigError) -> ShipstreamError {
    ShipstreamError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_loader_with_missing_dir_uses_defaults() {
        let loader = ConfigLoader::new("/nonexistent-config-dir").unwrap();
        let config = loader.get().await;
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.redis.key_prefix, "shipstream");
    }

    #[tokio::test]
    async fn test_loader_reads_toml_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nport = 9999\n\n[queue]\nvisibility_timeout_secs = 45\n\n[admin]\nenabled = true"
        )
        .unwrap();

        let loader = ConfigLoader::new(dir.path().to_str().unwrap()).unwrap();
        let config = loader.get().await;
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.queue.visibility_timeout_secs, 45);
        assert!(config.admin.enabled);
    }

    #[tokio::test]
    async fn test_loader_rejects_zero_visibility_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[queue]\nvisibility_timeout_secs = 0").unwrap();

        assert!(ConfigLoader::new(dir.path().to_str().unwrap()).is_err());
    }

    #[tokio::test]
    async fn test_loader_rejects_zero_redis_pool_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[redis]\npool_timeout_secs = 0").unwrap();

        assert!(ConfigLoader::new(dir.path().to_str().unwrap()).is_err());
    }

    #[tokio::test]
    async fn test_get_value_by_key_path() {
        let loader = ConfigLoader::new("/nonexistent-config-dir").unwrap();
        let port: Option<u16> = loader.get_value("server.port").await;
        assert_eq!(port, Some(8080));
    }
}
