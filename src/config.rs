use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "listed.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port the REST API binds to
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    crate::rest::DEFAULT_PORT
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root directory for persisted state (listings, logs)
    #[serde(default = "default_data_dir")]
    pub data: String,
}

fn default_data_dir() -> String {
    "./data".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Write logs to a file under the data directory instead of stderr
    #[serde(default)]
    pub to_file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: false,
        }
    }
}

impl Config {
    /// Load configuration from an explicit path, or from `listed.toml` in
    /// the working directory when present, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.paths.data)
    }

    /// Directory holding one JSON file per listing.
    pub fn listings_path(&self) -> PathBuf {
        self.data_path().join("listings")
    }

    pub fn logs_path(&self) -> PathBuf {
        self.data_path().join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, crate::rest::DEFAULT_PORT);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.to_file);
        assert!(config.listings_path().ends_with("listings"));
        assert!(config.logs_path().ends_with("logs"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str("[server]\nport = 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.paths.data, "./data");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_missing_explicit_path_errors() {
        let result = Config::load(Some(Path::new("/nonexistent/listed.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listed.toml");
        std::fs::write(&path, "[paths]\ndata = \"/var/lib/listed\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.paths.data, "/var/lib/listed");
        assert_eq!(config.server.port, crate::rest::DEFAULT_PORT);
    }
}
