//! TOML-based configuration for Folio.
//!
//! Supports a config file (folio.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [connections.default]
//! driver = "sqlite"
//! connection_string = "./data/sales.db"
//!
//! [connections.warehouse]
//! driver = "mssql"
//! connection_string = "${WAREHOUSE_CONNECTION_STRING}"
//!
//! [worker]
//! path = "/usr/local/bin/folio-worker"
//! timeout_secs = 30
//!
//! [canvas]
//! grid_size = 5
//! snap_to_grid = true
//!
//! [page]
//! orientation = "landscape"
//! width = 297
//! height = 210
//!
//! [logging]
//! filter = "folio=debug"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::connection::Driver;
use crate::report::PageSettings;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Connection not found: {0}")]
    ConnectionNotFound(String),

    #[error("No connections configured")]
    NoConnections,

    #[error("Unsupported driver: {0}")]
    UnsupportedDriver(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Named database connections.
    pub connections: HashMap<String, ConnectionSettings>,

    /// Query worker configuration.
    pub worker: WorkerSettings,

    /// Canvas view defaults.
    pub canvas: CanvasSettings,

    /// Page settings for newly created reports.
    pub page: PageSettings,

    pub logging: LoggingSettings,
}

/// Connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionSettings {
    /// Database driver (sqlite, duckdb, mssql, postgres, mysql).
    pub driver: String,

    /// Connection string (supports ${ENV_VAR} expansion).
    pub connection_string: String,
}

impl ConnectionSettings {
    /// Get the driver type.
    pub fn driver_type(&self) -> Result<Driver, SettingsError> {
        self.driver
            .parse()
            .map_err(|_| SettingsError::UnsupportedDriver(self.driver.clone()))
    }

    /// Get the connection string with environment variables expanded.
    pub fn resolved_connection_string(&self) -> Result<String, SettingsError> {
        expand_env_vars(&self.connection_string)
    }
}

/// Worker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkerSettings {
    /// Path to the worker binary. Searched for when unset.
    pub path: Option<String>,

    /// Extra command-line arguments for the worker.
    pub args: Vec<String>,

    /// Per-request timeout. The only query timeout in the pipeline.
    pub timeout_secs: u64,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            path: None,
            args: Vec::new(),
            timeout_secs: 30,
        }
    }
}

impl WorkerSettings {
    /// Get the worker binary path.
    ///
    /// Returns the configured path (env-expanded), or searches the working
    /// directory and `PATH` for `folio-worker`.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.path {
            let expanded = expand_env_vars(path).ok()?;
            return Some(PathBuf::from(expanded));
        }

        let candidates = ["folio-worker", "./folio-worker", "./worker/folio-worker"];

        for candidate in candidates {
            let path = PathBuf::from(candidate);
            if path.exists() {
                return Some(path);
            }
        }

        // Try PATH
        if let Ok(output) = std::process::Command::new("which")
            .arg("folio-worker")
            .output()
        {
            if output.status.success() {
                let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !path.is_empty() {
                    return Some(PathBuf::from(path));
                }
            }
        }

        None
    }
}

/// Canvas view defaults.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CanvasSettings {
    pub grid_size: f64,
    pub snap_to_grid: bool,
    pub show_grid: bool,
    /// Zoom in percent.
    pub zoom: u32,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            grid_size: 10.0,
            snap_to_grid: true,
            show_grid: true,
            zoom: 100,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `FOLIO_CONFIG`
    /// 2. `./folio.toml`
    /// 3. `~/.config/folio/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("FOLIO_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("folio.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("folio").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Get a connection by name.
    pub fn get_connection(&self, name: &str) -> Result<&ConnectionSettings, SettingsError> {
        self.connections
            .get(name)
            .ok_or_else(|| SettingsError::ConnectionNotFound(name.to_string()))
    }

    /// Get the default connection ("default" if it exists, else the first
    /// by name).
    pub fn default_connection(&self) -> Option<(&str, &ConnectionSettings)> {
        if let Some(conn) = self.connections.get("default") {
            return Some(("default", conn));
        }
        self.connections
            .iter()
            .min_by(|a, b| a.0.cmp(b.0))
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Resolve a connection by optional name, falling back to the default.
    pub fn resolve_connection(
        &self,
        name: Option<&str>,
    ) -> Result<(&str, &ConnectionSettings), SettingsError> {
        match name {
            Some(name) => self
                .connections
                .get_key_value(name)
                .map(|(key, conn)| (key.as_str(), conn))
                .ok_or_else(|| SettingsError::ConnectionNotFound(name.to_string())),
            None => self.default_connection().ok_or(SettingsError::NoConnections),
        }
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let mut var_name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            while let Some(&ch) = chars.peek() {
                if !(ch.is_alphanumeric() || ch == '_') {
                    break;
                }
                var_name.push(ch);
                chars.next();
            }
            if var_name.is_empty() {
                // Just a lone $, keep it
                result.push('$');
                continue;
            }
        }

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
