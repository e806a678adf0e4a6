//! Configuration loading and root folder resolution
//!
//! Every value resolves in the same priority order:
//! 1. Command-line argument / environment variable (handled by clap in the binary)
//! 2. TOML config file
//! 3. OS-dependent compiled default (fallback)
//!
//! A missing config file is never an error. A malformed one is reported to the
//! caller, which logs a warning and continues with defaults.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default HTTP port for gatrack-server
pub const DEFAULT_PORT: u16 = 5780;

/// Default bind address (loopback only)
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "gatrack.db";

/// Contents of the optional `config.toml`
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TomlConfig {
    /// Folder holding `gatrack.db`
    pub root_folder: Option<PathBuf>,

    /// HTTP port
    pub port: Option<u16>,

    /// Address the HTTP listener binds to
    pub bind_address: Option<String>,
}

/// Values supplied on the command line (or via clap `env` fallbacks)
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root_folder: Option<PathBuf>,
    pub port: Option<u16>,
    pub bind_address: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub root_folder: PathBuf,
    pub port: u16,
    pub bind_address: String,
}

impl ServiceConfig {
    /// Merge CLI overrides over TOML values over compiled defaults
    pub fn resolve(cli: CliOverrides, toml: TomlConfig) -> Self {
        Self {
            root_folder: cli
                .root_folder
                .or(toml.root_folder)
                .unwrap_or_else(get_default_root_folder),
            port: cli.port.or(toml.port).unwrap_or(DEFAULT_PORT),
            bind_address: cli
                .bind_address
                .or(toml.bind_address)
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
        }
    }

    /// Path of the settings database inside the root folder
    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }

    /// `host:port` string for the listener
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
}

/// Load the config file if one can be found, falling back to defaults
///
/// An explicit path that does not exist is an error; a missing file at the
/// default locations is not.
pub fn load_config_or_default(explicit: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => match default_config_file() {
            Some(path) => path,
            None => {
                debug!("No config file found, using compiled defaults");
                return Ok(TomlConfig::default());
            }
        },
    };

    match load_toml_config(&path) {
        Ok(config) => {
            debug!("Loaded config file: {}", path.display());
            Ok(config)
        }
        Err(e) if explicit.is_none() => {
            warn!("Ignoring unreadable config file ({}), using defaults", e);
            Ok(TomlConfig::default())
        }
        Err(e) => Err(e),
    }
}

/// First existing config file at the platform locations
fn default_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("gatrack").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/gatrack/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Get OS-dependent default root folder path
pub fn get_default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/gatrack (or /var/lib/gatrack for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("gatrack"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/gatrack"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/gatrack
        dirs::data_dir()
            .map(|d| d.join("gatrack"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/gatrack"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\gatrack
        dirs::data_local_dir()
            .map(|d| d.join("gatrack"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\gatrack"))
    } else {
        PathBuf::from("./gatrack_data")
    }
}
