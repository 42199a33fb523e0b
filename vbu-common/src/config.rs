//! Bootstrap configuration and root folder resolution
//!
//! The TOML file only holds what is needed before the document store can be
//! opened (root folder, logging) plus templating defaults for the CLI.
//! Everything else lives in the versioned documents under the root folder.

use crate::templating::MetadataMarkerMode;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "VBU_ROOT_FOLDER";

const APP_DIR: &str = "vbu";
const CONFIG_FILE: &str = "config.toml";

/// Contents of `config.toml`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_folder: Option<PathBuf>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub templating: TemplatingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplatingConfig {
    /// First episode number of a batch
    #[serde(default = "default_starting_number")]
    pub starting_number: u64,
    #[serde(default)]
    pub metadata_markers: MetadataMarkerMode,
    /// Render batches on the rayon pool
    #[serde(default)]
    pub parallel: bool,
}

impl Default for TemplatingConfig {
    fn default() -> Self {
        Self {
            starting_number: default_starting_number(),
            metadata_markers: MetadataMarkerMode::default(),
            parallel: false,
        }
    }
}

fn default_starting_number() -> u64 {
    1
}

/// Values used when nothing else is configured
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            log_level: default_log_level(),
        }
    }
}

fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support").join(APP_DIR))
    } else {
        // ~/.local/share/vbu, %LOCALAPPDATA%\vbu
        dirs::data_local_dir()
            .map(|d| d.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from(".").join(format!("{}_data", APP_DIR)))
    }
}

/// Default location of `config.toml`
pub fn default_config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join(APP_DIR).join(CONFIG_FILE))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
}

/// Root folder resolution, highest priority first:
/// 1. Command-line argument
/// 2. `VBU_ROOT_FOLDER`
/// 3. `root_folder` in the TOML file
/// 4. Compiled default
#[derive(Debug, Clone, Default)]
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    toml_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    pub fn with_toml_config(mut self, config: &TomlConfig) -> Self {
        self.toml_root = config.root_folder.clone();
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            debug!("Root folder from command line: {}", path.display());
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                debug!("Root folder from {}: {}", ROOT_FOLDER_ENV, path);
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.toml_root {
            debug!("Root folder from config file: {}", path.display());
            return path.clone();
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
}

/// Like [`load_toml_config`], but a missing or broken file falls back to
/// defaults with a warning
pub fn load_toml_config_or_default(path: &Path) -> TomlConfig {
    if !path.exists() {
        warn!("Config file {} not found - using defaults", path.display());
        return TomlConfig::default();
    }

    match load_toml_config(path) {
        Ok(config) => config,
        Err(e) => {
            warn!("Could not read config file: {} - using defaults", e);
            TomlConfig::default()
        }
    }
}

/// Write a TOML config atomically (temp file + rename)
///
/// On Unix the file is restricted to 0600.
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let temp_path = temp_path_for(path);
    std::fs::write(&temp_path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    if let Err(e) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e.into());
    }

    debug!("Wrote config file {}", path.display());
    Ok(())
}

/// True if group or others can access the file
#[cfg(unix)]
pub fn check_toml_permissions_loose(path: &Path) -> Result<bool> {
    use std::os::unix::fs::PermissionsExt;
    let mode = std::fs::metadata(path)?.permissions().mode();
    Ok(mode & 0o077 != 0)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| CONFIG_FILE.into());
    name.push(".tmp");
    path.with_file_name(name)
}
