#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const CONFIG_DIR: &str = ".reckon";
pub const CONFIG_FILENAME: &str = "config.toml";
pub const DEFAULT_PROMPT: &str = "reckon> ";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReckonConfig {
    pub version: u32,
    pub prompt: String,
    pub show_history_on_exit: bool,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, overridden by `RECKON_LOG`.
    pub level: String,
    /// Write logs here instead of stderr.
    pub file: Option<PathBuf>,
}

impl Default for ReckonConfig {
    fn default() -> Self {
        Self {
            version: 1,
            prompt: DEFAULT_PROMPT.to_string(),
            show_history_on_exit: false,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

pub fn config_dir(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR)
}

pub fn config_path(project_root: &Path) -> PathBuf {
    config_dir(project_root).join(CONFIG_FILENAME)
}

pub fn create_default_config() -> ReckonConfig {
    ReckonConfig::default()
}

pub fn is_initialized(project_root: &Path) -> bool {
    config_path(project_root).is_file()
}

/// Load `<root>/.reckon/config.toml`, falling back to defaults when absent.
/// Keys missing from the file take their default values.
pub fn load_config(project_root: &Path) -> std::io::Result<ReckonConfig> {
    let path = config_path(project_root);
    if !path.exists() {
        return Ok(create_default_config());
    }

    let raw = fs::read_to_string(&path)?;
    toml::from_str(&raw).map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))
}

pub fn save_config(project_root: &Path, config: &ReckonConfig) -> std::io::Result<()> {
    let path = config_path(project_root);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let raw = toml::to_string_pretty(config)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
    fs::write(path, raw)
}

/// Create the config directory with its `.gitignore` and a default config.
/// Fails with `AlreadyExists` if a config is already present.
pub fn init_project(project_root: &Path) -> std::io::Result<PathBuf> {
    if is_initialized(project_root) {
        return Err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("Reckon already initialized in {}", project_root.display()),
        ));
    }

    let dir = config_dir(project_root);
    fs::create_dir_all(&dir)?;
    let gitignore_path = dir.join(".gitignore");
    if !gitignore_path.exists() {
        fs::write(gitignore_path, "# Reckon logs\n*.log\n*.log.*\n")?;
    }

    save_config(project_root, &create_default_config())?;
    let path = config_path(project_root);
    tracing::info!(path = %path.display(), "created default config");
    Ok(path)
}
