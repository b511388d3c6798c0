use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "AUTO_LIBRARY_CONFIG";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub library: LibraryConfig,

    #[serde(default)]
    pub stores: StoresConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryConfig {
    /// Directory searched for an existing library, and where a new one is created.
    #[serde(default = "default_library_root")]
    pub root: PathBuf,

    /// Empty database copied into the root when no library exists.
    #[serde(default = "default_template")]
    pub template: PathBuf,

    /// Substring a file name must contain to count as a library database.
    #[serde(default = "default_marker")]
    pub marker: String,

    /// File name given to the database copied from the template.
    #[serde(default = "default_database_name")]
    pub database_name: String,
}

fn default_library_root() -> PathBuf {
    PathBuf::from("/calibre-library")
}

fn default_template() -> PathBuf {
    PathBuf::from("/app/calibre-web-automated/empty_library/metadata.db")
}

fn default_marker() -> String {
    "metadata.db".to_string()
}

fn default_database_name() -> String {
    "metadata.db".to_string()
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            root: default_library_root(),
            template: default_template(),
            marker: default_marker(),
            database_name: default_database_name(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoresConfig {
    #[serde(default = "default_dirs_json")]
    pub dirs_json: PathBuf,

    /// Key in dirs.json that holds the library directory.
    #[serde(default = "default_dirs_json_key")]
    pub dirs_json_key: String,

    /// Calibre-Web application database containing the `settings` table.
    #[serde(default = "default_app_db")]
    pub app_db: PathBuf,
}

fn default_dirs_json() -> PathBuf {
    PathBuf::from("/app/calibre-web-automated/dirs.json")
}

fn default_dirs_json_key() -> String {
    "calibre_library_dir".to_string()
}

fn default_app_db() -> PathBuf {
    PathBuf::from("/config/app.db")
}

impl Default for StoresConfig {
    fn default() -> Self {
        Self {
            dirs_json: default_dirs_json(),
            dirs_json_key: default_dirs_json_key(),
            app_db: default_app_db(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// Also send log records to systemd-journald (Linux only).
    #[serde(default)]
    pub journald: bool,

    /// Directory for a daily rolling log file. Stdout only when unset.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Load from `$AUTO_LIBRARY_CONFIG` or the default location.
    ///
    /// Falls back to built-in defaults when no file exists there. The
    /// defaults are not written back to disk.
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::load_from(Path::new(&path));
        }

        let config_path = Self::config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load from an explicit path. A missing file is an error here.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("auto-library")
            .join("config.toml")
    }
}
