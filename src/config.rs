//! Configuration loading and path resolution.
//!
//! Supports CERTSYNC_HOME env var override for testing.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::resource::Location;

/// Paths for certsync data.
#[derive(Debug, Clone)]
pub struct CertsyncPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    pub store_dir: PathBuf,
}

impl CertsyncPaths {
    /// Build paths from base directory (e.g. ProjectDirs data dir or CERTSYNC_HOME).
    pub fn from_base(base: PathBuf) -> Self {
        let config_dir = base.clone();
        let config_file = base.join("config.toml");
        let store_dir = base.join("store");
        Self {
            config_dir,
            config_file,
            store_dir,
        }
    }

    /// Paths for testing: use a temp dir as base.
    pub fn for_test(base: impl AsRef<Path>) -> Self {
        Self::from_base(base.as_ref().to_path_buf())
    }

    /// Get default certsync paths (respects CERTSYNC_HOME).
    pub fn default_paths() -> Self {
        let base = if let Ok(home) = std::env::var("CERTSYNC_HOME") {
            PathBuf::from(home)
        } else if let Some(dirs) = directories::ProjectDirs::from("dev", "certsync", "certsync") {
            dirs.data_dir().to_path_buf()
        } else {
            PathBuf::from(".certsync")
        };
        Self::from_base(base)
    }
}

/// Main config.toml structure: fallback values for store addressing.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Config {
    #[serde(default = "default_location")]
    pub default_location: Location,
    #[serde(default = "default_store")]
    pub default_store: String,
}

fn default_location() -> Location {
    Location::LocalMachine
}

fn default_store() -> String {
    "My".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_location: default_location(),
            default_store: default_store(),
        }
    }
}

impl Config {
    /// Load config from paths (with shared lock when file exists).
    pub fn load(paths: &CertsyncPaths) -> Result<Config> {
        if paths.config_file.is_file() {
            let mut file = fs::OpenOptions::new().read(true).open(&paths.config_file)?;
            fs2::FileExt::lock_shared(&file)?;
            use std::io::Read;
            let mut s = String::new();
            file.read_to_string(&mut s)?;
            let cfg: Config = toml::from_str(&s)?;
            Ok(cfg)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to paths (with exclusive lock). Creates parent dirs if needed.
    pub fn save(&self, paths: &CertsyncPaths) -> Result<()> {
        if let Some(p) = paths.config_file.parent() {
            fs::create_dir_all(p)?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&paths.config_file)?;
        fs2::FileExt::lock_exclusive(&file)?;
        let s = toml::to_string_pretty(self)?;
        use std::io::Write;
        file.write_all(s.as_bytes())?;
        Ok(())
    }
}
