use crate::error::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_HISTORY_LEN: usize = 50;

const LAST_DIR_FILE: &str = ".gofileyourself_lastdir";
const ANCHORS_FILE: &str = ".gofileyourself_anchors";
const HISTORY_FILE: &str = ".gofileyourselfhistory";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub history_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_len: DEFAULT_HISTORY_LEN,
        }
    }
}

impl Config {
    /// Default config file location, `<config_dir>/gofileyourself/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "gofileyourself")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        let config: Config = toml::from_str(&content)?;
        log::info!("Loaded config from {:?}: {:?}", path, config);
        Ok(config)
    }

    /// Load from an explicit path or the default location, falling back to
    /// defaults on any error.
    pub fn load(explicit: Option<&Path>) -> Self {
        let path = match explicit.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => path,
            None => return Self::default(),
        };
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring config {:?}: {}", path, e);
                Self::default()
            }
        }
    }
}

/// Flat side files shared with the shell wrapper and later sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidePaths {
    pub last_dir: PathBuf,
    pub anchors: PathBuf,
    pub history: PathBuf,
}

impl SidePaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            last_dir: dir.join(LAST_DIR_FILE),
            anchors: dir.join(ANCHORS_FILE),
            history: dir.join(HISTORY_FILE),
        }
    }

    /// Side files under the user's home directory.
    pub fn from_home() -> Option<Self> {
        directories::BaseDirs::new().map(|dirs| Self::in_dir(dirs.home_dir()))
    }
}
