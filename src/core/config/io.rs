//! Reading and writing `config.toml`.

use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tempfile::Builder;
use tracing::debug;

use crate::core::config::data::{path_display, Config};

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug)]
pub enum ConfigError {
    /// The settings file exists but could not be read.
    Read { path: PathBuf, source: io::Error },
    /// The settings file is not valid TOML for [`Config`].
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// The platform reports no config directory (no home directory).
    NoConfigDir,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "cannot read settings file {}: {source}", path_display(path))
            }
            ConfigError::Parse { path, source } => {
                write!(f, "settings file {} is invalid: {source}", path_display(path))
            }
            ConfigError::NoConfigDir => {
                write!(f, "no config directory available on this platform")
            }
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::NoConfigDir => None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Config, Box<dyn StdError>> {
        Self::load_from_path(&Self::get_config_path()?)
    }

    pub fn save(&self) -> Result<(), Box<dyn StdError>> {
        self.save_to_path(&Self::get_config_path()?)
    }

    /// Reads settings from `path`. A file that does not exist yet means
    /// every setting is at its default.
    pub fn load_from_path(path: &Path) -> Result<Config, Box<dyn StdError>> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path_display(path), "no settings file, using defaults");
                return Ok(Config::default());
            }
            Err(source) => {
                let path = path.to_path_buf();
                return Err(ConfigError::Read { path, source }.into());
            }
        };

        toml::from_str(&contents).map_err(|source| {
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
            .into()
        })
    }

    /// Writes settings to `path` through a sibling temp file, so a crash
    /// mid-write never leaves a truncated file behind.
    pub fn save_to_path(&self, path: &Path) -> Result<(), Box<dyn StdError>> {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut staged = Builder::new()
            .prefix(".chatreveal-")
            .suffix(".toml")
            .tempfile_in(dir)?;
        staged.write_all(toml::to_string_pretty(self)?.as_bytes())?;
        staged.as_file().sync_all()?;
        staged.persist(path).map_err(|err| err.error)?;

        debug!(path = %path_display(path), "settings saved");
        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf, ConfigError> {
        ProjectDirs::from("org", "chatreveal", "chatreveal")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }
}
