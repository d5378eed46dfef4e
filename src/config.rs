//! Support for configuration options
//!
//! Options are read from an optional JSON file. Every field can be omitted and has a default value.

use std::error::Error;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable that overrides the path of the data file
pub const DATA_FILE_ENV: &str = "TODO_CALENDAR_DATA";

/// Where tasks are saved when nothing else is configured
pub fn default_data_file() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".local/share/todo-calendar/tasks.json"),
        None => PathBuf::from("tasks.json"),
    }
}


#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The file tasks are saved to
    pub data_file: PathBuf,
    pub writer: WriterConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            writer: WriterConfig::default(),
        }
    }
}

impl Config {
    /// Read a configuration file
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let file = match std::fs::File::open(path) {
            Err(err) => {
                return Err(format!("Unable to open file {:?}: {}", path, err).into());
            },
            Ok(file) => file,
        };
        let config = serde_json::from_reader(file)
            .map_err(|err| format!("Invalid configuration file {:?}: {}", path, err))?;
        Ok(config)
    }

    /// Read a configuration file if one is given, and fall back to the defaults in case it is invalid.
    /// Environment overrides are applied afterwards.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let config = match path {
            None => Self::default(),
            Some(path) => Self::from_file(path).unwrap_or_else(|err| {
                log::warn!("{}. Using the default configuration", err);
                Self::default()
            }),
        };
        config.with_data_file_override(std::env::var_os(DATA_FILE_ENV))
    }

    /// Replace the data file, in case `value` is set and non-empty
    pub fn with_data_file_override(mut self, value: Option<OsString>) -> Self {
        if let Some(path) = value {
            if path.is_empty() == false {
                self.data_file = PathBuf::from(path);
            }
        }
        self
    }
}


/// Tunes how snapshots are written, see [`crate::persistence::writer`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// How long to wait after a change before writing, so that rapid successive changes result in a single write.
    /// `0` writes as soon as possible.
    pub debounce_ms: u64,
    /// How long a single write may take before it is considered failed
    pub write_timeout_ms: u64,
    /// How many times a failed write is attempted again before being abandoned
    pub max_retries: u32,
    /// Pause between two attempts of the same write
    pub retry_delay_ms: u64,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 0,
            write_timeout_ms: 5000,
            max_retries: 3,
            retry_delay_ms: 200,
        }
    }
}

impl WriterConfig {
    pub fn debounce(&self) -> Duration      { Duration::from_millis(self.debounce_ms)      }
    pub fn write_timeout(&self) -> Duration { Duration::from_millis(self.write_timeout_ms) }
    pub fn retry_delay(&self) -> Duration   { Duration::from_millis(self.retry_delay_ms)   }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_files_use_defaults() {
        let folder = tempfile::tempdir().unwrap();
        let path = folder.path().join("config.json");
        std::fs::write(&path, r#"{"data_file": "/tmp/tasks.json", "writer": {"max_retries": 0}}"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.data_file, PathBuf::from("/tmp/tasks.json"));
        assert_eq!(config.writer.max_retries, 0);
        assert_eq!(config.writer.write_timeout(), Duration::from_secs(5));
        assert_eq!(config.writer.debounce(), Duration::from_millis(0));
    }

    #[test]
    fn invalid_files_are_errors() {
        let folder = tempfile::tempdir().unwrap();
        let path = folder.path().join("config.json");
        assert!(Config::from_file(&path).is_err());

        std::fs::write(&path, "not json").unwrap();
        assert!(Config::from_file(&path).is_err());
        assert_eq!(Config::load_or_default(Some(&path)).writer, WriterConfig::default());
    }

    #[test]
    fn data_file_override() {
        let config = Config::default().with_data_file_override(Some(OsString::from("/srv/tasks.json")));
        assert_eq!(config.data_file, PathBuf::from("/srv/tasks.json"));

        let config = config.with_data_file_override(Some(OsString::new()));
        assert_eq!(config.data_file, PathBuf::from("/srv/tasks.json"));

        let config = config.with_data_file_override(None);
        assert_eq!(config.data_file, PathBuf::from("/srv/tasks.json"));
    }
}
