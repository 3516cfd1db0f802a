//! Client configuration: environment first, command-line flags on top.
use std::env;
use std::path::PathBuf;

use vanguard_runtime::{RuntimeConfig, StorageConfig};

/// Settings of the `vanguard` binary.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    pub runtime: RuntimeConfig,
    /// Also write logs to `<log_dir>/vanguard.log`.
    pub log_dir: Option<PathBuf>,
    /// Forward committed events to stdout between replies.
    pub watch_events: bool,
}

impl ClientConfig {
    /// Construct client configuration from environment variables.
    ///
    /// Environment variables (besides the runtime's own `VANGUARD_*` keys):
    /// - `VANGUARD_LOG_DIR` - Directory for the log file (default: stderr only)
    /// - `VANGUARD_WATCH_EVENTS` - Print events on stdout (default: false)
    pub fn from_env() -> Self {
        let mut config = Self {
            runtime: RuntimeConfig::from_env(),
            ..Self::default()
        };

        if let Some(dir) = read_env::<PathBuf>("VANGUARD_LOG_DIR") {
            config.log_dir = Some(dir);
        }
        if let Some(watch) = read_env_bool("VANGUARD_WATCH_EVENTS") {
            config.watch_events = watch;
        }

        config
    }

    /// Applies command-line overrides.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        let data_dir = overrides.data_dir;
        match overrides.storage {
            Some(StorageKind::Memory) => self.runtime.storage = StorageConfig::Memory,
            Some(StorageKind::File) => {
                let base_dir = data_dir
                    .or_else(|| self.file_dir())
                    .unwrap_or_else(StorageConfig::default_data_dir);
                self.runtime.storage = StorageConfig::file(base_dir);
            }
            None => {
                if let Some(dir) = data_dir {
                    self.runtime.storage = StorageConfig::file(dir);
                }
            }
        }

        if overrides.log_dir.is_some() {
            self.log_dir = overrides.log_dir;
        }
        self.watch_events |= overrides.watch_events;
        self
    }

    fn file_dir(&self) -> Option<PathBuf> {
        match &self.runtime.storage {
            StorageConfig::File { base_dir } => Some(base_dir.clone()),
            StorageConfig::Memory => None,
        }
    }
}

/// Storage backend selectable on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum StorageKind {
    Memory,
    File,
}

/// Flags that take precedence over the environment.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub storage: Option<StorageKind>,
    pub data_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub watch_events: bool,
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
