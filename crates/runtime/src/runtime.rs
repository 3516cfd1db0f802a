//! High-level runtime orchestrator.
//!
//! The runtime owns the dispatcher task, wires up the command channel and the
//! event bus, and exposes a builder-based API for transports to drive games.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::repository::{FileGameRepository, GameRepository, InMemoryGameRepository};
use crate::workers::{Command, Dispatcher};

/// Where games are persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StorageConfig {
    /// Process-local; everything is lost on exit.
    #[default]
    Memory,
    /// One directory per game under `base_dir`.
    File { base_dir: PathBuf },
}

impl StorageConfig {
    /// Platform data directory for persisted games
    ///
    /// - Linux: `~/.local/share/vanguard/games` (or `$XDG_DATA_HOME/vanguard/games`)
    /// - macOS: `~/Library/Application Support/vanguard/games`
    /// - Fallback: `./vanguard_data/games`
    pub fn default_data_dir() -> PathBuf {
        directories::ProjectDirs::from("", "", "vanguard")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("./vanguard_data"))
            .join("games")
    }

    pub fn file(base_dir: impl Into<PathBuf>) -> Self {
        StorageConfig::File {
            base_dir: base_dir.into(),
        }
    }

    fn open(&self) -> Result<Arc<dyn GameRepository>> {
        let repository: Arc<dyn GameRepository> = match self {
            StorageConfig::Memory => Arc::new(InMemoryGameRepository::new()),
            StorageConfig::File { base_dir } => Arc::new(FileGameRepository::new(base_dir)?),
        };
        Ok(repository)
    }
}

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub event_buffer_size: usize,
    /// Capacity of the dispatcher queue and of every game mailbox.
    pub command_buffer_size: usize,
    /// Store the pre-command snapshot in every history record.
    pub record_state_before: bool,
    /// A game worker with an empty mailbox for this long is shut down; the
    /// next command for its game starts a fresh one.
    pub worker_idle_timeout: Duration,
    pub storage: StorageConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 100,
            command_buffer_size: 32,
            record_state_before: true,
            worker_idle_timeout: Duration::from_secs(300),
            storage: StorageConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables
    ///
    /// - `VANGUARD_STORAGE`: `memory` or `file`
    /// - `VANGUARD_DATA_DIR`: base directory for file storage
    /// - `VANGUARD_COMMAND_BUFFER`, `VANGUARD_EVENT_BUFFER`: channel capacities
    /// - `VANGUARD_RECORD_STATE_BEFORE`: keep pre-command snapshots in history
    /// - `VANGUARD_WORKER_IDLE_SECS`: idle time before a game worker is evicted
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(capacity) = read_env::<usize>("VANGUARD_COMMAND_BUFFER") {
            config.command_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("VANGUARD_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }
        if let Some(record) = read_env_bool("VANGUARD_RECORD_STATE_BEFORE") {
            config.record_state_before = record;
        }
        if let Some(secs) = read_env::<u64>("VANGUARD_WORKER_IDLE_SECS") {
            config.worker_idle_timeout = Duration::from_secs(secs.max(1));
        }

        let data_dir = read_env::<PathBuf>("VANGUARD_DATA_DIR");
        match env::var("VANGUARD_STORAGE").ok().as_deref() {
            Some("file") => {
                config.storage =
                    StorageConfig::file(data_dir.unwrap_or_else(StorageConfig::default_data_dir));
            }
            Some("memory") => config.storage = StorageConfig::Memory,
            // A data directory alone implies file storage.
            _ => {
                if let Some(dir) = data_dir {
                    config.storage = StorageConfig::file(dir);
                }
            }
        }

        config
    }
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

/// Main runtime that orchestrates games
///
/// Runtime owns the dispatcher task; [`RuntimeHandle`] provides a cloneable
/// façade for transports.
pub struct Runtime {
    handle: RuntimeHandle,
    dispatcher_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully
    ///
    /// Completes once every outstanding handle clone has been dropped and all
    /// game workers have drained their mailboxes.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.dispatcher_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    repository: Option<Arc<dyn GameRepository>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            repository: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an already opened repository instead of `config.storage`.
    pub fn repository(mut self, repository: Arc<dyn GameRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Build the runtime
    pub async fn build(self) -> Result<Runtime> {
        let repository = match self.repository {
            Some(repository) => repository,
            None => self.config.storage.open()?,
        };

        let buffer = self.config.command_buffer_size.max(1);
        let (command_tx, command_rx) = mpsc::channel::<Command>(buffer);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let dispatcher = Dispatcher::new(
            repository,
            event_bus,
            command_rx,
            buffer,
            self.config.record_state_before,
            self.config.worker_idle_timeout,
        );

        let dispatcher_handle = tokio::spawn(async move {
            dispatcher.run().await;
        });

        tracing::info!("Runtime started with {:?} storage", self.config.storage);

        Ok(Runtime {
            handle,
            dispatcher_handle,
        })
    }
}
