//! Client builder with dependency injection pattern.

use crate::Client;
use anyhow::{Context, Result};
use vanguard_runtime::Runtime;

/// Builder for constructing a Client with proper validation.
#[derive(Default)]
pub struct ClientBuilder {
    runtime: Option<Runtime>,
    watch_events: bool,
}

impl ClientBuilder {
    /// Create a new ClientBuilder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the runtime (required).
    pub fn runtime(mut self, runtime: Runtime) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Forward committed events to the output stream.
    pub fn watch_events(mut self, watch: bool) -> Self {
        self.watch_events = watch;
        self
    }

    /// Build the Client.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime is not set.
    pub fn build(self) -> Result<Client> {
        let runtime = self
            .runtime
            .context("Runtime is required. Use .runtime() to set it.")?;

        Ok(Client {
            runtime,
            watch_events: self.watch_events,
        })
    }
}
