//! Vanguard client: wires the runtime to a line-delimited JSON session.
//!
//! # Architecture
//!
//! ```text
//! Client (Top-level container)
//!   ├─→ Runtime (game workers, repository, event bus)
//!   └─→ Session (stdin requests in, replies and events out)
//! ```
//!
//! The session talks to the runtime only through a
//! [`RuntimeHandle`](vanguard_runtime::RuntimeHandle).

mod builder;
pub mod config;
pub mod logging;
pub mod protocol;

pub use builder::ClientBuilder;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast::{self, error::RecvError};
use vanguard_runtime::{Event, Runtime, Topic};

use protocol::Reply;

/// Top-level client container.
///
/// # Lifecycle
///
/// 1. `Client::builder()` receives an already built runtime
/// 2. `Client::run()` answers requests until the input ends
/// 3. The runtime is shut down once every game worker has drained
pub struct Client {
    runtime: Runtime,
    watch_events: bool,
}

impl Client {
    /// Create a new ClientBuilder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Serve requests from `input` until end of stream.
    ///
    /// Each reply is written as one JSON line. With event watching enabled,
    /// committed events are interleaved as `{"event": ...}` lines.
    pub async fn run<R, W>(self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let handle = self.runtime.handle();
        let (mut games, mut lifecycle) = if self.watch_events {
            (
                Some(handle.subscribe(Topic::Game)),
                Some(handle.subscribe(Topic::Lifecycle)),
            )
        } else {
            (None, None)
        };

        let mut lines = input.lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read request")? else {
                        break;
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    let reply = protocol::handle_line(&handle, &line).await;
                    write_reply(&mut output, &reply).await?;
                }
                Some(event) = next_event(&mut games) => {
                    write_reply(&mut output, &Reply::Event { event }).await?;
                }
                Some(event) = next_event(&mut lifecycle) => {
                    write_reply(&mut output, &Reply::Event { event }).await?;
                }
            }
        }

        // Events of the last request may still be queued.
        for receiver in [&mut games, &mut lifecycle].into_iter().flatten() {
            while let Ok(event) = receiver.try_recv() {
                write_reply(&mut output, &Reply::Event { event }).await?;
            }
        }

        tracing::info!("Input closed, shutting down");
        drop(handle);
        self.runtime.shutdown().await?;
        Ok(())
    }
}

/// Next event from an optional subscription; pends forever when absent.
async fn next_event(receiver: &mut Option<broadcast::Receiver<Event>>) -> Option<Event> {
    let Some(rx) = receiver.as_mut() else {
        return std::future::pending().await;
    };
    loop {
        match rx.recv().await {
            Ok(event) => return Some(event),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!("Event stream lagged, {} events skipped", skipped);
            }
            Err(RecvError::Closed) => {
                *receiver = None;
                return None;
            }
        }
    }
}

async fn write_reply<W>(output: &mut W, reply: &Reply) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_vec(reply).context("Failed to encode reply")?;
    line.push(b'\n');
    output
        .write_all(&line)
        .await
        .context("Failed to write reply")?;
    output.flush().await.context("Failed to flush reply")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn session(watch_events: bool, input: &str) -> Vec<Value> {
        let runtime = Runtime::builder().build().await.unwrap();
        let client = Client::builder()
            .runtime(runtime)
            .watch_events(watch_events)
            .build()
            .unwrap();

        let mut output = Vec::new();
        client.run(input.as_bytes(), &mut output).await.unwrap();

        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn one_reply_per_request_line() {
        let input = "{\"op\":\"createGame\"}\n\n{\"op\":\"listGames\"}\n";
        let lines = session(false, input).await;

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["result"]["phase"], "deck-selection");
        assert_eq!(lines[1]["result"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn watched_sessions_include_lifecycle_events() {
        let lines = session(true, "{\"op\":\"createGame\"}\n").await;

        assert!(lines.iter().any(|line| line.get("result").is_some()));
        assert!(
            lines
                .iter()
                .any(|line| line["event"]["lifecycle"]["type"] == "gameCreated")
        );
    }
}
