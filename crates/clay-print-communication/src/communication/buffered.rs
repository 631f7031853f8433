//! Throttled command dispatch
//!
//! Streams commands to a [`RobotClient`] and bounds the number of commands
//! in flight by periodically blocking on the most recent completion handle.
//!
//! # Behaviour
//! - Every sent command increments a counter
//! - The newest completion handle replaces any older one
//! - Every `batch_size` commands the newest handle is awaited
//! - Submission errors and wait timeouts abort the stream

use super::{CompletionHandle, RobotClient};
use crate::rrc::RobotCommand;
use clay_print_core::Result;
use std::time::Duration;

/// Configuration for throttled dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct ThrottledDispatcherConfig {
    /// Number of commands sent between two waits
    pub batch_size: usize,
    /// Limit for each wait; `None` waits indefinitely
    pub wait_timeout: Option<Duration>,
}

impl Default for ThrottledDispatcherConfig {
    fn default() -> Self {
        Self {
            batch_size: 250,
            wait_timeout: None,
        }
    }
}

/// Counters for one dispatch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Commands submitted
    pub sent: usize,
    /// Completion handles awaited
    pub waits: usize,
}

/// Sends commands and rendezvous with the robot every `batch_size` commands
#[derive(Debug)]
pub struct ThrottledDispatcher {
    config: ThrottledDispatcherConfig,
    latest: Option<CompletionHandle>,
    stats: DispatchStats,
}

impl ThrottledDispatcher {
    pub fn new(config: ThrottledDispatcherConfig) -> Self {
        Self {
            config,
            latest: None,
            stats: DispatchStats::default(),
        }
    }

    pub fn config(&self) -> &ThrottledDispatcherConfig {
        &self.config
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// Whether a completion handle is held that has not been awaited yet
    pub fn has_outstanding(&self) -> bool {
        self.latest.is_some()
    }

    /// Send one command, waiting first if this completes a batch
    pub async fn dispatch<C>(&mut self, client: &mut C, command: RobotCommand) -> Result<()>
    where
        C: RobotClient + ?Sized,
    {
        if let Some(handle) = client.send(command).await? {
            self.latest = Some(handle);
        }
        self.stats.sent += 1;

        if self.config.batch_size > 0 && self.stats.sent % self.config.batch_size == 0 {
            self.wait_latest().await?;
        }
        Ok(())
    }

    /// Send every command from `commands` in order
    pub async fn stream<C, I>(&mut self, client: &mut C, commands: I) -> Result<DispatchStats>
    where
        C: RobotClient + ?Sized,
        I: IntoIterator<Item = RobotCommand>,
    {
        for command in commands {
            self.dispatch(client, command).await?;
        }
        Ok(self.stats)
    }

    async fn wait_latest(&mut self) -> Result<()> {
        match self.latest.take() {
            Some(handle) => {
                let sequence_id = handle.sequence_id();
                tracing::debug!(
                    "Waiting for command {} after {} sent",
                    sequence_id,
                    self.stats.sent
                );
                handle.wait(self.config.wait_timeout).await.map_err(|e| {
                    tracing::error!("Wait for command {} failed: {}", sequence_id, e);
                    e
                })?;
                self.stats.waits += 1;
            }
            None => {
                tracing::debug!(
                    "No completion handle to wait on after {} commands",
                    self.stats.sent
                );
            }
        }
        Ok(())
    }
}

impl Default for ThrottledDispatcher {
    fn default() -> Self {
        Self::new(ThrottledDispatcherConfig::default())
    }
}
