//! Robot client abstraction
//!
//! [`RobotClient`] is the seam between command sequencing and transport.
//! Sending a command that requests feedback yields a [`CompletionHandle`]
//! which resolves once the robot reports the command as executed.

pub mod buffered;
pub mod tcp;

pub use buffered::{DispatchStats, ThrottledDispatcher, ThrottledDispatcherConfig};
pub use tcp::RosBridgeClient;

use crate::rrc::{FeedbackLevel, RobotCommand, RobotMessage};
use async_trait::async_trait;
use clay_print_core::{ConnectionError, ControllerError, Result};
use std::time::Duration;
use tokio::sync::oneshot;

/// Where and how to reach the robot driver bridge
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionParams {
    pub host: String,
    pub port: u16,
    /// Robot namespace, e.g. `/rob1`
    pub namespace: String,
    pub connect_timeout_ms: u64,
}

impl ConnectionParams {
    pub fn command_topic(&self) -> String {
        format!("{}/robot_command", self.namespace.trim_end_matches('/'))
    }

    pub fn response_topic(&self) -> String {
        format!("{}/robot_response", self.namespace.trim_end_matches('/'))
    }
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9090,
            namespace: "/rob1".to_string(),
            connect_timeout_ms: 5000,
        }
    }
}

/// Response reported by the robot for an executed command
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub sequence_id: u64,
    pub instruction: String,
    pub feedback: String,
    pub string_values: Vec<String>,
    pub float_values: Vec<f64>,
}

impl From<RobotMessage> for Feedback {
    fn from(msg: RobotMessage) -> Self {
        Self {
            sequence_id: msg.sequence_id,
            instruction: msg.instruction,
            feedback: msg.feedback,
            string_values: msg.string_values,
            float_values: msg.float_values,
        }
    }
}

/// Sender half that resolves a [`CompletionHandle`]
pub type CompletionSender = oneshot::Sender<std::result::Result<Feedback, ConnectionError>>;

/// Awaitable token for one sent command
#[derive(Debug)]
pub struct CompletionHandle {
    sequence_id: u64,
    receiver: oneshot::Receiver<std::result::Result<Feedback, ConnectionError>>,
}

impl CompletionHandle {
    /// Create a handle together with the sender that resolves it
    pub fn channel(sequence_id: u64) -> (CompletionSender, Self) {
        let (tx, rx) = oneshot::channel();
        (
            tx,
            Self {
                sequence_id,
                receiver: rx,
            },
        )
    }

    pub fn sequence_id(&self) -> u64 {
        self.sequence_id
    }

    /// Block until the command has executed.
    ///
    /// With a timeout, running out of time is an error; the command is not
    /// assumed to have completed.
    pub async fn wait(self, timeout: Option<Duration>) -> Result<Feedback> {
        let sequence_id = self.sequence_id;
        let outcome = match timeout {
            Some(limit) => tokio::time::timeout(limit, self.receiver)
                .await
                .map_err(|_| ControllerError::Timeout {
                    sequence_id,
                    timeout_ms: limit.as_millis() as u64,
                })?,
            None => self.receiver.await,
        };

        match outcome {
            Ok(result) => Ok(result?),
            Err(_) => Err(ConnectionError::ConnectionLost {
                reason: format!("no response for command {}", sequence_id),
            }
            .into()),
        }
    }
}

/// Transport to the robot driver
#[async_trait]
pub trait RobotClient: Send {
    /// Submit a command.
    ///
    /// Returns a handle only if the command requests feedback.
    async fn send(&mut self, command: RobotCommand) -> Result<Option<CompletionHandle>>;

    /// Submit a command with Done feedback and wait for it to execute
    async fn send_and_wait(
        &mut self,
        command: RobotCommand,
        timeout: Option<Duration>,
    ) -> Result<Feedback> {
        let command = if command.feedback.expects_response() {
            command
        } else {
            command.with_feedback(FeedbackLevel::Done)
        };
        let description = command.to_string();
        match self.send(command).await? {
            Some(handle) => handle.wait(timeout).await,
            None => Err(ControllerError::CommandRejected {
                reason: format!("no completion handle for {}", description),
            }
            .into()),
        }
    }

    /// Release the connection
    async fn close(&mut self) -> Result<()>;

    fn is_connected(&self) -> bool;
}
