//! TCP rosbridge client
//!
//! Talks to a rosbridge TCP server that relays RRC robot messages to the
//! robot driver. On connect the client advertises the command topic and
//! subscribes to the response topic; a background task reads responses and
//! resolves the matching completion handles.

use super::{CompletionHandle, CompletionSender, ConnectionParams, Feedback, RobotClient};
use crate::rrc::{drain_values, BridgeEvent, BridgeOp, BridgeParser, RobotCommand, ROBOT_MESSAGE_TYPE};
use async_trait::async_trait;
use clay_print_core::{ConnectionError, ControllerError, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

type PendingMap = Arc<Mutex<HashMap<u64, CompletionSender>>>;

/// Robot client speaking rosbridge JSON over TCP
pub struct RosBridgeClient {
    params: ConnectionParams,
    writer: Option<OwnedWriteHalf>,
    reader_task: Option<JoinHandle<()>>,
    pending: PendingMap,
    next_sequence_id: u64,
}

impl RosBridgeClient {
    /// Open the connection and set up topics
    pub async fn connect(params: ConnectionParams) -> Result<Self> {
        let address = format!("{}:{}", params.host, params.port);
        let timeout_ms = params.connect_timeout_ms;

        let stream = tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            TcpStream::connect(&address),
        )
        .await
        .map_err(|_| ConnectionError::ConnectionTimeout { timeout_ms })?
        .map_err(|e| ConnectionError::FailedToConnect {
            host: params.host.clone(),
            port: params.port,
            reason: e.to_string(),
        })?;
        stream.set_nodelay(true)?;

        let (read_half, write_half) = stream.into_split();
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let parser = BridgeParser::new(params.response_topic());
        let reader_task = tokio::spawn(read_loop(read_half, parser, pending.clone()));

        let mut client = Self {
            params,
            writer: Some(write_half),
            reader_task: Some(reader_task),
            pending,
            next_sequence_id: 1,
        };

        let advertise = BridgeOp::Advertise {
            topic: client.params.command_topic(),
            msg_type: ROBOT_MESSAGE_TYPE.to_string(),
        };
        let subscribe = BridgeOp::Subscribe {
            topic: client.params.response_topic(),
            msg_type: ROBOT_MESSAGE_TYPE.to_string(),
        };
        client.write_op(&advertise).await?;
        client.write_op(&subscribe).await?;

        tracing::info!("Connected to {}", address);
        Ok(client)
    }

    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    /// Number of sent commands still waiting for a response
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    async fn write_op(&mut self, op: &BridgeOp) -> Result<()> {
        let line = op.to_line()?;
        let writer = self.writer.as_mut().ok_or(ControllerError::NotConnected)?;
        writer
            .write_all(&line)
            .await
            .map_err(|e| ConnectionError::IoError {
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

#[async_trait]
impl RobotClient for RosBridgeClient {
    async fn send(&mut self, command: RobotCommand) -> Result<Option<CompletionHandle>> {
        if self.writer.is_none() {
            return Err(ControllerError::NotConnected.into());
        }

        let sequence_id = self.next_sequence_id;
        self.next_sequence_id += 1;

        let handle = if command.feedback.expects_response() {
            let (tx, handle) = CompletionHandle::channel(sequence_id);
            self.pending.lock().insert(sequence_id, tx);
            Some(handle)
        } else {
            None
        };

        tracing::trace!("[{}] {}", sequence_id, command);
        let message = command.to_message(sequence_id);
        let op = BridgeOp::publish(&self.params.command_topic(), &message)?;
        if let Err(e) = self.write_op(&op).await {
            self.pending.lock().remove(&sequence_id);
            return Err(e);
        }

        Ok(handle)
    }

    async fn close(&mut self) -> Result<()> {
        if self.writer.is_none() {
            return Ok(());
        }

        let unsubscribe = BridgeOp::Unsubscribe {
            topic: self.params.response_topic(),
        };
        let unadvertise = BridgeOp::Unadvertise {
            topic: self.params.command_topic(),
        };
        let result = match self.write_op(&unsubscribe).await {
            Ok(()) => self.write_op(&unadvertise).await,
            Err(e) => Err(e),
        };

        if let Some(mut writer) = self.writer.take() {
            let _ = writer.shutdown().await;
        }
        if let Some(task) = self.reader_task.take() {
            task.abort();
        }
        fail_pending(&self.pending, "connection closed");

        tracing::info!("Disconnected from {}:{}", self.params.host, self.params.port);
        result
    }

    fn is_connected(&self) -> bool {
        self.writer.is_some()
    }
}

impl Drop for RosBridgeClient {
    fn drop(&mut self) {
        if let Some(task) = self.reader_task.take() {
            task.abort();
        }
    }
}

async fn read_loop(mut reader: OwnedReadHalf, parser: BridgeParser, pending: PendingMap) {
    let mut buffer = Vec::with_capacity(4096);
    let mut chunk = [0u8; 4096];

    let reason = loop {
        let n = match reader.read(&mut chunk).await {
            Ok(0) => break "connection closed by peer".to_string(),
            Ok(n) => n,
            Err(e) => break e.to_string(),
        };
        buffer.extend_from_slice(&chunk[..n]);

        let (values, error) = drain_values(&mut buffer);

        for value in values {
            match parser.parse(value) {
                Ok(BridgeEvent::Response(message)) => {
                    let sequence_id = message.sequence_id;
                    match pending.lock().remove(&sequence_id) {
                        Some(tx) => {
                            let _ = tx.send(Ok(Feedback::from(message)));
                        }
                        None => tracing::debug!("Response for untracked command {}", sequence_id),
                    }
                }
                Ok(BridgeEvent::Status { level, message }) => {
                    if level == "error" {
                        tracing::error!("Bridge: {}", message);
                    } else {
                        tracing::warn!("Bridge {}: {}", level, message);
                    }
                }
                Ok(BridgeEvent::Ignored) => {}
                Err(e) => tracing::warn!("{}", e),
            }
        }
        if let Some(e) = error {
            tracing::warn!("Discarding unreadable bridge data: {}", e);
        }
    };

    tracing::warn!("Bridge reader stopped: {}", reason);
    fail_pending(&pending, &reason);
}

fn fail_pending(pending: &PendingMap, reason: &str) {
    let drained: Vec<_> = pending.lock().drain().collect();
    for (_, tx) in drained {
        let _ = tx.send(Err(ConnectionError::ConnectionLost {
            reason: reason.to_string(),
        }));
    }
}
