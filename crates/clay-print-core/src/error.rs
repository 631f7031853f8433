//! Error handling for clay-print
//!
//! Provides error types for all layers of the application:
//! - Input errors (print-job file loading and data-model construction)
//! - Connection errors (transport to the robot driver)
//! - Controller errors (command execution and completion tracking)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Input error type
///
/// Represents errors found while loading a print job or constructing
/// frames and layers from it. These are raised before any command is sent.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// The document is not valid JSON or does not have the expected shape
    #[error("Invalid print file: {reason}")]
    InvalidJson {
        /// Parser message.
        reason: String,
    },

    /// A pose could not be built from the supplied values
    #[error("Invalid pose: {reason}")]
    InvalidPose {
        /// The reason the pose was rejected.
        reason: String,
    },

    /// An extrusion factor could not be coerced to a real number
    #[error("Invalid extrusion factor: {reason}")]
    InvalidExtrusionFactor {
        /// The reason the factor was rejected.
        reason: String,
    },

    /// Poses and extrusion factors of a layer differ in length
    #[error("Layer {layer}: {frames} frames but {factors} extrusion factors")]
    LengthMismatch {
        /// Index of the offending layer.
        layer: usize,
        /// Number of poses in the layer.
        frames: usize,
        /// Number of extrusion factors in the layer.
        factors: usize,
    },

    /// The pose and factor sequences have a different number of layers
    #[error("{frames} layers of frames but {factors} layers of extrusion factors")]
    LayerCountMismatch {
        /// Number of pose layers.
        frames: usize,
        /// Number of factor layers.
        factors: usize,
    },

    /// The print job contains no frames at all
    #[error("Print job contains no frames")]
    EmptyJob,
}

/// Connection error type
///
/// Represents errors on the transport between this process and the
/// robot driver bridge.
#[derive(Error, Debug, Clone)]
pub enum ConnectionError {
    /// Failed to open the connection
    #[error("Failed to connect to {host}:{port}: {reason}")]
    FailedToConnect {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
        /// The reason the connection failed.
        reason: String,
    },

    /// Connection timeout
    #[error("Connection timeout after {timeout_ms}ms")]
    ConnectionTimeout {
        /// The timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// Connection lost
    #[error("Connection lost: {reason}")]
    ConnectionLost {
        /// The reason the connection was lost.
        reason: String,
    },

    /// Peer sent something that is not a valid bridge message
    #[error("Protocol error: {reason}")]
    Protocol {
        /// Decoder message.
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {reason}")]
    IoError {
        /// The reason for the I/O error.
        reason: String,
    },
}

/// Controller error type
///
/// Represents errors related to commands executed by the robot controller.
#[derive(Error, Debug, Clone)]
pub enum ControllerError {
    /// Controller is not connected
    #[error("Controller not connected")]
    NotConnected,

    /// Waiting for a command to complete timed out
    #[error("Command {sequence_id} did not complete within {timeout_ms}ms")]
    Timeout {
        /// Sequence id of the awaited command.
        sequence_id: u64,
        /// The timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// Command was rejected or cannot be awaited
    #[error("Command rejected: {reason}")]
    CommandRejected {
        /// The reason the command was rejected.
        reason: String,
    },
}

/// Main error type for clay-print
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Input error
    #[error(transparent)]
    Input(#[from] InputError),

    /// Connection error
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Controller error
    #[error(transparent)]
    Controller(#[from] ControllerError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Error::Controller(ControllerError::Timeout { .. })
                | Error::Connection(ConnectionError::ConnectionTimeout { .. })
        )
    }

    /// Check if this is a connection error
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Error::Connection(_))
    }

    /// Check if this is an input error
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::Input(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
