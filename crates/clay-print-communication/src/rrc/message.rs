//! Wire messages
//!
//! Commands travel as `RobotMessage`s published through a rosbridge
//! connection. Every frame on the socket is one rosbridge operation encoded
//! as a JSON object.

use clay_print_core::ConnectionError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// ROS message type of both command and response topics
pub const ROBOT_MESSAGE_TYPE: &str = "compas_rrc_driver/RobotMessage";

/// RRC robot message, used for commands and responses alike
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotMessage {
    pub instruction: String,
    pub sequence_id: u64,
    #[serde(default)]
    pub feedback_level: i32,
    #[serde(default)]
    pub exec_level: i32,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub feedback_id: i32,
    #[serde(default)]
    pub string_values: Vec<String>,
    #[serde(default)]
    pub float_values: Vec<f64>,
}

/// Rosbridge operations this client sends or understands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BridgeOp {
    Advertise {
        topic: String,
        #[serde(rename = "type")]
        msg_type: String,
    },
    Unadvertise {
        topic: String,
    },
    Subscribe {
        topic: String,
        #[serde(rename = "type")]
        msg_type: String,
    },
    Unsubscribe {
        topic: String,
    },
    Publish {
        topic: String,
        msg: Value,
    },
    Status {
        #[serde(default)]
        level: String,
        #[serde(default)]
        msg: String,
    },
}

impl BridgeOp {
    pub fn publish(topic: &str, message: &RobotMessage) -> Result<Self, ConnectionError> {
        let msg = serde_json::to_value(message).map_err(|e| ConnectionError::Protocol {
            reason: e.to_string(),
        })?;
        Ok(Self::Publish {
            topic: topic.to_string(),
            msg,
        })
    }

    /// Serialize as one newline-terminated JSON line
    pub fn to_line(&self) -> Result<Vec<u8>, ConnectionError> {
        let mut bytes = serde_json::to_vec(self).map_err(|e| ConnectionError::Protocol {
            reason: e.to_string(),
        })?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

/// Incoming traffic relevant to the client
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeEvent {
    /// A response published on the watched topic
    Response(RobotMessage),
    /// Bridge status report
    Status { level: String, message: String },
    /// Anything else (other topics, unknown ops)
    Ignored,
}

/// Parser for incoming rosbridge traffic
#[derive(Debug, Clone)]
pub struct BridgeParser {
    response_topic: String,
}

impl BridgeParser {
    pub fn new(response_topic: impl Into<String>) -> Self {
        Self {
            response_topic: response_topic.into(),
        }
    }

    /// Classify one decoded JSON value
    pub fn parse(&self, value: Value) -> Result<BridgeEvent, ConnectionError> {
        let op = match serde_json::from_value::<BridgeOp>(value) {
            Ok(op) => op,
            Err(_) => return Ok(BridgeEvent::Ignored),
        };

        match op {
            BridgeOp::Publish { topic, msg } if topic == self.response_topic => {
                serde_json::from_value(msg)
                    .map(BridgeEvent::Response)
                    .map_err(|e| ConnectionError::Protocol {
                        reason: format!("bad response on {}: {}", topic, e),
                    })
            }
            BridgeOp::Status { level, msg } => Ok(BridgeEvent::Status {
                level,
                message: msg,
            }),
            _ => Ok(BridgeEvent::Ignored),
        }
    }
}

/// Pull every complete JSON value off the front of `buffer`.
///
/// Values may be concatenated or newline separated. A trailing incomplete
/// value is left in the buffer for the next read. Unreadable bytes discard
/// the rest of the buffer; values decoded before them are still returned
/// along with the error.
pub fn drain_values(buffer: &mut Vec<u8>) -> (Vec<Value>, Option<ConnectionError>) {
    let mut values = Vec::new();
    let mut consumed = 0;
    let mut failure = None;

    {
        let mut stream = serde_json::Deserializer::from_slice(buffer.as_slice()).into_iter::<Value>();
        loop {
            match stream.next() {
                Some(Ok(value)) => {
                    values.push(value);
                    consumed = stream.byte_offset();
                }
                Some(Err(e)) if e.is_eof() => break,
                Some(Err(e)) => {
                    failure = Some(e);
                    break;
                }
                None => {
                    consumed = stream.byte_offset();
                    break;
                }
            }
        }
    }

    match failure {
        Some(e) => {
            buffer.clear();
            let error = ConnectionError::Protocol {
                reason: e.to_string(),
            };
            (values, Some(error))
        }
        None => {
            buffer.drain(..consumed);
            (values, None)
        }
    }
}
