//! RRC protocol support
//!
//! Typed robot commands and the rosbridge messages that carry them.

pub mod commands;
pub mod message;

pub use commands::{ExecutionLevel, FeedbackLevel, Instruction, Motion, RobotCommand, Zone};
pub use message::{drain_values, BridgeEvent, BridgeOp, BridgeParser, RobotMessage, ROBOT_MESSAGE_TYPE};
