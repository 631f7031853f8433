//! # clay-print communication
//!
//! Robot-side plumbing for clay-print:
//! - RRC command vocabulary and its rosbridge wire encoding
//! - the [`RobotClient`] transport trait with a TCP rosbridge implementation
//! - throttled dispatch that bounds commands in flight

pub mod communication;
pub mod rrc;

pub use communication::{
    CompletionHandle, CompletionSender, ConnectionParams, DispatchStats, Feedback,
    RobotClient, RosBridgeClient, ThrottledDispatcher, ThrottledDispatcherConfig,
};

pub use rrc::{ExecutionLevel, FeedbackLevel, Instruction, Motion, RobotCommand, Zone};
