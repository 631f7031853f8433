//! clay-print settings crate
//!
//! Handles the run configuration: defaults, file persistence and validation.

pub mod config;
pub mod manager;

pub use config::{
    ConnectionSettings, DispatchSettings, PrintConfig, PrintSettings, RobotSettings,
    ROBOT_JOINT_COUNT,
};
pub use manager::SettingsManager;
