//! Configuration for a print run
//!
//! Provides the immutable configuration value handed to the print driver,
//! with file loading, saving and validation. JSON and TOML are supported.
//!
//! Configuration is organized into sections:
//! - Connection (bridge host, port, robot namespace)
//! - Robot (tool, work object, speed limits, home positions)
//! - Print (travel/print speeds, local-Z offset, extruder signal)
//! - Dispatch (throttle granularity and wait timeout)

use clay_print_communication::{ConnectionParams, ThrottledDispatcherConfig, Zone};
use clay_print_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Number of robot joints a home position must list
pub const ROBOT_JOINT_COUNT: usize = 6;

/// Connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Bridge hostname or IP address
    pub host: String,
    /// Bridge TCP port
    pub port: u16,
    /// Robot namespace on the bridge
    pub namespace: String,
    /// Connection timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9090,
            namespace: "/rob1".to_string(),
            timeout_ms: 5000,
        }
    }
}

/// Robot setup sent before printing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotSettings {
    /// Tool data name on the controller
    pub tool: String,
    /// Work object name on the controller
    pub work_object: String,
    /// Acceleration in percent
    pub acceleration: f64,
    /// Acceleration ramp in percent
    pub ramp: f64,
    /// Speed override in percent
    pub speed_override: f64,
    /// Maximum TCP speed in mm/s
    pub max_tcp_speed: f64,
    /// Joint position moved to before printing (degrees)
    pub home_start_joints: Vec<f64>,
    /// Joint position moved to after printing (degrees)
    pub home_end_joints: Vec<f64>,
    /// Digital outputs set to 0 during startup
    pub reset_digital_signals: Vec<String>,
}

impl Default for RobotSettings {
    fn default() -> Self {
        let home = vec![100.0, 20.0, 25.0, 5.0, -40.0, -10.0];
        Self {
            tool: "t_erratic_t25".to_string(),
            work_object: "wobj_pallet_markers".to_string(),
            acceleration: 100.0,
            ramp: 100.0,
            speed_override: 100.0,
            max_tcp_speed: 2500.0,
            home_start_joints: home.clone(),
            home_end_joints: home,
            reset_digital_signals: Vec::new(),
        }
    }
}

/// Path streaming settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintSettings {
    /// Speed for travel moves and positioning (mm/s)
    pub travel_speed: f64,
    /// Speed for extruding moves (mm/s)
    pub print_speed: f64,
    /// Safety offset applied along each frame's local Z axis (mm)
    pub z_offset: f64,
    /// Analog output driving the extruder
    pub extruder_signal: String,
    /// Zone used for path moves
    pub print_zone: Zone,
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            travel_speed: 150.0,
            print_speed: 50.0,
            z_offset: 50.0,
            extruder_signal: "ao_extruder_speed".to_string(),
            print_zone: Zone::Z10,
        }
    }
}

/// Command dispatch settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchSettings {
    /// Commands sent between two completion waits
    pub batch_size: usize,
    /// Limit for each completion wait in milliseconds; absent waits forever
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_timeout_ms: Option<u64>,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            batch_size: 250,
            wait_timeout_ms: None,
        }
    }
}

/// Complete configuration of a print run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintConfig {
    pub connection: ConnectionSettings,
    pub robot: RobotSettings,
    pub print: PrintSettings,
    pub dispatch: DispatchSettings,
}

impl PrintConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::other(format!("Failed to read config file: {}", e)))?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .map_err(|e| Error::other(format!("Invalid JSON config: {}", e)))?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)
                .map_err(|e| Error::other(format!("Invalid TOML config: {}", e)))?
        } else {
            return Err(Error::other("Config file must be .json or .toml"));
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)
                .map_err(|e| Error::other(format!("Failed to serialize config: {}", e)))?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::to_string_pretty(self)
                .map_err(|e| Error::other(format!("Failed to serialize config: {}", e)))?
        } else {
            return Err(Error::other("Config file must be .json or .toml"));
        };

        std::fs::write(path, content)
            .map_err(|e| Error::other(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.connection.host.trim().is_empty() {
            return Err(Error::other("Connection host must not be empty"));
        }
        if self.connection.port == 0 {
            return Err(Error::other("Connection port must be > 0"));
        }
        if self.connection.timeout_ms == 0 {
            return Err(Error::other("Connection timeout must be > 0"));
        }

        if self.robot.tool.trim().is_empty() {
            return Err(Error::other("Tool name must not be empty"));
        }
        if self.robot.work_object.trim().is_empty() {
            return Err(Error::other("Work object name must not be empty"));
        }
        if self.robot.max_tcp_speed <= 0.0 {
            return Err(Error::other("Max TCP speed must be > 0"));
        }
        for (label, joints) in [
            ("start", &self.robot.home_start_joints),
            ("end", &self.robot.home_end_joints),
        ] {
            if joints.len() != ROBOT_JOINT_COUNT {
                return Err(Error::other(format!(
                    "Home {} position needs {} joints, got {}",
                    label,
                    ROBOT_JOINT_COUNT,
                    joints.len()
                )));
            }
        }

        if self.print.travel_speed <= 0.0 || self.print.print_speed <= 0.0 {
            return Err(Error::other("Travel and print speeds must be > 0"));
        }
        if !self.print.z_offset.is_finite() {
            return Err(Error::other("Z offset must be a finite number"));
        }
        if self.print.extruder_signal.trim().is_empty() {
            return Err(Error::other("Extruder signal name must not be empty"));
        }

        if self.dispatch.batch_size == 0 {
            return Err(Error::other("Dispatch batch size must be > 0"));
        }
        if self.dispatch.wait_timeout_ms == Some(0) {
            return Err(Error::other("Wait timeout must be > 0 when set"));
        }

        Ok(())
    }

    /// Connection parameters for the robot client
    pub fn connection_params(&self) -> ConnectionParams {
        ConnectionParams {
            host: self.connection.host.clone(),
            port: self.connection.port,
            namespace: self.connection.namespace.clone(),
            connect_timeout_ms: self.connection.timeout_ms,
        }
    }

    /// Throttle settings for the dispatcher
    pub fn dispatcher_config(&self) -> ThrottledDispatcherConfig {
        ThrottledDispatcherConfig {
            batch_size: self.dispatch.batch_size,
            wait_timeout: self.wait_timeout(),
        }
    }

    pub fn wait_timeout(&self) -> Option<Duration> {
        self.dispatch.wait_timeout_ms.map(Duration::from_millis)
    }
}
