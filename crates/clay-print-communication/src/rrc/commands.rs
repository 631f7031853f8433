//! RRC command vocabulary
//!
//! Typed versions of the instructions understood by the robot-side RRC
//! driver, and their encoding into [`RobotMessage`]s.

use super::message::RobotMessage;
use clay_print_core::Frame;
use std::fmt;

/// Number of joint values a joint move always carries
const JOINT_SLOTS: usize = 6;
/// Number of external-axis values a joint move always carries
const EXTERNAL_AXIS_SLOTS: usize = 6;
/// Value the driver reads as "axis not present"
const UNUSED_AXIS: f64 = 9e9;

/// Positioning zone (blend radius) at a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    /// Stop point, exact positioning
    #[default]
    Fine,
    Z0,
    Z1,
    Z5,
    Z10,
    Z15,
    Z20,
    Z30,
    Z40,
    Z50,
    Z60,
    Z80,
    Z100,
    Z150,
    Z200,
}

impl Zone {
    /// Wire value: -1 for fine, otherwise the blend radius in mm
    pub fn as_value(&self) -> f64 {
        match self {
            Self::Fine => -1.0,
            Self::Z0 => 0.0,
            Self::Z1 => 1.0,
            Self::Z5 => 5.0,
            Self::Z10 => 10.0,
            Self::Z15 => 15.0,
            Self::Z20 => 20.0,
            Self::Z30 => 30.0,
            Self::Z40 => 40.0,
            Self::Z50 => 50.0,
            Self::Z60 => 60.0,
            Self::Z80 => 80.0,
            Self::Z100 => 100.0,
            Self::Z150 => 150.0,
            Self::Z200 => 200.0,
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fine => write!(f, "fine"),
            other => write!(f, "z{}", other.as_value() as i32),
        }
    }
}

/// Interpolation used for a pose move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Joint interpolation
    Joint,
    /// Linear interpolation of the tool centre point
    Linear,
}

impl Motion {
    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Joint => "J",
            Self::Linear => "L",
        }
    }
}

/// How much the driver reports back after executing a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedbackLevel {
    /// No response; the command cannot be awaited
    #[default]
    None,
    /// Respond once the command has been executed
    Done,
    /// Respond with data once executed
    Data,
}

impl FeedbackLevel {
    pub fn as_value(&self) -> i32 {
        match self {
            Self::None => 0,
            Self::Done => 1,
            Self::Data => 2,
        }
    }

    /// True if the driver sends a response for this level
    pub fn expects_response(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Where the instruction is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionLevel {
    /// Queued in the motion task
    #[default]
    Robot,
    /// Executed immediately by the controller task
    Controller,
}

impl ExecutionLevel {
    pub fn as_value(&self) -> i32 {
        match self {
            Self::Robot => 0,
            Self::Controller => 10,
        }
    }
}

/// A single driver instruction with its arguments
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    MoveToJoints {
        joints: Vec<f64>,
        external_axes: Vec<f64>,
        speed: f64,
        zone: Zone,
    },
    MoveToFrame {
        frame: Frame,
        speed: f64,
        zone: Zone,
        motion: Motion,
    },
    SetTool {
        name: String,
    },
    SetWorkObject {
        name: String,
    },
    SetAcceleration {
        acceleration: f64,
        ramp: f64,
    },
    SetMaxSpeed {
        speed_override: f64,
        max_tcp: f64,
    },
    SetDigital {
        signal: String,
        value: u8,
    },
    SetAnalog {
        signal: String,
        value: f64,
    },
    PrintText {
        text: String,
    },
    Stop,
}

impl Instruction {
    /// Procedure name on the driver side
    pub fn name(&self) -> &'static str {
        match self {
            Self::MoveToJoints { .. } => "r_RRC_MoveToJoints",
            Self::MoveToFrame { .. } => "r_RRC_MoveToFrame",
            Self::SetTool { .. } => "r_RRC_SetTool",
            Self::SetWorkObject { .. } => "r_RRC_SetWorkObject",
            Self::SetAcceleration { .. } => "r_RRC_SetAcceleration",
            Self::SetMaxSpeed { .. } => "r_RRC_SetMaxSpeed",
            Self::SetDigital { .. } => "r_RRC_SetDigital",
            Self::SetAnalog { .. } => "r_RRC_SetAnalog",
            Self::PrintText { .. } => "r_RRC_PrintText",
            Self::Stop => "r_RRC_Stop",
        }
    }

    fn string_values(&self) -> Vec<String> {
        match self {
            Self::MoveToFrame { motion, .. } => vec![motion.as_code().to_string()],
            Self::SetTool { name } | Self::SetWorkObject { name } => vec![name.clone()],
            Self::SetDigital { signal, .. } | Self::SetAnalog { signal, .. } => {
                vec![signal.clone()]
            }
            Self::PrintText { text } => vec![text.clone()],
            _ => Vec::new(),
        }
    }

    fn float_values(&self) -> Vec<f64> {
        match self {
            Self::MoveToJoints {
                joints,
                external_axes,
                speed,
                zone,
            } => {
                let mut values = Vec::with_capacity(JOINT_SLOTS + EXTERNAL_AXIS_SLOTS + 2);
                values.extend(joints.iter().copied());
                values.resize(JOINT_SLOTS, 0.0);
                values.extend(external_axes.iter().copied());
                values.resize(JOINT_SLOTS + EXTERNAL_AXIS_SLOTS, UNUSED_AXIS);
                values.push(*speed);
                values.push(zone.as_value());
                values
            }
            Self::MoveToFrame {
                frame, speed, zone, ..
            } => {
                let p = frame.point();
                let q = frame.quaternion();
                vec![p.x, p.y, p.z, q.w, q.i, q.j, q.k, *speed, zone.as_value()]
            }
            Self::SetAcceleration { acceleration, ramp } => vec![*acceleration, *ramp],
            Self::SetMaxSpeed {
                speed_override,
                max_tcp,
            } => vec![*speed_override, *max_tcp],
            Self::SetDigital { value, .. } => vec![f64::from(*value)],
            Self::SetAnalog { value, .. } => vec![*value],
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MoveToJoints { joints, speed, .. } => {
                write!(f, "MoveToJoints {:?} @ {}", joints, speed)
            }
            Self::MoveToFrame {
                frame,
                speed,
                zone,
                motion,
            } => {
                let p = frame.point();
                write!(
                    f,
                    "MoveToFrame {} ({:.2}, {:.2}, {:.2}) @ {} {}",
                    motion.as_code(),
                    p.x,
                    p.y,
                    p.z,
                    speed,
                    zone
                )
            }
            Self::SetTool { name } => write!(f, "SetTool {}", name),
            Self::SetWorkObject { name } => write!(f, "SetWorkObject {}", name),
            Self::SetAcceleration { acceleration, ramp } => {
                write!(f, "SetAcceleration {} {}", acceleration, ramp)
            }
            Self::SetMaxSpeed {
                speed_override,
                max_tcp,
            } => write!(f, "SetMaxSpeed {} {}", speed_override, max_tcp),
            Self::SetDigital { signal, value } => write!(f, "SetDigital {}={}", signal, value),
            Self::SetAnalog { signal, value } => write!(f, "SetAnalog {}={}", signal, value),
            Self::PrintText { text } => write!(f, "PrintText \"{}\"", text),
            Self::Stop => write!(f, "Stop"),
        }
    }
}

/// An instruction plus the delivery options it is sent with
#[derive(Debug, Clone, PartialEq)]
pub struct RobotCommand {
    pub instruction: Instruction,
    pub feedback: FeedbackLevel,
    pub exec_level: ExecutionLevel,
}

impl RobotCommand {
    /// Command executed by the robot task, without feedback
    pub fn new(instruction: Instruction) -> Self {
        Self {
            instruction,
            feedback: FeedbackLevel::None,
            exec_level: ExecutionLevel::Robot,
        }
    }

    pub fn with_feedback(mut self, feedback: FeedbackLevel) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn with_exec_level(mut self, exec_level: ExecutionLevel) -> Self {
        self.exec_level = exec_level;
        self
    }

    pub fn move_to_joints(joints: &[f64], speed: f64, zone: Zone) -> Self {
        Self::new(Instruction::MoveToJoints {
            joints: joints.to_vec(),
            external_axes: Vec::new(),
            speed,
            zone,
        })
    }

    pub fn move_to_frame(frame: Frame, speed: f64, zone: Zone, motion: Motion) -> Self {
        Self::new(Instruction::MoveToFrame {
            frame,
            speed,
            zone,
            motion,
        })
    }

    pub fn set_tool(name: impl Into<String>) -> Self {
        Self::new(Instruction::SetTool { name: name.into() })
    }

    pub fn set_work_object(name: impl Into<String>) -> Self {
        Self::new(Instruction::SetWorkObject { name: name.into() })
    }

    pub fn set_acceleration(acceleration: f64, ramp: f64) -> Self {
        Self::new(Instruction::SetAcceleration { acceleration, ramp })
    }

    pub fn set_max_speed(speed_override: f64, max_tcp: f64) -> Self {
        Self::new(Instruction::SetMaxSpeed {
            speed_override,
            max_tcp,
        })
    }

    pub fn set_digital(signal: impl Into<String>, value: u8) -> Self {
        Self::new(Instruction::SetDigital {
            signal: signal.into(),
            value,
        })
    }

    pub fn set_analog(signal: impl Into<String>, value: f64) -> Self {
        Self::new(Instruction::SetAnalog {
            signal: signal.into(),
            value,
        })
    }

    pub fn print_text(text: impl Into<String>) -> Self {
        Self::new(Instruction::PrintText { text: text.into() })
    }

    pub fn stop() -> Self {
        Self::new(Instruction::Stop)
    }

    /// Encode for the wire under the given sequence id
    pub fn to_message(&self, sequence_id: u64) -> RobotMessage {
        RobotMessage {
            instruction: self.instruction.name().to_string(),
            sequence_id,
            feedback_level: self.feedback.as_value(),
            exec_level: self.exec_level.as_value(),
            feedback: String::new(),
            feedback_id: 0,
            string_values: self.instruction.string_values(),
            float_values: self.instruction.float_values(),
        }
    }
}

impl fmt::Display for RobotCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.instruction)
    }
}
