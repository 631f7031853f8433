//! # clay-print
//!
//! Streams layered tool-path frames to an industrial robot arm for clay
//! 3D printing.
//!
//! ## Architecture
//!
//! clay-print is organized as a workspace with multiple crates:
//!
//! 1. **clay-print-core** - Errors, pose geometry, frames, layers, job loading
//! 2. **clay-print-communication** - RRC commands, rosbridge transport, throttled dispatch
//! 3. **clay-print-settings** - Run configuration and config file lookup
//! 4. **clay-print** - Command generator, program driver and the binary
//!
//! ## Flow
//!
//! A [`PrintJob`] is loaded from JSON, split into its start frame and the
//! remaining layers, and turned into robot commands lazily by a
//! [`CommandGenerator`]. The [`PrintProgram`] sends the fixed startup
//! sequence, streams the generated commands through a throttled
//! dispatcher and finishes with the shutdown sequence.

pub mod generator;
pub mod program;

pub use generator::CommandGenerator;
pub use program::{PrintProgram, ProgramState};

pub use clay_print_core::{
    ConnectionError, ControllerError, Error, Frame, InputError, PrintFrame, PrintJob, PrintLayer,
    Result,
};

pub use clay_print_communication::{
    ConnectionParams, DispatchStats, FeedbackLevel, Instruction, Motion, RobotClient,
    RobotCommand, RosBridgeClient, ThrottledDispatcher, ThrottledDispatcherConfig, Zone,
};

pub use clay_print_settings::{PrintConfig, SettingsManager};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
