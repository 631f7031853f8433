//! Program driver
//!
//! Sequences a complete print run against a [`RobotClient`]:
//! startup configuration and homing, throttled streaming of the generated
//! path commands, and the shutdown sequence.

use crate::generator::CommandGenerator;
use clay_print_communication::{DispatchStats, RobotClient, RobotCommand, ThrottledDispatcher, Zone};
use clay_print_core::{InputError, PrintJob, Result};
use clay_print_settings::PrintConfig;
use std::fmt;

/// Operator prompt shown before the robot moves
pub const START_PROMPT: &str = "Press Play to move.";

/// Text sent once the path is complete
pub const FINISHED_TEXT: &str = "Print finished.";

/// Phase of a print run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgramState {
    #[default]
    Idle,
    Homing,
    Streaming,
    Draining,
    Done,
}

impl fmt::Display for ProgramState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Homing => write!(f, "Homing"),
            Self::Streaming => write!(f, "Streaming"),
            Self::Draining => write!(f, "Draining"),
            Self::Done => write!(f, "Done"),
        }
    }
}

/// Drives one print job from startup to shutdown
#[derive(Debug)]
pub struct PrintProgram<'a> {
    config: &'a PrintConfig,
    state: ProgramState,
}

impl<'a> PrintProgram<'a> {
    pub fn new(config: &'a PrintConfig) -> Self {
        Self {
            config,
            state: ProgramState::Idle,
        }
    }

    pub fn state(&self) -> ProgramState {
        self.state
    }

    fn transition(&mut self, next: ProgramState) {
        tracing::info!("Program state: {} -> {}", self.state, next);
        self.state = next;
    }

    /// Run the job, then close the client whatever the outcome
    ///
    /// A run error is reported in preference to a close error.
    pub async fn execute<C>(&mut self, client: &mut C, job: &PrintJob) -> Result<DispatchStats>
    where
        C: RobotClient + ?Sized,
    {
        let outcome = self.run(client, job).await;
        let closed = client.close().await;

        match (outcome, closed) {
            (Ok(stats), Ok(())) => Ok(stats),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), closed) => {
                if let Err(close_err) = closed {
                    tracing::warn!("Closing the robot client also failed: {}", close_err);
                }
                tracing::error!("Print aborted in state {}: {}", self.state, e);
                Err(e)
            }
        }
    }

    /// Run the job without closing the client
    pub async fn run<C>(&mut self, client: &mut C, job: &PrintJob) -> Result<DispatchStats>
    where
        C: RobotClient + ?Sized,
    {
        let config = self.config;
        let generator =
            CommandGenerator::from_job(job, &config.print).ok_or(InputError::EmptyJob)?;

        self.transition(ProgramState::Homing);
        self.startup(client).await?;

        self.transition(ProgramState::Streaming);
        tracing::info!(
            "Streaming {} layers ({} frames)",
            job.layer_count(),
            job.frame_count()
        );
        let mut dispatcher = ThrottledDispatcher::new(config.dispatcher_config());
        let stats = dispatcher.stream(client, generator).await?;
        tracing::info!(
            "Streamed {} commands with {} completion waits",
            stats.sent,
            stats.waits
        );

        self.transition(ProgramState::Draining);
        self.shutdown(client).await?;

        self.transition(ProgramState::Done);
        Ok(stats)
    }

    async fn startup<C>(&self, client: &mut C) -> Result<()>
    where
        C: RobotClient + ?Sized,
    {
        let robot = &self.config.robot;
        let print = &self.config.print;

        client
            .send(RobotCommand::set_acceleration(robot.acceleration, robot.ramp))
            .await?;
        client
            .send(RobotCommand::set_max_speed(
                robot.speed_override,
                robot.max_tcp_speed,
            ))
            .await?;
        client.send(RobotCommand::set_tool(&robot.tool)).await?;
        client
            .send(RobotCommand::set_work_object(&robot.work_object))
            .await?;
        for signal in &robot.reset_digital_signals {
            client.send(RobotCommand::set_digital(signal, 0)).await?;
        }
        client
            .send(RobotCommand::set_analog(&print.extruder_signal, 0.0))
            .await?;
        tracing::info!(
            "Configured tool {} on work object {}",
            robot.tool,
            robot.work_object
        );

        client.send(RobotCommand::print_text(START_PROMPT)).await?;
        client.send(RobotCommand::stop()).await?;

        tracing::info!("Waiting for the robot to reach the start position");
        client
            .send_and_wait(
                RobotCommand::move_to_joints(
                    &robot.home_start_joints,
                    print.travel_speed,
                    Zone::Fine,
                ),
                self.config.wait_timeout(),
            )
            .await?;
        tracing::info!("Robot at start position");
        Ok(())
    }

    async fn shutdown<C>(&self, client: &mut C) -> Result<()>
    where
        C: RobotClient + ?Sized,
    {
        client
            .send(RobotCommand::move_to_joints(
                &self.config.robot.home_end_joints,
                self.config.print.travel_speed,
                Zone::Fine,
            ))
            .await?;
        client
            .send_and_wait(
                RobotCommand::print_text(FINISHED_TEXT),
                self.config.wait_timeout(),
            )
            .await?;
        tracing::info!("{}", FINISHED_TEXT);
        Ok(())
    }
}
