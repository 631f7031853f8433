//! Command generation
//!
//! Turns a start frame and the remaining print layers into the ordered
//! stream of robot commands. Commands are produced lazily, one layer at a
//! time, and the generator is consumed by a single pass.

use clay_print_communication::{FeedbackLevel, Motion, RobotCommand, Zone};
use clay_print_core::{PrintFrame, PrintJob, PrintLayer};
use clay_print_settings::PrintSettings;
use std::collections::VecDeque;
use std::vec::IntoIter;

/// Lazy, single-pass producer of path commands
///
/// Emits the travel-to-start move first, then for every layer a "Layer N"
/// text, the start coordinates of the layer, and an extruder set plus a
/// linear move for each frame.
#[derive(Debug)]
pub struct CommandGenerator<'a> {
    settings: &'a PrintSettings,
    start: Option<PrintFrame>,
    layers: std::iter::Enumerate<IntoIter<PrintLayer>>,
    layer_total: usize,
    pending: VecDeque<RobotCommand>,
}

impl<'a> CommandGenerator<'a> {
    /// Build from an explicit start frame and the layers that follow it
    pub fn new(start: PrintFrame, layers: Vec<PrintLayer>, settings: &'a PrintSettings) -> Self {
        Self {
            settings,
            start: Some(start),
            layer_total: layers.len(),
            layers: layers.into_iter().enumerate(),
            pending: VecDeque::new(),
        }
    }

    /// Build from a job, leaving the job untouched
    ///
    /// Returns `None` when the first layer has no frame to start from.
    pub fn from_job(job: &PrintJob, settings: &'a PrintSettings) -> Option<Self> {
        let (start, layers) = job.split_start()?;
        Some(Self::new(start, layers, settings))
    }

    fn start_command(&self, mut frame: PrintFrame) -> RobotCommand {
        frame.translate_along_local_normal(self.settings.z_offset);
        tracing::debug!("Start move to {}", frame);
        RobotCommand::move_to_frame(
            frame.frame().clone(),
            self.settings.travel_speed,
            Zone::Fine,
            Motion::Joint,
        )
    }

    fn queue_layer(&mut self, number: usize, layer: PrintLayer) {
        tracing::info!(
            "Layer {} ({}/{}, {} frames)",
            number,
            number + 1,
            self.layer_total,
            layer.len()
        );
        self.pending
            .push_back(RobotCommand::print_text(format!("Layer {}", number)));

        if let Some(first) = layer.first() {
            let point = first.frame().point();
            self.pending.push_back(RobotCommand::print_text(format!(
                "Start X: {:.2} Y: {:.2} Z: {:.2}",
                point.x, point.y, point.z
            )));
        }

        for mut frame in layer {
            self.pending.push_back(RobotCommand::set_analog(
                self.settings.extruder_signal.clone(),
                frame.extrusion_factor(),
            ));

            frame.translate_along_local_normal(self.settings.z_offset);
            let speed = if frame.is_travel() {
                self.settings.travel_speed
            } else {
                self.settings.print_speed
            };
            if let Some(retract) = self.retraction(&frame) {
                self.pending.push_back(retract);
            }
            self.pending.push_back(
                RobotCommand::move_to_frame(
                    frame.frame().clone(),
                    speed,
                    self.settings.print_zone,
                    Motion::Linear,
                )
                .with_feedback(FeedbackLevel::Done),
            );
        }
    }

    /// Hook for retracting material before a travel move; currently emits nothing
    fn retraction(&self, _frame: &PrintFrame) -> Option<RobotCommand> {
        None
    }
}

impl Iterator for CommandGenerator<'_> {
    type Item = RobotCommand;

    fn next(&mut self) -> Option<RobotCommand> {
        if let Some(start) = self.start.take() {
            return Some(self.start_command(start));
        }

        loop {
            if let Some(command) = self.pending.pop_front() {
                return Some(command);
            }
            let (number, layer) = self.layers.next()?;
            self.queue_layer(number, layer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clay_print_communication::Instruction;
    use clay_print_core::{Frame, Point3};

    fn frame_at(x: f64, factor: f64) -> PrintFrame {
        PrintFrame::new(Frame::world_xy(Point3::new(x, 0.0, 0.0)), factor).unwrap()
    }

    #[test]
    fn test_start_move_applies_offset_and_joint_motion() {
        let settings = PrintSettings {
            z_offset: 10.0,
            ..PrintSettings::default()
        };
        let mut generator = CommandGenerator::new(frame_at(1.0, 0.0), vec![], &settings);

        let command = generator.next().unwrap();
        match command.instruction {
            Instruction::MoveToFrame {
                frame,
                speed,
                zone,
                motion,
            } => {
                assert_eq!(frame.point().z, 10.0);
                assert_eq!(speed, settings.travel_speed);
                assert_eq!(zone, Zone::Fine);
                assert_eq!(motion, Motion::Joint);
            }
            other => panic!("unexpected instruction {:?}", other),
        }
        assert_eq!(command.feedback, FeedbackLevel::None);
        assert!(generator.next().is_none());
    }

    #[test]
    fn test_empty_layer_gets_only_layer_text() {
        let settings = PrintSettings::default();
        let generator =
            CommandGenerator::new(frame_at(0.0, 1.0), vec![PrintLayer::default()], &settings);

        let commands: Vec<_> = generator.collect();
        assert_eq!(commands.len(), 2);
        assert_eq!(
            commands[1].instruction,
            Instruction::PrintText {
                text: "Layer 0".to_string()
            }
        );
    }

    #[test]
    fn test_travel_and_print_speeds() {
        let settings = PrintSettings::default();
        let layer: PrintLayer = vec![frame_at(0.0, 0.0), frame_at(1.0, 0.7)]
            .into_iter()
            .collect();
        let commands: Vec<_> = CommandGenerator::new(frame_at(0.0, 0.0), vec![layer], &settings)
            .collect();

        let speeds: Vec<f64> = commands
            .iter()
            .filter_map(|c| match &c.instruction {
                Instruction::MoveToFrame {
                    speed,
                    motion: Motion::Linear,
                    ..
                } => Some(*speed),
                _ => None,
            })
            .collect();
        assert_eq!(speeds, vec![settings.travel_speed, settings.print_speed]);

        let extruder: Vec<f64> = commands
            .iter()
            .filter_map(|c| match &c.instruction {
                Instruction::SetAnalog { value, .. } => Some(*value),
                _ => None,
            })
            .collect();
        assert_eq!(extruder, vec![0.0, 0.7]);
    }
}
