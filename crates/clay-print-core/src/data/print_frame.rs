//! Print frame: a pose plus the extrusion factor commanded at it

use crate::error::InputError;
use crate::geometry::Frame;
use std::fmt;

/// Extrusion factors at or below this magnitude mean "no material flow"
pub const EXTRUSION_TOLERANCE: f64 = 1e-9;

/// A target pose with its extrusion factor
#[derive(Debug, Clone, PartialEq)]
pub struct PrintFrame {
    frame: Frame,
    extrusion_factor: f64,
}

impl PrintFrame {
    /// Create a print frame. The factor must be finite.
    pub fn new(frame: Frame, extrusion_factor: f64) -> Result<Self, InputError> {
        check_factor(extrusion_factor)?;
        Ok(Self {
            frame,
            extrusion_factor,
        })
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn extrusion_factor(&self) -> f64 {
        self.extrusion_factor
    }

    /// Replace the extrusion factor
    pub fn set_extrusion_factor(&mut self, extrusion_factor: f64) -> Result<(), InputError> {
        check_factor(extrusion_factor)?;
        self.extrusion_factor = extrusion_factor;
        Ok(())
    }

    /// True when this frame is a non-extruding travel move
    pub fn is_travel(&self) -> bool {
        self.extrusion_factor.abs() <= EXTRUSION_TOLERANCE
    }

    /// Translate the pose along its own normal (local Z)
    pub fn translate_along_local_normal(&mut self, distance: f64) {
        self.frame.translate_along_normal(distance);
    }
}

impl fmt::Display for PrintFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.frame.point();
        write!(
            f,
            "X: {:.2} Y: {:.2} Z: {:.2} E: {:.2}",
            p.x, p.y, p.z, self.extrusion_factor
        )
    }
}

fn check_factor(value: f64) -> Result<(), InputError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InputError::InvalidExtrusionFactor {
            reason: format!("{} is not a finite number", value),
        })
    }
}
