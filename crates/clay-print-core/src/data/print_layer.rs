//! Print layer: the ordered frames printed in one pass

use super::print_frame::PrintFrame;
use crate::error::InputError;
use crate::geometry::Frame;
use std::ops::{Index, IndexMut};

/// Ordered sequence of print frames. Insertion order is print order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrintLayer {
    frames: Vec<PrintFrame>,
}

impl PrintLayer {
    pub fn new(frames: Vec<PrintFrame>) -> Self {
        Self { frames }
    }

    /// Zip poses with extrusion factors.
    ///
    /// Both sequences must have the same length; nothing is truncated.
    pub fn from_frames_and_factors(
        frames: Vec<Frame>,
        extrusion_factors: Vec<f64>,
    ) -> Result<Self, InputError> {
        if frames.len() != extrusion_factors.len() {
            return Err(InputError::LengthMismatch {
                layer: 0,
                frames: frames.len(),
                factors: extrusion_factors.len(),
            });
        }

        frames
            .into_iter()
            .zip(extrusion_factors)
            .map(|(frame, factor)| PrintFrame::new(frame, factor))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn push(&mut self, frame: PrintFrame) {
        self.frames.push(frame);
    }

    /// Remove and return the first frame
    pub fn pop_first(&mut self) -> Option<PrintFrame> {
        if self.frames.is_empty() {
            None
        } else {
            Some(self.frames.remove(0))
        }
    }

    pub fn first(&self) -> Option<&PrintFrame> {
        self.frames.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PrintFrame> {
        self.frames.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, PrintFrame> {
        self.frames.iter_mut()
    }

    /// Number of frames that extrude material
    pub fn print_frame_count(&self) -> usize {
        self.frames.iter().filter(|f| !f.is_travel()).count()
    }
}

impl Index<usize> for PrintLayer {
    type Output = PrintFrame;

    fn index(&self, index: usize) -> &Self::Output {
        &self.frames[index]
    }
}

impl IndexMut<usize> for PrintLayer {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.frames[index]
    }
}

impl FromIterator<PrintFrame> for PrintLayer {
    fn from_iter<T: IntoIterator<Item = PrintFrame>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for PrintLayer {
    type Item = PrintFrame;
    type IntoIter = std::vec::IntoIter<PrintFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.into_iter()
    }
}

impl<'a> IntoIterator for &'a PrintLayer {
    type Item = &'a PrintFrame;
    type IntoIter = std::slice::Iter<'a, PrintFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}
