//! Print job loading
//!
//! A print file is a JSON object holding a nested list of poses and a
//! parallel nested list of extrusion factors of identical shape:
//!
//! ```json
//! {
//!   "frames": [[{"point": [0, 0, 0], "xaxis": [1, 0, 0], "yaxis": [0, 1, 0]}]],
//!   "extrusion_factors": [[0.0]]
//! }
//! ```
//!
//! Frames may also be wrapped in a `{"dtype": ..., "data": {...}}` envelope.
//! A flat list instead of a list of layers is read as a single layer. If
//! `extrusion_factors` is missing, each frame must carry an
//! `extrusion_factor` of its own.
//!
//! Legacy boolean factors are converted to numbers here: `true` marks a
//! travel move (0.0), `false` a printing move (1.0).

use super::print_frame::PrintFrame;
use super::print_layer::PrintLayer;
use crate::error::{InputError, Result};
use crate::geometry::Frame;
use serde::Deserialize;
use std::path::Path;

/// All layers of one print, in print order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrintJob {
    layers: Vec<PrintLayer>,
}

impl PrintJob {
    pub fn new(layers: Vec<PrintLayer>) -> Self {
        Self { layers }
    }

    /// Load a print job from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let job = Self::from_json_str(&content)?;
        tracing::info!(
            "Loaded {} layers ({} frames) from {}",
            job.layer_count(),
            job.frame_count(),
            path.display()
        );
        Ok(job)
    }

    /// Parse a print job from JSON text
    pub fn from_json_str(content: &str) -> std::result::Result<Self, InputError> {
        let document: PrintDocument =
            serde_json::from_str(content).map_err(|e| InputError::InvalidJson {
                reason: e.to_string(),
            })?;
        document.into_job()
    }

    pub fn layers(&self) -> &[PrintLayer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn frame_count(&self) -> usize {
        self.layers.iter().map(PrintLayer::len).sum()
    }

    /// Separate the first frame (the travel-to-start target) from the rest.
    ///
    /// The job itself is left untouched; the returned layers are copies with
    /// the first frame removed from the first layer.
    pub fn split_start(&self) -> Option<(PrintFrame, Vec<PrintLayer>)> {
        let mut layers = self.layers.clone();
        let start = layers.first_mut()?.pop_first()?;
        Some((start, layers))
    }
}

#[derive(Debug, Deserialize)]
struct PrintDocument {
    frames: Nested<FrameRecord>,
    #[serde(default)]
    extrusion_factors: Option<Nested<FactorValue>>,
}

/// Either a list of layers or one flat layer
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Nested<T> {
    Layered(Vec<Vec<T>>),
    Flat(Vec<T>),
}

impl<T> Nested<T> {
    fn into_layers(self) -> Vec<Vec<T>> {
        match self {
            Nested::Layered(layers) => layers,
            Nested::Flat(items) => vec![items],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FrameRecord {
    Envelope {
        data: FrameData,
        #[serde(default)]
        name: Option<String>,
    },
    Plain(FrameData),
}

#[derive(Debug, Deserialize)]
struct FrameData {
    point: Vec<f64>,
    xaxis: Vec<f64>,
    yaxis: Vec<f64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    extrusion_factor: Option<FactorValue>,
}

impl FrameRecord {
    fn into_parts(self) -> std::result::Result<(Frame, Option<FactorValue>), InputError> {
        let (data, outer_name) = match self {
            FrameRecord::Envelope { data, name } => (data, name),
            FrameRecord::Plain(data) => (data, None),
        };
        let mut frame = Frame::from_components(&data.point, &data.xaxis, &data.yaxis)?;
        if let Some(name) = outer_name.or(data.name) {
            frame = frame.with_name(name);
        }
        Ok((frame, data.extrusion_factor))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FactorValue {
    Number(f64),
    Flag(bool),
    Text(String),
}

impl FactorValue {
    fn to_numeric(&self) -> std::result::Result<f64, InputError> {
        match self {
            FactorValue::Number(value) => Ok(*value),
            FactorValue::Flag(true) => Ok(0.0),
            FactorValue::Flag(false) => Ok(1.0),
            FactorValue::Text(text) => {
                text.trim()
                    .parse::<f64>()
                    .map_err(|_| InputError::InvalidExtrusionFactor {
                        reason: format!("'{}' is not a number", text),
                    })
            }
        }
    }
}

impl PrintDocument {
    fn into_job(self) -> std::result::Result<PrintJob, InputError> {
        let frame_layers = self.frames.into_layers();
        let factor_layers = self.extrusion_factors.map(Nested::into_layers);

        if let Some(factors) = &factor_layers {
            if factors.len() != frame_layers.len() {
                return Err(InputError::LayerCountMismatch {
                    frames: frame_layers.len(),
                    factors: factors.len(),
                });
            }
        }

        let mut layers = Vec::with_capacity(frame_layers.len());
        for (index, records) in frame_layers.into_iter().enumerate() {
            let mut frames = Vec::with_capacity(records.len());
            let mut embedded = Vec::with_capacity(records.len());
            for record in records {
                let (frame, factor) = record.into_parts()?;
                frames.push(frame);
                embedded.push(factor);
            }

            let factors = match &factor_layers {
                Some(factor_layers) => factor_layers[index]
                    .iter()
                    .map(FactorValue::to_numeric)
                    .collect::<std::result::Result<Vec<_>, _>>()?,
                None => embedded
                    .iter()
                    .map(|factor| match factor {
                        Some(value) => value.to_numeric(),
                        None => Err(InputError::InvalidExtrusionFactor {
                            reason: format!(
                                "layer {} has a frame without extrusion_factor and the file has no extrusion_factors",
                                index
                            ),
                        }),
                    })
                    .collect::<std::result::Result<Vec<_>, _>>()?,
            };

            let layer = PrintLayer::from_frames_and_factors(frames, factors).map_err(|e| match e {
                InputError::LengthMismatch {
                    frames, factors, ..
                } => InputError::LengthMismatch {
                    layer: index,
                    frames,
                    factors,
                },
                other => other,
            })?;
            layers.push(layer);
        }

        let job = PrintJob::new(layers);
        if job.frame_count() == 0 {
            return Err(InputError::EmptyJob);
        }
        Ok(job)
    }
}
