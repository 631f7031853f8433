//! # clay-print core
//!
//! Core types for clay-print: the error taxonomy, oriented poses and the
//! print-job data model (frames, layers, JSON loading).

pub mod data;
pub mod error;
pub mod geometry;

pub use data::{PrintFrame, PrintJob, PrintLayer, EXTRUSION_TOLERANCE};
pub use error::{ConnectionError, ControllerError, Error, InputError, Result};
pub use geometry::Frame;

// Re-exported so downstream crates use the same nalgebra version
pub use nalgebra::{Point3, UnitQuaternion, Vector3};
