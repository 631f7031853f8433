//! Print data model
//!
//! This module provides:
//! - [`PrintFrame`]: a pose with its extrusion factor and travel/print classification
//! - [`PrintLayer`]: the ordered frames of one printed layer
//! - [`PrintJob`]: all layers of a print, loaded from a JSON print file

pub mod print_frame;
pub mod print_job;
pub mod print_layer;

pub use print_frame::{PrintFrame, EXTRUSION_TOLERANCE};
pub use print_job::PrintJob;
pub use print_layer::PrintLayer;
