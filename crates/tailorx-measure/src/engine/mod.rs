//! Garment measurement pipeline.
//!
//! This module wires together scale calibration, the per-measurement pixel
//! formulas and confidence assignment.

mod error;
mod formulas;
mod params;
mod pipeline;

pub use error::MeasurementParamsError;
pub use params::{CircumferenceCoefficients, ConfidenceMode, MeasurementParams};
pub use pipeline::GarmentMeasurementEngine;
