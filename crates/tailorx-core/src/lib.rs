//! Core types and utilities for landmark-based body measurement.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any concrete pose detector or image type: landmarks come in as
//! plain coordinates and leave as a calibrated pixel-to-centimetre scale.

mod calibration;
mod geometry;
mod landmark;
mod logger;
mod subject;

pub use calibration::{
    body_pixel_height, CalibrationMethod, CalibrationParams, ScaleCalibrator, ScaleFactor,
    ScaleSource, DEFAULT_SHOULDER_WIDTH_CM, FALLBACK_CM_PER_PX,
};
pub use geometry::{distance, mean_y, round_to};
pub use landmark::{Landmark, LandmarkSet, PoseLandmark, RawLandmark};
pub use subject::{Gender, ParseGenderError, DEFAULT_HEIGHT_CM};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
