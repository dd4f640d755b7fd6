//! High-level facade crate for the `tailorx-*` workspace.
//!
//! This crate provides:
//! - stable re-exports of the core and measurement crates
//! - the [`PoseDetector`] capability and a detector replaying recorded captures
//! - [`BodyAnalyzer`], which turns a front/side image pair plus height and
//!   gender into measurements, a body type and style recommendations
//! - JSON config/report helpers and (feature `cli`) the `tailorx` binary
//!
//! ## Quickstart
//!
//! ```no_run
//! use std::path::Path;
//! use tailorx::{AnalysisRequest, BodyAnalyzer, RecordedPoseDetector};
//! use tailorx::measure::{GarmentMeasurementEngine, MeasurementParams, RandomBodyTypeClassifier};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let analyzer = BodyAnalyzer::new(
//!     RecordedPoseDetector::default(),
//!     GarmentMeasurementEngine::new(MeasurementParams::default())?,
//!     RandomBodyTypeClassifier::from_entropy(),
//! );
//! let request = AnalysisRequest::new(Some(Path::new("front.json")), Some(Path::new("side.json")))
//!     .with_height(172.0);
//! let response = analyzer.respond(&request);
//! println!("{}", serde_json::to_string_pretty(&response)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `tailorx::core`: landmarks, gender, geometry, scale calibration, logging.
//! - `tailorx::measure`: measurement engine, body types, recommendations.
//! - `tailorx::io`: JSON configs and reports for file-driven runs.

pub use tailorx_core as core;
pub use tailorx_measure as measure;

pub use tailorx_core::{Gender, LandmarkSet, PoseLandmark, ScaleFactor};
pub use tailorx_measure::{
    BodyMeasurements, BodyType, BodyTypeClassifier, BodyTypeEstimate, GarmentMeasurementEngine,
    MeasurementKind, MeasurementSet,
};

mod analyze;
mod detector;
pub mod io;

pub use analyze::{AnalysisRequest, AnalysisResponse, AnalyzeError, BodyAnalysis, BodyAnalyzer};
pub use detector::{
    CoordinateSpace, DetectorError, DetectorParams, PoseCapture, PoseDetector,
    RecordedPoseDetector,
};

/// Install a `tracing` subscriber and route `log` records through it.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let _ = tracing_log::LogTracer::init();
    tailorx_core::init_tracing(json);
}
