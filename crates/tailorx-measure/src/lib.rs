//! Garment measurements, body-type classification and style advice.
//!
//! The measurement engine turns a [`tailorx_core::LandmarkSet`] plus the
//! subject height into shirt (`polera`) and pants (`pantalon`) measurements.
//! Body-type classification sits behind [`BodyTypeClassifier`] and feeds a
//! static recommendation table.
//!
//! ## Quickstart
//!
//! ```
//! use tailorx_core::{Gender, LandmarkSet};
//! use tailorx_measure::{GarmentMeasurementEngine, MeasurementParams};
//!
//! let engine = GarmentMeasurementEngine::new(MeasurementParams::default())?;
//! let landmarks = LandmarkSet::empty();
//! let all = engine.measure_all(&landmarks, 170.0, Gender::Female);
//! assert!(all.top.is_empty());
//! # Ok::<(), tailorx_measure::MeasurementParamsError>(())
//! ```

mod body_type;
mod engine;
mod measurement;
mod recommend;

pub use body_type::{
    BodyType, BodyTypeClassifier, BodyTypeEstimate, RandomBodyTypeClassifier,
    DEFAULT_CHARACTERISTIC,
};
pub use engine::{
    CircumferenceCoefficients, ConfidenceMode, GarmentMeasurementEngine, MeasurementParams,
    MeasurementParamsError,
};
pub use measurement::{
    BodyMeasurements, GarmentCategory, Measurement, MeasurementKind, MeasurementSet,
};
pub use recommend::{recommend, DEFAULT_RECOMMENDATIONS};
