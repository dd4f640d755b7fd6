use serde::{Deserialize, Serialize};
use tailorx_core::{CalibrationMethod, CalibrationParams};

use super::MeasurementParamsError;

/// Multipliers turning a frontal width into an estimated circumference.
///
/// These are empirical calibration constants, not body geometry; expect them
/// to be re-tuned against tape-measured ground truth.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CircumferenceCoefficients {
    /// Shoulder span -> chest girth.
    pub chest: f32,
    /// Hip span -> waist girth (both garments).
    pub waist: f32,
    /// Hip span -> hip girth.
    pub hip: f32,
    /// Hip-to-knee segment -> thigh girth.
    pub thigh: f32,
}

impl Default for CircumferenceCoefficients {
    fn default() -> Self {
        Self {
            chest: 2.0,
            waist: 2.0,
            hip: 2.2,
            thigh: 1.8,
        }
    }
}

/// How measurement confidence is reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceMode {
    /// Constant per formula (0.8, or 0.7 for rise and thigh).
    #[default]
    Fixed,
    /// Mean visibility of the landmarks each formula consumes. Changes the
    /// reported confidence values, so it must be requested explicitly.
    Visibility,
}

fn default_min_landmarks() -> usize {
    10
}

/// Configuration for the measurement engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeasurementParams {
    /// Landmark sets smaller than this produce no measurements.
    #[serde(default = "default_min_landmarks")]
    pub min_landmarks: usize,
    #[serde(default)]
    pub calibration: CalibrationParams,
    #[serde(default)]
    pub coefficients: CircumferenceCoefficients,
    #[serde(default)]
    pub confidence: ConfidenceMode,
}

impl Default for MeasurementParams {
    fn default() -> Self {
        Self {
            min_landmarks: default_min_landmarks(),
            calibration: CalibrationParams::default(),
            coefficients: CircumferenceCoefficients::default(),
            confidence: ConfidenceMode::Fixed,
        }
    }
}

impl MeasurementParams {
    /// Check that every constant keeps measurements finite and non-negative.
    pub fn validate(&self) -> Result<(), MeasurementParamsError> {
        let c = &self.coefficients;
        for (name, value) in [
            ("chest", c.chest),
            ("waist", c.waist),
            ("hip", c.hip),
            ("thigh", c.thigh),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(MeasurementParamsError::InvalidCoefficient { name, value });
            }
        }

        let fallback = self.calibration.fallback_cm_per_px;
        if !fallback.is_finite() || fallback <= 0.0 {
            return Err(MeasurementParamsError::InvalidFallbackScale(fallback));
        }

        if let CalibrationMethod::ShoulderSpan { shoulder_width_cm } = self.calibration.method {
            if !shoulder_width_cm.is_finite() || shoulder_width_cm <= 0.0 {
                return Err(MeasurementParamsError::InvalidReferenceLength(
                    shoulder_width_cm,
                ));
            }
        }

        Ok(())
    }
}
