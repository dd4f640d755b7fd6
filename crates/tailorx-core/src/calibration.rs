//! Pixel-to-centimetre scale calibration.
//!
//! A single linear factor is derived per image from a known real-world
//! length: the subject's height (head-to-feet pixel span) by default, or the
//! shoulder width when a tape-measured reference is available.

use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::geometry::distance;
use crate::landmark::{LandmarkSet, PoseLandmark};

/// Scale used whenever the landmark geometry cannot be trusted.
pub const FALLBACK_CM_PER_PX: f32 = 0.5;

/// Average adult biacromial width used by the shoulder-span method.
pub const DEFAULT_SHOULDER_WIDTH_CM: f32 = 38.0;

/// Which real-world length anchors the scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalibrationMethod {
    /// Reference length is the subject height passed with the request.
    #[default]
    BodyHeight,
    /// Reference length is a known shoulder width; the request height is ignored.
    ShoulderSpan {
        #[serde(default = "default_shoulder_width_cm")]
        shoulder_width_cm: f32,
    },
}

fn default_shoulder_width_cm() -> f32 {
    DEFAULT_SHOULDER_WIDTH_CM
}

fn default_fallback_cm_per_px() -> f32 {
    FALLBACK_CM_PER_PX
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationParams {
    #[serde(default)]
    pub method: CalibrationMethod,
    /// Scale returned for degenerate geometry, in cm per pixel.
    #[serde(default = "default_fallback_cm_per_px")]
    pub fallback_cm_per_px: f32,
}

impl Default for CalibrationParams {
    fn default() -> Self {
        Self {
            method: CalibrationMethod::BodyHeight,
            fallback_cm_per_px: FALLBACK_CM_PER_PX,
        }
    }
}

/// Where a [`ScaleFactor`] came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleSource {
    BodyHeight,
    ShoulderSpan,
    Fallback,
}

/// Centimetres per pixel, always positive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleFactor {
    pub cm_per_px: f32,
    pub source: ScaleSource,
    /// Pixel length matched against the reference, when one was measured.
    pub pixel_span: Option<f32>,
}

impl ScaleFactor {
    pub fn fallback(cm_per_px: f32) -> Self {
        Self {
            cm_per_px,
            source: ScaleSource::Fallback,
            pixel_span: None,
        }
    }

    #[inline]
    pub fn is_fallback(&self) -> bool {
        self.source == ScaleSource::Fallback
    }

    /// Convert a pixel length to centimetres.
    #[inline]
    pub fn to_cm(&self, px: f32) -> f32 {
        px * self.cm_per_px
    }
}

/// Derives a [`ScaleFactor`] from one landmark set.
#[derive(Clone, Debug, Default)]
pub struct ScaleCalibrator {
    params: CalibrationParams,
}

impl ScaleCalibrator {
    pub fn new(params: CalibrationParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &CalibrationParams {
        &self.params
    }

    /// Calibrate against the subject height in centimetres.
    ///
    /// Never fails: missing anchor landmarks, a non-positive pixel span or a
    /// non-positive reference all yield the fallback scale.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, landmarks), fields(num_landmarks = landmarks.len()))
    )]
    pub fn calibrate(&self, landmarks: &LandmarkSet, height_cm: f32) -> ScaleFactor {
        let measured = match self.params.method {
            CalibrationMethod::BodyHeight => {
                body_pixel_height(landmarks).map(|px| (height_cm, px, ScaleSource::BodyHeight))
            }
            CalibrationMethod::ShoulderSpan { shoulder_width_cm } => {
                shoulder_pixel_width(landmarks)
                    .map(|px| (shoulder_width_cm, px, ScaleSource::ShoulderSpan))
            }
        };

        match measured {
            Some((reference_cm, px, source))
                if px > 0.0 && reference_cm.is_finite() && reference_cm > 0.0 =>
            {
                let scale = ScaleFactor {
                    cm_per_px: reference_cm / px,
                    source,
                    pixel_span: Some(px),
                };
                log::debug!(
                    "scale {:.4} cm/px from {:?} (span {:.1} px, reference {:.1} cm)",
                    scale.cm_per_px,
                    source,
                    px,
                    reference_cm
                );
                scale
            }
            _ => {
                log::debug!(
                    "degenerate calibration geometry, using fallback {} cm/px",
                    self.params.fallback_cm_per_px
                );
                ScaleFactor::fallback(self.params.fallback_cm_per_px)
            }
        }
    }
}

/// Vertical span between the topmost head point and the lowest foot point.
///
/// Requires every head and foot anchor; the span may be zero or negative for
/// degenerate poses.
pub fn body_pixel_height(landmarks: &LandmarkSet) -> Option<f32> {
    let head_y = extreme_y(landmarks, &PoseLandmark::HEAD, f32::min)?;
    let feet_y = extreme_y(landmarks, &PoseLandmark::FEET, f32::max)?;
    Some(feet_y - head_y)
}

fn shoulder_pixel_width(landmarks: &LandmarkSet) -> Option<f32> {
    let l = landmarks.position(PoseLandmark::LeftShoulder)?;
    let r = landmarks.position(PoseLandmark::RightShoulder)?;
    Some(distance(l, r))
}

fn extreme_y(
    landmarks: &LandmarkSet,
    ids: &[PoseLandmark],
    pick: fn(f32, f32) -> f32,
) -> Option<f32> {
    let mut ys = ids.iter().map(|&id| landmarks.position(id).map(|p| p.y));
    let first = ys.next()??;
    ys.try_fold(first, |acc, y| Some(pick(acc, y?)))
}
