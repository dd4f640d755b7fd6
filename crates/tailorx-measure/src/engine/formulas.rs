//! Per-measurement formulas in pixel space.
//!
//! Each formula names the landmarks it consumes and returns `None` when any
//! of them is missing; scaling and rounding happen in the pipeline.

use tailorx_core::{distance, mean_y, LandmarkSet, PoseLandmark};

use super::CircumferenceCoefficients;
use crate::MeasurementKind;

use tailorx_core::PoseLandmark::{
    LeftAnkle, LeftHip, LeftKnee, LeftShoulder, LeftWrist, RightAnkle, RightHip, RightShoulder,
    RightWrist,
};

const SHOULDERS: &[PoseLandmark] = &[LeftShoulder, RightShoulder];
const HIPS: &[PoseLandmark] = &[LeftHip, RightHip];
const ARMS: &[PoseLandmark] = &[LeftShoulder, RightShoulder, LeftWrist, RightWrist];
const TORSO: &[PoseLandmark] = &[LeftShoulder, RightShoulder, LeftHip, RightHip];
const LEGS: &[PoseLandmark] = &[LeftHip, RightHip, LeftAnkle, RightAnkle];
const THIGH: &[PoseLandmark] = &[LeftHip, LeftKnee];

/// Landmarks a formula reads.
pub(crate) fn required_landmarks(kind: MeasurementKind) -> &'static [PoseLandmark] {
    match kind {
        MeasurementKind::Chest | MeasurementKind::ShoulderWidth => SHOULDERS,
        MeasurementKind::SleeveLength => ARMS,
        MeasurementKind::TorsoLength | MeasurementKind::Rise => TORSO,
        MeasurementKind::TopWaist | MeasurementKind::PantsWaist | MeasurementKind::Hip => HIPS,
        MeasurementKind::LegLength => LEGS,
        MeasurementKind::Thigh => THIGH,
    }
}

/// Evaluate one formula, in pixels.
///
/// Vertical spans are returned as magnitudes so that a pose with the ankles
/// below the hips (the normal image-space case) yields a positive length.
pub(crate) fn pixel_length(
    kind: MeasurementKind,
    landmarks: &LandmarkSet,
    coeffs: &CircumferenceCoefficients,
) -> Option<f32> {
    let p = |id: PoseLandmark| landmarks.position(id);
    let span = |a: PoseLandmark, b: PoseLandmark| -> Option<f32> { Some(distance(p(a)?, p(b)?)) };
    let level = |a: PoseLandmark, b: PoseLandmark| -> Option<f32> { Some(mean_y(p(a)?, p(b)?)) };

    let px = match kind {
        MeasurementKind::Chest => span(LeftShoulder, RightShoulder)? * coeffs.chest,
        MeasurementKind::ShoulderWidth => span(LeftShoulder, RightShoulder)?,
        MeasurementKind::SleeveLength => {
            let left = span(LeftShoulder, LeftWrist)?;
            let right = span(RightShoulder, RightWrist)?;
            (left + right) * 0.5
        }
        MeasurementKind::TorsoLength | MeasurementKind::Rise => {
            vertical_gap(level(LeftHip, RightHip)?, level(LeftShoulder, RightShoulder)?)
        }
        MeasurementKind::TopWaist | MeasurementKind::PantsWaist => {
            span(LeftHip, RightHip)? * coeffs.waist
        }
        MeasurementKind::Hip => span(LeftHip, RightHip)? * coeffs.hip,
        MeasurementKind::LegLength => {
            vertical_gap(level(LeftHip, RightHip)?, level(LeftAnkle, RightAnkle)?)
        }
        MeasurementKind::Thigh => span(LeftHip, LeftKnee)? * coeffs.thigh,
    };

    px.is_finite().then_some(px)
}

#[inline]
fn vertical_gap(a: f32, b: f32) -> f32 {
    (a - b).abs()
}

/// Mean visibility of the landmarks a formula consumes.
pub(crate) fn mean_visibility(kind: MeasurementKind, landmarks: &LandmarkSet) -> Option<f32> {
    let ids = required_landmarks(kind);
    let mut sum = 0.0;
    for &id in ids {
        sum += landmarks.get(id)?.visibility;
    }
    Some(sum / ids.len() as f32)
}
