use tailorx_core::{round_to, Gender, LandmarkSet, ScaleCalibrator, ScaleFactor};

#[cfg(feature = "tracing")]
use tracing::instrument;

use super::formulas::{mean_visibility, pixel_length};
use super::{ConfidenceMode, MeasurementParams, MeasurementParamsError};
use crate::measurement::{
    BodyMeasurements, GarmentCategory, Measurement, MeasurementKind, MeasurementSet,
};

/// Derives garment measurements from a single landmark set.
///
/// The engine is stateless between calls: the same landmarks, height and
/// parameters always produce the same measurements.
#[derive(Clone, Debug, Default)]
pub struct GarmentMeasurementEngine {
    params: MeasurementParams,
    calibrator: ScaleCalibrator,
}

impl GarmentMeasurementEngine {
    /// Create an engine, rejecting parameters that could yield non-finite or
    /// negative measurements.
    pub fn new(params: MeasurementParams) -> Result<Self, MeasurementParamsError> {
        params.validate()?;
        let calibrator = ScaleCalibrator::new(params.calibration);
        Ok(Self { params, calibrator })
    }

    #[inline]
    pub fn params(&self) -> &MeasurementParams {
        &self.params
    }

    /// Scale the engine would apply to these landmarks.
    pub fn scale(&self, landmarks: &LandmarkSet, height_cm: f32) -> ScaleFactor {
        self.calibrator.calibrate(landmarks, height_cm)
    }

    /// Shirt measurements: chest, sleeve, torso, shoulders and waist.
    pub fn measure_top(
        &self,
        landmarks: &LandmarkSet,
        height_cm: f32,
        gender: Gender,
    ) -> MeasurementSet {
        self.measure(landmarks, height_cm, gender, GarmentCategory::Top)
    }

    /// Pants measurements: waist, hip, leg, rise and thigh.
    pub fn measure_bottom(
        &self,
        landmarks: &LandmarkSet,
        height_cm: f32,
        gender: Gender,
    ) -> MeasurementSet {
        self.measure(landmarks, height_cm, gender, GarmentCategory::Bottom)
    }

    /// Measurements of one garment category.
    ///
    /// Returns an empty set when fewer than `min_landmarks` landmarks are
    /// present. A measurement whose inputs are missing is left out while the
    /// others are still reported. `gender` is accepted for callers that pass
    /// the subject through; the formulas do not depend on it.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "debug",
            skip(self, landmarks),
            fields(num_landmarks = landmarks.len(), category = category.as_str())
        )
    )]
    pub fn measure(
        &self,
        landmarks: &LandmarkSet,
        height_cm: f32,
        _gender: Gender,
        category: GarmentCategory,
    ) -> MeasurementSet {
        if landmarks.len() < self.params.min_landmarks {
            log::debug!(
                "{} landmarks below minimum {}, skipping {} measurements",
                landmarks.len(),
                self.params.min_landmarks,
                category.as_str()
            );
            return MeasurementSet::new();
        }

        let scale = self.calibrator.calibrate(landmarks, height_cm);
        self.measure_scaled(landmarks, &scale, category)
    }

    /// Both categories with a single calibration.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, landmarks), fields(num_landmarks = landmarks.len()))
    )]
    pub fn measure_all(
        &self,
        landmarks: &LandmarkSet,
        height_cm: f32,
        _gender: Gender,
    ) -> BodyMeasurements {
        if landmarks.len() < self.params.min_landmarks {
            log::debug!(
                "{} landmarks below minimum {}, no measurements",
                landmarks.len(),
                self.params.min_landmarks
            );
            return BodyMeasurements::default();
        }

        let scale = self.calibrator.calibrate(landmarks, height_cm);
        BodyMeasurements {
            top: self.measure_scaled(landmarks, &scale, GarmentCategory::Top),
            bottom: self.measure_scaled(landmarks, &scale, GarmentCategory::Bottom),
        }
    }

    fn measure_scaled(
        &self,
        landmarks: &LandmarkSet,
        scale: &ScaleFactor,
        category: GarmentCategory,
    ) -> MeasurementSet {
        let mut out = MeasurementSet::new();
        for &kind in MeasurementKind::for_category(category) {
            let Some(px) = pixel_length(kind, landmarks, &self.params.coefficients) else {
                log::debug!("{kind}: input landmarks missing, skipped");
                continue;
            };
            let value = round_to(scale.to_cm(px), 1);
            if !value.is_finite() {
                log::debug!("{kind}: {px:.1} px does not scale to a finite length, skipped");
                continue;
            }
            out.insert(
                kind,
                Measurement {
                    value,
                    confidence: self.confidence(kind, landmarks),
                    description: kind.description().to_string(),
                    category,
                },
            );
        }

        log::debug!(
            "{} of {} {} measurements computed",
            out.len(),
            MeasurementKind::for_category(category).len(),
            category.as_str()
        );
        out
    }

    fn confidence(&self, kind: MeasurementKind, landmarks: &LandmarkSet) -> f32 {
        match self.params.confidence {
            ConfidenceMode::Fixed => kind.base_confidence(),
            ConfidenceMode::Visibility => mean_visibility(kind, landmarks)
                .map(|v| round_to(v.clamp(0.0, 1.0), 2))
                .unwrap_or(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tailorx_core::{Landmark, PoseLandmark};

    fn lm(id: PoseLandmark, x: f32, y: f32) -> Landmark {
        Landmark::new(id, x, y, 0.0, 1.0)
    }

    /// Full standing pose: head at y=20, heels at y=480, shoulders 100 px apart.
    fn standing_pose() -> LandmarkSet {
        use PoseLandmark::*;
        LandmarkSet::new([
            lm(Nose, 150.0, 30.0),
            lm(LeftEyeInner, 145.0, 22.0),
            lm(LeftEye, 140.0, 20.0),
            lm(LeftEyeOuter, 135.0, 22.0),
            lm(LeftShoulder, 100.0, 100.0),
            lm(RightShoulder, 200.0, 100.0),
            lm(LeftWrist, 90.0, 250.0),
            lm(RightWrist, 210.0, 250.0),
            lm(LeftHip, 110.0, 300.0),
            lm(RightHip, 190.0, 300.0),
            lm(LeftKnee, 115.0, 390.0),
            lm(RightKnee, 185.0, 390.0),
            lm(LeftAnkle, 115.0, 470.0),
            lm(RightAnkle, 185.0, 470.0),
            lm(LeftHeel, 112.0, 480.0),
            lm(RightHeel, 188.0, 480.0),
        ])
    }

    fn engine() -> GarmentMeasurementEngine {
        GarmentMeasurementEngine::new(MeasurementParams::default()).expect("default params")
    }

    #[test]
    fn chest_scales_by_body_height() {
        let top = engine().measure_top(&standing_pose(), 180.0, Gender::Male);
        assert_eq!(top.len(), 5);
        // 2 * 100 px * 180 / 460
        assert_relative_eq!(
            top.value(MeasurementKind::Chest).unwrap_or_default(),
            78.3,
            epsilon = 1e-4
        );
        assert_relative_eq!(
            top.value(MeasurementKind::ShoulderWidth).unwrap_or_default(),
            39.1,
            epsilon = 1e-4
        );
    }

    #[test]
    fn too_few_landmarks_yield_nothing() {
        let lms: LandmarkSet = standing_pose().iter().take(9).copied().collect();
        let engine = engine();
        assert!(engine.measure_top(&lms, 170.0, Gender::Male).is_empty());
        assert!(engine.measure_bottom(&lms, 170.0, Gender::Male).is_empty());
        let all = engine.measure_all(&lms, 170.0, Gender::Female);
        assert!(all.top.is_empty() && all.bottom.is_empty());
    }

    #[test]
    fn ten_landmarks_are_enough() {
        use PoseLandmark::*;
        let lms: LandmarkSet = standing_pose()
            .iter()
            .filter(|l| {
                [
                    LeftShoulder,
                    RightShoulder,
                    LeftWrist,
                    RightWrist,
                    LeftHip,
                    RightHip,
                    LeftKnee,
                    RightKnee,
                    LeftAnkle,
                    RightAnkle,
                ]
                .contains(&l.id)
            })
            .copied()
            .collect();
        assert_eq!(lms.len(), 10);
        let all = engine().measure_all(&lms, 170.0, Gender::Male);
        assert_eq!(all.top.len(), 5);
        assert_eq!(all.bottom.len(), 5);
    }

    #[test]
    fn overflowing_values_are_omitted() {
        let top = engine().measure_top(&standing_pose(), 1.0e38, Gender::Male);
        assert!(!top.contains(MeasurementKind::Chest));
        assert!(top.contains(MeasurementKind::ShoulderWidth));
        for (_, m) in top.iter() {
            assert!(m.value.is_finite());
        }
        let json = serde_json::to_string(&top).expect("serialize");
        assert!(!json.contains("null"));
    }

    #[test]
    fn ties_round_to_even() {
        let lms: LandmarkSet = standing_pose()
            .iter()
            .map(|l| match l.id {
                PoseLandmark::RightShoulder => lm(PoseLandmark::RightShoulder, 200.5, 100.0),
                _ => *l,
            })
            .collect();
        // 230 cm over 460 px is 0.5 cm/px, so the 100.5 px span is exactly 50.25 cm.
        let top = engine().measure_top(&lms, 230.0, Gender::Male);
        assert_relative_eq!(
            top.value(MeasurementKind::ShoulderWidth).unwrap_or_default(),
            50.2
        );
    }

    #[test]
    fn missing_inputs_drop_single_measurements() {
        let lms: LandmarkSet = standing_pose()
            .iter()
            .filter(|l| l.id != PoseLandmark::RightWrist)
            .copied()
            .collect();
        let top = engine().measure_top(&lms, 170.0, Gender::Male);
        assert!(!top.contains(MeasurementKind::SleeveLength));
        assert_eq!(top.len(), 4);
    }

    #[test]
    fn missing_head_falls_back_to_default_scale() {
        let lms: LandmarkSet = standing_pose()
            .iter()
            .filter(|l| !PoseLandmark::HEAD.contains(&l.id))
            .copied()
            .collect();
        let engine = engine();
        assert!(engine.scale(&lms, 170.0).is_fallback());
        let top = engine.measure_top(&lms, 170.0, Gender::Male);
        // 2 * 100 px * 0.5 cm/px
        assert_relative_eq!(top.value(MeasurementKind::Chest).unwrap_or_default(), 100.0);
    }

    #[test]
    fn values_are_rounded_and_non_negative() {
        let all = engine().measure_all(&standing_pose(), 173.0, Gender::Female);
        for (_, m) in all.top.iter().chain(all.bottom.iter()) {
            assert!(m.value >= 0.0);
            assert_relative_eq!(m.value, round_to(m.value, 1));
        }
    }

    #[test]
    fn fixed_confidence_per_formula() {
        let bottom = engine().measure_bottom(&standing_pose(), 170.0, Gender::Male);
        assert_eq!(bottom.get(MeasurementKind::Rise).map(|m| m.confidence), Some(0.7));
        assert_eq!(bottom.get(MeasurementKind::Thigh).map(|m| m.confidence), Some(0.7));
        assert_eq!(bottom.get(MeasurementKind::Hip).map(|m| m.confidence), Some(0.8));
    }

    #[test]
    fn visibility_confidence_is_opt_in() {
        let mut lms: Vec<Landmark> = standing_pose().iter().copied().collect();
        for l in &mut lms {
            if l.id == PoseLandmark::LeftKnee {
                l.visibility = 0.5;
            }
        }
        let lms = LandmarkSet::new(lms);
        let params = MeasurementParams {
            confidence: ConfidenceMode::Visibility,
            ..MeasurementParams::default()
        };
        let engine = GarmentMeasurementEngine::new(params).expect("params");
        let bottom = engine.measure_bottom(&lms, 170.0, Gender::Male);
        assert_relative_eq!(
            bottom.get(MeasurementKind::Thigh).map(|m| m.confidence).unwrap_or_default(),
            0.75
        );
    }

    #[test]
    fn repeated_calls_agree_and_ignore_gender() {
        let engine = engine();
        let lms = standing_pose();
        let a = engine.measure_all(&lms, 165.0, Gender::Male);
        let b = engine.measure_all(&lms, 165.0, Gender::Male);
        let c = engine.measure_all(&lms, 165.0, Gender::Female);
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a.top, engine.measure_top(&lms, 165.0, Gender::Male));
    }

    #[test]
    fn invalid_params_are_rejected() {
        let mut params = MeasurementParams::default();
        params.coefficients.chest = f32::INFINITY;
        assert!(GarmentMeasurementEngine::new(params).is_err());
    }
}
