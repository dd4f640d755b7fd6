//! End-to-end body analysis: detection, measurement, classification and
//! recommendations for one request.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use tailorx_core::{Gender, LandmarkSet, ScaleFactor, DEFAULT_HEIGHT_CM};
use tailorx_measure::{
    recommend, BodyMeasurements, BodyTypeClassifier, BodyTypeEstimate, GarmentMeasurementEngine,
    MeasurementSet, RandomBodyTypeClassifier,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::detector::{DetectorError, PoseDetector};

/// Errors that abort an analysis.
#[derive(thiserror::Error, Debug)]
pub enum AnalyzeError {
    /// `front` / `side` are `true` when that image is absent.
    #[error("front and side images are both required (front missing: {front}, side missing: {side})")]
    InputMissing { front: bool, side: bool },

    #[error("height must be finite and > 0 cm (got {0})")]
    InvalidHeight(f32),

    #[error(transparent)]
    Detector(#[from] DetectorError),

    #[error("analysis aborted unexpectedly: {0}")]
    Panicked(String),
}

impl AnalyzeError {
    /// Stable machine-readable class, reported as `error` in responses.
    pub fn category(&self) -> &'static str {
        match self {
            AnalyzeError::InputMissing { .. } => "input_missing",
            AnalyzeError::InvalidHeight(_) => "invalid_height",
            AnalyzeError::Detector(_) | AnalyzeError::Panicked(_) => "processing_error",
        }
    }
}

/// One analysis request. Both images are required; `None` models an upload
/// that never arrived.
#[derive(Debug)]
pub struct AnalysisRequest<'a, I: ?Sized> {
    pub front: Option<&'a I>,
    pub side: Option<&'a I>,
    pub height_cm: f32,
    pub gender: Gender,
}

impl<'a, I: ?Sized> AnalysisRequest<'a, I> {
    /// Request with the default height and gender.
    pub fn new(front: Option<&'a I>, side: Option<&'a I>) -> Self {
        Self {
            front,
            side,
            height_cm: DEFAULT_HEIGHT_CM,
            gender: Gender::default(),
        }
    }

    pub fn with_height(mut self, height_cm: f32) -> Self {
        self.height_cm = height_cm;
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }
}

/// Everything derived for one subject.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyAnalysis {
    pub measurements: BodyMeasurements,
    pub body_type: BodyTypeEstimate,
    pub recommendations: Vec<String>,
    /// Landmarks found on the front image; all measurements come from these.
    pub front_landmarks: LandmarkSet,
    pub side_landmarks: LandmarkSet,
    pub scale: ScaleFactor,
}

impl BodyAnalysis {
    #[inline]
    pub fn landmarks_detected(&self) -> usize {
        self.front_landmarks.len()
    }

    pub fn summary(&self) -> String {
        format!(
            "Sistema calculó {} medidas polera y {} medidas pantalón",
            self.measurements.top.len(),
            self.measurements.bottom.len()
        )
    }
}

/// Runs the full pipeline with an injected detector and classifier.
///
/// Holds no per-request state; it is `Send + Sync` whenever `D` and `C` are.
#[derive(Debug)]
pub struct BodyAnalyzer<D, C = RandomBodyTypeClassifier> {
    detector: D,
    engine: GarmentMeasurementEngine,
    classifier: C,
}

impl<D: PoseDetector, C: BodyTypeClassifier> BodyAnalyzer<D, C> {
    pub fn new(detector: D, engine: GarmentMeasurementEngine, classifier: C) -> Self {
        Self {
            detector,
            engine,
            classifier,
        }
    }

    #[inline]
    pub fn detector(&self) -> &D {
        &self.detector
    }

    #[inline]
    pub fn engine(&self) -> &GarmentMeasurementEngine {
        &self.engine
    }

    /// Analyse one subject.
    ///
    /// An image without a person is not an error: it produces empty
    /// measurement sets and zero detected landmarks.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, request),
            fields(height_cm = request.height_cm, gender = %request.gender)
        )
    )]
    pub fn analyze(
        &self,
        request: &AnalysisRequest<'_, D::Image>,
    ) -> Result<BodyAnalysis, AnalyzeError> {
        let (front, side) = match (request.front, request.side) {
            (Some(front), Some(side)) => (front, side),
            (front, side) => {
                return Err(AnalyzeError::InputMissing {
                    front: front.is_none(),
                    side: side.is_none(),
                })
            }
        };
        let height_cm = request.height_cm;
        if !height_cm.is_finite() || height_cm <= 0.0 {
            return Err(AnalyzeError::InvalidHeight(height_cm));
        }
        let gender = request.gender;
        log::info!("analysing subject: height {height_cm} cm, gender {gender}");

        let front_landmarks = self.detector.detect(front)?;
        // Detected for completeness; no formula reads the side view yet.
        let side_landmarks = self.detector.detect(side)?;
        log::info!(
            "landmarks detected: front {}, side {}",
            front_landmarks.len(),
            side_landmarks.len()
        );

        let scale = self.engine.scale(&front_landmarks, height_cm);
        let measurements = self.engine.measure_all(&front_landmarks, height_cm, gender);
        let body_type = self
            .classifier
            .classify(&front_landmarks, &measurements, gender);
        let recommendations = recommend(body_type.body_type, gender)
            .iter()
            .map(|s| s.to_string())
            .collect();

        let analysis = BodyAnalysis {
            measurements,
            body_type,
            recommendations,
            front_landmarks,
            side_landmarks,
            scale,
        };
        log::info!("{}", analysis.summary());
        Ok(analysis)
    }

    /// [`Self::analyze`], with panics in the detector, engine or classifier
    /// turned into [`AnalyzeError::Panicked`].
    pub fn try_analyze(
        &self,
        request: &AnalysisRequest<'_, D::Image>,
    ) -> Result<BodyAnalysis, AnalyzeError> {
        match catch_unwind(AssertUnwindSafe(|| self.analyze(request))) {
            Ok(result) => result,
            Err(payload) => Err(AnalyzeError::Panicked(panic_message(payload.as_ref()))),
        }
    }

    /// Analyse and shape the outcome as a wire response. Never fails.
    pub fn respond(&self, request: &AnalysisRequest<'_, D::Image>) -> AnalysisResponse {
        match self.try_analyze(request) {
            Ok(analysis) => AnalysisResponse::from(analysis),
            Err(err) => {
                log::error!("analysis failed ({}): {err}", err.category());
                AnalysisResponse::failure(&err)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// JSON shape returned to callers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polera_measurements: Option<MeasurementSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pantalon_measurements: Option<MeasurementSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_type: Option<BodyTypeEstimate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clothing_recommendations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmarks_detected: Option<usize>,
    /// Error category on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub message: String,
}

impl AnalysisResponse {
    pub fn failure(err: &AnalyzeError) -> Self {
        Self {
            success: false,
            polera_measurements: None,
            pantalon_measurements: None,
            body_type: None,
            clothing_recommendations: None,
            landmarks_detected: None,
            error: Some(err.category().to_string()),
            message: err.to_string(),
        }
    }
}

impl From<BodyAnalysis> for AnalysisResponse {
    fn from(analysis: BodyAnalysis) -> Self {
        let message = analysis.summary();
        let landmarks_detected = analysis.landmarks_detected();
        Self {
            success: true,
            polera_measurements: Some(analysis.measurements.top),
            pantalon_measurements: Some(analysis.measurements.bottom),
            body_type: Some(analysis.body_type),
            clothing_recommendations: Some(analysis.recommendations),
            landmarks_detected: Some(landmarks_detected),
            error: None,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tailorx_core::{Landmark, PoseLandmark};
    use tailorx_measure::MeasurementParams;

    /// Detector keyed by a tiny string "image".
    struct Fixed(LandmarkSet);

    impl PoseDetector for Fixed {
        type Image = str;

        fn detect(&self, image: &str) -> Result<LandmarkSet, DetectorError> {
            match image {
                "empty" => Ok(LandmarkSet::empty()),
                "boom" => panic!("model crashed"),
                "bad" => Err(DetectorError::Backend("corrupt image".into())),
                _ => Ok(self.0.clone()),
            }
        }
    }

    fn analyzer() -> BodyAnalyzer<Fixed> {
        let lms = LandmarkSet::new(
            PoseLandmark::ALL
                .iter()
                .enumerate()
                .map(|(i, &id)| Landmark::new(id, 100.0 + i as f32, 10.0 * i as f32, 0.0, 1.0)),
        );
        BodyAnalyzer::new(
            Fixed(lms),
            GarmentMeasurementEngine::new(MeasurementParams::default()).expect("params"),
            RandomBodyTypeClassifier::with_seed(1),
        )
    }

    #[test]
    fn categories_are_stable() {
        let missing = AnalyzeError::InputMissing {
            front: true,
            side: false,
        };
        assert_eq!(missing.category(), "input_missing");
        assert_eq!(AnalyzeError::InvalidHeight(0.0).category(), "invalid_height");
        assert_eq!(
            AnalyzeError::Panicked("x".into()).category(),
            "processing_error"
        );
    }

    #[test]
    fn missing_side_is_rejected_before_detection() {
        let a = analyzer();
        let req = AnalysisRequest::new(Some("boom"), None);
        let err = a.analyze(&req).expect_err("side missing");
        assert!(matches!(
            err,
            AnalyzeError::InputMissing {
                front: false,
                side: true
            }
        ));
    }

    #[test]
    fn invalid_heights_are_rejected() {
        let a = analyzer();
        for h in [0.0, -170.0, f32::NAN, f32::INFINITY] {
            let req = AnalysisRequest::new(Some("p"), Some("p")).with_height(h);
            assert!(matches!(a.analyze(&req), Err(AnalyzeError::InvalidHeight(_))));
        }
    }

    #[test]
    fn panics_become_processing_errors() {
        let a = analyzer();
        let req = AnalysisRequest::new(Some("boom"), Some("p"));
        let resp = a.respond(&req);
        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("processing_error"));
        assert!(resp.message.contains("model crashed"));
    }

    #[test]
    fn detector_failures_become_processing_errors() {
        let resp = analyzer().respond(&AnalysisRequest::new(Some("p"), Some("bad")));
        assert_eq!(resp.error.as_deref(), Some("processing_error"));
        assert!(resp.message.contains("corrupt image"));
    }

    #[test]
    fn full_pose_fills_every_section() {
        let a = analyzer();
        let req = AnalysisRequest::new(Some("p"), Some("p")).with_gender(Gender::Female);
        let analysis = a.analyze(&req).expect("analysis");
        assert_eq!(analysis.landmarks_detected(), 33);
        assert_eq!(analysis.measurements.top.len(), 5);
        assert_eq!(analysis.measurements.bottom.len(), 5);
        assert!(analysis.body_type.body_type.is_valid_for(Gender::Female));
        assert_eq!(analysis.recommendations.len(), 4);
        assert_eq!(analysis.summary(), "Sistema calculó 5 medidas polera y 5 medidas pantalón");
    }

    #[test]
    fn empty_front_image_is_a_successful_empty_analysis() {
        let resp = analyzer().respond(&AnalysisRequest::new(Some("empty"), Some("p")));
        assert!(resp.success);
        assert_eq!(resp.landmarks_detected, Some(0));
        assert_eq!(resp.polera_measurements.map(|m| m.len()), Some(0));
        assert_eq!(resp.message, "Sistema calculó 0 medidas polera y 0 medidas pantalón");
    }
}
