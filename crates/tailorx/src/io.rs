//! JSON configuration and report helpers for file-driven analysis runs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tailorx_core::{
    CalibrationParams, Gender, LandmarkSet, PoseLandmark, ScaleFactor, DEFAULT_HEIGHT_CM,
};
use tailorx_measure::{
    CircumferenceCoefficients, ConfidenceMode, GarmentMeasurementEngine, MeasurementParams,
    MeasurementParamsError, RandomBodyTypeClassifier,
};

use crate::analyze::{AnalysisResponse, AnalyzeError, BodyAnalysis, BodyAnalyzer};
use crate::detector::{DetectorParams, RecordedPoseDetector};

#[derive(thiserror::Error, Debug)]
pub enum TailorIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn default_height_cm() -> f32 {
    DEFAULT_HEIGHT_CM
}

/// Configuration for one analysis run over recorded pose captures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub front_capture: String,
    pub side_capture: String,
    #[serde(default = "default_height_cm")]
    pub height_cm: f32,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub output_path: Option<String>,
    /// Seed for the body-type classifier; entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub detector: Option<DetectorParams>,
    #[serde(default)]
    pub min_landmarks: Option<usize>,
    #[serde(default)]
    pub calibration: Option<CalibrationParams>,
    #[serde(default)]
    pub coefficients: Option<CircumferenceCoefficients>,
    #[serde(default)]
    pub confidence: Option<ConfidenceMode>,
}

impl AnalysisConfig {
    /// Config with every override left at its default.
    pub fn new(front_capture: impl Into<String>, side_capture: impl Into<String>) -> Self {
        Self {
            front_capture: front_capture.into(),
            side_capture: side_capture.into(),
            height_cm: DEFAULT_HEIGHT_CM,
            gender: Gender::default(),
            output_path: None,
            seed: None,
            detector: None,
            min_landmarks: None,
            calibration: None,
            coefficients: None,
            confidence: None,
        }
    }

    /// Same as [`Self::new`] but with every override section written out, so
    /// a saved template documents the available knobs.
    pub fn template(front_capture: impl Into<String>, side_capture: impl Into<String>) -> Self {
        let params = MeasurementParams::default();
        Self {
            output_path: Some(default_output_path().to_string_lossy().into_owned()),
            detector: Some(DetectorParams::default()),
            min_landmarks: Some(params.min_landmarks),
            calibration: Some(params.calibration),
            coefficients: Some(params.coefficients),
            confidence: Some(params.confidence),
            ..Self::new(front_capture, side_capture)
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, TailorIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), TailorIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(default_output_path)
    }

    /// Build measurement parameters, applying overrides from the config.
    pub fn build_params(&self) -> MeasurementParams {
        let mut params = MeasurementParams::default();
        if let Some(min_landmarks) = self.min_landmarks {
            params.min_landmarks = min_landmarks;
        }
        if let Some(calibration) = self.calibration {
            params.calibration = calibration;
        }
        if let Some(coefficients) = self.coefficients {
            params.coefficients = coefficients;
        }
        if let Some(confidence) = self.confidence {
            params.confidence = confidence;
        }
        params
    }

    pub fn build_classifier(&self) -> RandomBodyTypeClassifier {
        match self.seed {
            Some(seed) => RandomBodyTypeClassifier::with_seed(seed),
            None => RandomBodyTypeClassifier::from_entropy(),
        }
    }

    /// Build an analyzer from this config.
    pub fn build_analyzer(
        &self,
    ) -> Result<BodyAnalyzer<RecordedPoseDetector, RandomBodyTypeClassifier>, MeasurementParamsError>
    {
        let engine = GarmentMeasurementEngine::new(self.build_params())?;
        let detector = RecordedPoseDetector::new(self.detector.unwrap_or_default());
        Ok(BodyAnalyzer::new(detector, engine, self.build_classifier()))
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from("tailorx_report.json")
}

/// Outcome of a config-driven run, as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub config_path: String,
    pub front_capture: String,
    pub side_capture: String,
    pub height_cm: f32,
    pub gender: Gender,
    #[serde(default)]
    pub scale: Option<ScaleFactor>,
    /// Front-view face anchors and limb joints, in pixels.
    #[serde(default)]
    pub key_landmarks: Option<LandmarkSet>,
    #[serde(default)]
    pub side_landmarks_detected: Option<usize>,
    #[serde(default)]
    pub response: Option<AnalysisResponse>,
    #[serde(default)]
    pub error: Option<String>,
}

impl AnalysisReport {
    /// Build a base report from the input config.
    pub fn new(cfg: &AnalysisConfig, config_path: &Path) -> Self {
        Self {
            config_path: config_path.to_string_lossy().into_owned(),
            front_capture: cfg.front_capture.clone(),
            side_capture: cfg.side_capture.clone(),
            height_cm: cfg.height_cm,
            gender: cfg.gender,
            scale: None,
            key_landmarks: None,
            side_landmarks_detected: None,
            response: None,
            error: None,
        }
    }

    /// Populate report fields from a successful analysis.
    pub fn set_analysis(&mut self, analysis: BodyAnalysis) {
        self.scale = Some(analysis.scale);
        self.key_landmarks = Some(analysis.front_landmarks.subset(&PoseLandmark::KEY_POINTS));
        self.side_landmarks_detected = Some(analysis.side_landmarks.len());
        self.response = Some(AnalysisResponse::from(analysis));
        self.error = None;
    }

    /// Record an analysis error.
    pub fn set_error(&mut self, err: &AnalyzeError) {
        self.response = Some(AnalysisResponse::failure(err));
        self.error = Some(err.to_string());
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, TailorIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), TailorIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Static description of the service and what it computes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub status: String,
    pub service: String,
    pub version: String,
    pub features: Vec<String>,
    pub detector: DetectorParams,
}

impl ServiceInfo {
    pub fn current() -> Self {
        Self {
            status: "OK".to_string(),
            service: "tailorx body analysis".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            features: vec![
                "top (polera) measurements: 5".to_string(),
                "bottom (pantalon) measurements: 5".to_string(),
                "style recommendations".to_string(),
                "recorded pose captures".to_string(),
            ],
            detector: DetectorParams::default(),
        }
    }
}
