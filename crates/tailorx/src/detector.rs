//! Pose detector capability and a detector backed by recorded captures.
//!
//! A pose model is expensive to initialise, so it is built once and passed to
//! [`crate::BodyAnalyzer`] as a value implementing [`PoseDetector`]. The
//! model itself lives outside this crate; [`RecordedPoseDetector`] replays
//! landmark captures saved to JSON, which keeps the pipeline runnable and
//! testable without one.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tailorx_core::{LandmarkSet, RawLandmark};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced while running a pose detector.
#[derive(thiserror::Error, Debug)]
pub enum DetectorError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed pose capture {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("normalized capture {0} has neither `image_size` nor a readable `image_path`")]
    MissingImageSize(PathBuf),

    #[cfg(feature = "image")]
    #[error("failed to read image header: {0}")]
    Image(#[from] image::ImageError),

    /// Failure reported by an external detector backend.
    #[error("pose model failure: {0}")]
    Backend(String),
}

/// Turns one image into body landmarks.
///
/// An empty [`LandmarkSet`] means no person was found and is not an error.
pub trait PoseDetector {
    type Image: ?Sized;

    fn detect(&self, image: &Self::Image) -> Result<LandmarkSet, DetectorError>;
}

impl<T: PoseDetector + ?Sized> PoseDetector for &T {
    type Image = T::Image;

    fn detect(&self, image: &Self::Image) -> Result<LandmarkSet, DetectorError> {
        (**self).detect(image)
    }
}

fn default_true() -> bool {
    true
}

fn default_model_complexity() -> u8 {
    2
}

fn default_min_detection_confidence() -> f32 {
    0.7
}

fn default_min_tracking_confidence() -> f32 {
    0.5
}

/// Pose model settings, applied once at detector construction.
///
/// `min_detection_confidence` is the only field every detector honours.
/// The rest are handed through to a live pose-model backend implementing
/// [`PoseDetector`]; [`RecordedPoseDetector`] replays finished captures and
/// ignores them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectorParams {
    /// Backend only. Treat every input as an unrelated still image.
    #[serde(default = "default_true")]
    pub static_image_mode: bool,
    /// Backend only. 0 (lite) to 2 (heavy).
    #[serde(default = "default_model_complexity")]
    pub model_complexity: u8,
    /// Detections scoring below this are reported as "no person".
    #[serde(default = "default_min_detection_confidence")]
    pub min_detection_confidence: f32,
    /// Backend only.
    #[serde(default = "default_min_tracking_confidence")]
    pub min_tracking_confidence: f32,
    /// Backend only.
    #[serde(default)]
    pub enable_segmentation: bool,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            static_image_mode: true,
            model_complexity: default_model_complexity(),
            min_detection_confidence: default_min_detection_confidence(),
            min_tracking_confidence: default_min_tracking_confidence(),
            enable_segmentation: false,
        }
    }
}

/// Coordinate space of the landmarks in a capture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSpace {
    /// `x`, `y` in `[0, 1]` relative to the image size, as pose models emit them.
    #[default]
    Normalized,
    /// Pixel coordinates.
    Pixel,
}

/// Raw pose-model output for one image, as saved to disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoseCapture {
    /// `[width, height]` of the source image.
    #[serde(default)]
    pub image_size: Option<[u32; 2]>,
    /// Source image, relative to the capture file. Its header supplies the
    /// size when `image_size` is absent.
    #[serde(default)]
    pub image_path: Option<String>,
    /// Person detection score; absent means the model did not report one.
    #[serde(default)]
    pub score: Option<f32>,
    #[serde(default)]
    pub coordinates: CoordinateSpace,
    #[serde(default)]
    pub landmarks: Vec<RawLandmark>,
}

impl PoseCapture {
    /// Load a capture from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, DetectorError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| DetectorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| DetectorError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// [`PoseDetector`] whose "images" are [`PoseCapture`] JSON files.
#[derive(Clone, Debug, Default)]
pub struct RecordedPoseDetector {
    params: DetectorParams,
}

impl RecordedPoseDetector {
    pub fn new(params: DetectorParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    /// Convert an in-memory capture. `origin` locates a relative `image_path`.
    pub fn landmarks_from_capture(
        &self,
        capture: &PoseCapture,
        origin: &Path,
    ) -> Result<LandmarkSet, DetectorError> {
        if let Some(score) = capture.score {
            if score < self.params.min_detection_confidence {
                log::info!(
                    "{}: detection score {score:.2} below {:.2}, no person",
                    origin.display(),
                    self.params.min_detection_confidence
                );
                return Ok(LandmarkSet::empty());
            }
        }

        let landmarks = match capture.coordinates {
            CoordinateSpace::Pixel => LandmarkSet::from_indexed(&capture.landmarks),
            CoordinateSpace::Normalized => {
                if capture.landmarks.is_empty() {
                    return Ok(LandmarkSet::empty());
                }
                let [w, h] = image_size(capture, origin)?;
                LandmarkSet::from_normalized(&capture.landmarks, w, h)
            }
        };
        log::debug!("{}: {} landmarks", origin.display(), landmarks.len());
        Ok(landmarks)
    }
}

impl PoseDetector for RecordedPoseDetector {
    type Image = Path;

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, path), fields(path = %path.display()))
    )]
    fn detect(&self, path: &Path) -> Result<LandmarkSet, DetectorError> {
        let capture = PoseCapture::load_json(path)?;
        self.landmarks_from_capture(&capture, path)
    }
}

fn image_size(capture: &PoseCapture, origin: &Path) -> Result<[u32; 2], DetectorError> {
    if let Some(size) = capture.image_size {
        return Ok(size);
    }

    #[cfg(feature = "image")]
    if let Some(rel) = capture.image_path.as_deref() {
        let path = origin
            .parent()
            .map(|dir| dir.join(rel))
            .unwrap_or_else(|| PathBuf::from(rel));
        let (w, h) = image::image_dimensions(&path)?;
        return Ok([w, h]);
    }

    Err(DetectorError::MissingImageSize(origin.to_path_buf()))
}
