//! Body landmarks as produced by an external pose detector.
//!
//! Landmarks are addressed by [`PoseLandmark`] name rather than by raw
//! position in the detector output, so a change of upstream ordering shows
//! up as a conversion failure instead of a silently wrong measurement.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Semantic name for each point of the 33-point body pose numbering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoseLandmark {
    Nose,
    LeftEyeInner,
    LeftEye,
    LeftEyeOuter,
    RightEyeInner,
    RightEye,
    RightEyeOuter,
    LeftEar,
    RightEar,
    MouthLeft,
    MouthRight,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftPinky,
    RightPinky,
    LeftIndex,
    RightIndex,
    LeftThumb,
    RightThumb,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftHeel,
    RightHeel,
    LeftFootIndex,
    RightFootIndex,
}

impl PoseLandmark {
    /// All landmarks in detector order.
    pub const ALL: [PoseLandmark; 33] = [
        PoseLandmark::Nose,
        PoseLandmark::LeftEyeInner,
        PoseLandmark::LeftEye,
        PoseLandmark::LeftEyeOuter,
        PoseLandmark::RightEyeInner,
        PoseLandmark::RightEye,
        PoseLandmark::RightEyeOuter,
        PoseLandmark::LeftEar,
        PoseLandmark::RightEar,
        PoseLandmark::MouthLeft,
        PoseLandmark::MouthRight,
        PoseLandmark::LeftShoulder,
        PoseLandmark::RightShoulder,
        PoseLandmark::LeftElbow,
        PoseLandmark::RightElbow,
        PoseLandmark::LeftWrist,
        PoseLandmark::RightWrist,
        PoseLandmark::LeftPinky,
        PoseLandmark::RightPinky,
        PoseLandmark::LeftIndex,
        PoseLandmark::RightIndex,
        PoseLandmark::LeftThumb,
        PoseLandmark::RightThumb,
        PoseLandmark::LeftHip,
        PoseLandmark::RightHip,
        PoseLandmark::LeftKnee,
        PoseLandmark::RightKnee,
        PoseLandmark::LeftAnkle,
        PoseLandmark::RightAnkle,
        PoseLandmark::LeftHeel,
        PoseLandmark::RightHeel,
        PoseLandmark::LeftFootIndex,
        PoseLandmark::RightFootIndex,
    ];

    /// Head-region points used for the top of the body span.
    pub const HEAD: [PoseLandmark; 4] = [
        PoseLandmark::Nose,
        PoseLandmark::LeftEyeInner,
        PoseLandmark::LeftEye,
        PoseLandmark::LeftEyeOuter,
    ];

    /// Foot-region points used for the bottom of the body span.
    pub const FEET: [PoseLandmark; 4] = [
        PoseLandmark::LeftAnkle,
        PoseLandmark::RightAnkle,
        PoseLandmark::LeftHeel,
        PoseLandmark::RightHeel,
    ];

    /// Landmarks worth exporting in reports: face anchors and the limb joints
    /// the measurement formulas consume.
    pub const KEY_POINTS: [PoseLandmark; 15] = [
        PoseLandmark::Nose,
        PoseLandmark::LeftEar,
        PoseLandmark::RightEar,
        PoseLandmark::LeftShoulder,
        PoseLandmark::RightShoulder,
        PoseLandmark::LeftElbow,
        PoseLandmark::RightElbow,
        PoseLandmark::LeftWrist,
        PoseLandmark::RightWrist,
        PoseLandmark::LeftHip,
        PoseLandmark::RightHip,
        PoseLandmark::LeftKnee,
        PoseLandmark::RightKnee,
        PoseLandmark::LeftAnkle,
        PoseLandmark::RightAnkle,
    ];

    /// Position of this landmark in the detector numbering.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`PoseLandmark::index`].
    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// One detected body point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub id: PoseLandmark,
    /// Pixel position in the source image.
    pub position: Point2<f32>,
    /// Relative depth as reported by the detector.
    #[serde(default)]
    pub z: f32,
    /// Confidence in [0, 1] that the point is genuine and unoccluded.
    pub visibility: f32,
}

impl Landmark {
    pub fn new(id: PoseLandmark, x: f32, y: f32, z: f32, visibility: f32) -> Self {
        Self {
            id,
            position: Point2::new(x, y),
            z,
            visibility,
        }
    }
}

/// Raw detector record, addressed by numeric index.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawLandmark {
    pub id: usize,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
    #[serde(default = "default_visibility")]
    pub visibility: f32,
}

fn default_visibility() -> f32 {
    1.0
}

/// Landmarks detected on one image, kept in detector order.
///
/// An empty set means no person was found; downstream code treats it as a
/// degenerate input rather than an error.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct LandmarkSet {
    landmarks: Vec<Landmark>,
}

impl LandmarkSet {
    /// Build a set from landmarks; later duplicates replace earlier ones.
    pub fn new(landmarks: impl IntoIterator<Item = Landmark>) -> Self {
        let mut out: Vec<Landmark> = Vec::new();
        for lm in landmarks {
            match out.iter_mut().find(|l| l.id == lm.id) {
                Some(slot) => *slot = lm,
                None => out.push(lm),
            }
        }
        out.sort_by_key(|l| l.id);
        Self { landmarks: out }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Convert raw detector records in pixel coordinates.
    ///
    /// Records whose index falls outside the known numbering are dropped.
    pub fn from_indexed(raw: &[RawLandmark]) -> Self {
        Self::new(raw.iter().filter_map(|r| adapt_raw(r, 1.0, 1.0)))
    }

    /// Convert raw detector records whose `x`/`y` are normalized to `[0, 1]`
    /// by scaling them to the image size.
    pub fn from_normalized(raw: &[RawLandmark], width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        Self::new(raw.iter().filter_map(|r| adapt_raw(r, w, h)))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn get(&self, id: PoseLandmark) -> Option<&Landmark> {
        self.landmarks
            .binary_search_by_key(&id, |l| l.id)
            .ok()
            .map(|idx| &self.landmarks[idx])
    }

    /// Pixel position of a landmark, if present.
    #[inline]
    pub fn position(&self, id: PoseLandmark) -> Option<Point2<f32>> {
        self.get(id).map(|l| l.position)
    }

    pub fn contains_all(&self, ids: &[PoseLandmark]) -> bool {
        ids.iter().all(|&id| self.get(id).is_some())
    }

    /// Keep only the requested landmarks (in detector order).
    pub fn subset(&self, ids: &[PoseLandmark]) -> Self {
        Self {
            landmarks: self
                .landmarks
                .iter()
                .filter(|l| ids.contains(&l.id))
                .copied()
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.landmarks.iter()
    }

    pub fn as_slice(&self) -> &[Landmark] {
        &self.landmarks
    }
}

impl From<Vec<Landmark>> for LandmarkSet {
    fn from(landmarks: Vec<Landmark>) -> Self {
        Self::new(landmarks)
    }
}

impl From<LandmarkSet> for Vec<Landmark> {
    fn from(set: LandmarkSet) -> Self {
        set.landmarks
    }
}

impl FromIterator<Landmark> for LandmarkSet {
    fn from_iter<T: IntoIterator<Item = Landmark>>(iter: T) -> Self {
        Self::new(iter)
    }
}

fn adapt_raw(r: &RawLandmark, sx: f32, sy: f32) -> Option<Landmark> {
    let Some(id) = PoseLandmark::from_index(r.id) else {
        log::warn!("dropping landmark with unknown index {}", r.id);
        return None;
    };
    Some(Landmark::new(id, r.x * sx, r.y * sy, r.z, r.visibility))
}
