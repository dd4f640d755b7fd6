//! Body-type classification.
//!
//! Only a placeholder classifier exists today: it samples a label valid for
//! the subject's gender. Proportion-based classifiers plug in through
//! [`BodyTypeClassifier`] without touching the rest of the pipeline.

use std::fmt;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tailorx_core::{round_to, Gender, LandmarkSet};

use crate::measurement::BodyMeasurements;

/// Silhouette label. `Rectangle` is shared by both genders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyType {
    #[serde(rename = "Reloj de Arena")]
    Hourglass,
    #[serde(rename = "Triángulo (Pera)")]
    Pear,
    #[serde(rename = "Triángulo Invertido")]
    InvertedTriangle,
    #[serde(rename = "Rectángulo")]
    Rectangle,
    #[serde(rename = "Triángulo Invertido (Atlético)")]
    AthleticInvertedTriangle,
    #[serde(rename = "Trapezoide")]
    Trapezoid,
    #[serde(rename = "Triángulo")]
    Triangle,
}

impl BodyType {
    pub const FEMALE: [BodyType; 4] = [
        BodyType::Hourglass,
        BodyType::Pear,
        BodyType::InvertedTriangle,
        BodyType::Rectangle,
    ];

    pub const MALE: [BodyType; 4] = [
        BodyType::AthleticInvertedTriangle,
        BodyType::Trapezoid,
        BodyType::Rectangle,
        BodyType::Triangle,
    ];

    /// Labels a classifier may assign to the given gender.
    pub fn for_gender(gender: Gender) -> &'static [BodyType] {
        match gender {
            Gender::Female => &Self::FEMALE,
            Gender::Male => &Self::MALE,
        }
    }

    pub fn is_valid_for(self, gender: Gender) -> bool {
        Self::for_gender(gender).contains(&self)
    }

    /// Display label, identical to the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            BodyType::Hourglass => "Reloj de Arena",
            BodyType::Pear => "Triángulo (Pera)",
            BodyType::InvertedTriangle => "Triángulo Invertido",
            BodyType::Rectangle => "Rectángulo",
            BodyType::AthleticInvertedTriangle => "Triángulo Invertido (Atlético)",
            BodyType::Trapezoid => "Trapezoide",
            BodyType::Triangle => "Triángulo",
        }
    }
}

impl fmt::Display for BodyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Characteristic text attached to every estimate.
pub const DEFAULT_CHARACTERISTIC: &str = "Proporciones detectadas por IA";

/// Result of a classification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyTypeEstimate {
    #[serde(rename = "type")]
    pub body_type: BodyType,
    /// Two decimals.
    pub confidence: f32,
    pub characteristic: String,
}

/// Assigns a body type to an analysed subject.
pub trait BodyTypeClassifier {
    fn classify(
        &self,
        landmarks: &LandmarkSet,
        measurements: &BodyMeasurements,
        gender: Gender,
    ) -> BodyTypeEstimate;
}

impl<T: BodyTypeClassifier + ?Sized> BodyTypeClassifier for &T {
    fn classify(
        &self,
        landmarks: &LandmarkSet,
        measurements: &BodyMeasurements,
        gender: Gender,
    ) -> BodyTypeEstimate {
        (**self).classify(landmarks, measurements, gender)
    }
}

/// Placeholder classifier: uniform label among those valid for the gender,
/// confidence uniform in `[0.7, 0.9]`.
///
/// Inputs other than gender are ignored.
#[derive(Debug)]
pub struct RandomBodyTypeClassifier {
    rng: Mutex<StdRng>,
}

impl RandomBodyTypeClassifier {
    /// Seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible sequence of estimates.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomBodyTypeClassifier {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl BodyTypeClassifier for RandomBodyTypeClassifier {
    fn classify(
        &self,
        _landmarks: &LandmarkSet,
        _measurements: &BodyMeasurements,
        gender: Gender,
    ) -> BodyTypeEstimate {
        // A panic while holding the lock cannot leave the RNG in a bad state.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let candidates = BodyType::for_gender(gender);
        let body_type = candidates
            .choose(&mut *rng)
            .copied()
            .unwrap_or(BodyType::Rectangle);
        let confidence = round_to(rng.gen_range(0.7f32..=0.9), 2);
        log::debug!("sampled body type {body_type} ({confidence}) for {gender}");

        BodyTypeEstimate {
            body_type,
            confidence,
            characteristic: DEFAULT_CHARACTERISTIC.to_string(),
        }
    }
}
