use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Garment a measurement is meant for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GarmentCategory {
    /// Shirts and tops.
    #[serde(rename = "polera")]
    Top,
    /// Pants.
    #[serde(rename = "pantalon")]
    Bottom,
}

impl GarmentCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            GarmentCategory::Top => "polera",
            GarmentCategory::Bottom => "pantalon",
        }
    }
}

/// Every measurement the engine knows how to derive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MeasurementKind {
    #[serde(rename = "pecho_polera")]
    Chest,
    #[serde(rename = "largo_manga")]
    SleeveLength,
    #[serde(rename = "largo_torso")]
    TorsoLength,
    #[serde(rename = "ancho_hombros")]
    ShoulderWidth,
    #[serde(rename = "cintura_polera")]
    TopWaist,
    #[serde(rename = "cintura_pantalon")]
    PantsWaist,
    #[serde(rename = "cadera_pantalon")]
    Hip,
    #[serde(rename = "largo_pierna")]
    LegLength,
    #[serde(rename = "largo_tiro")]
    Rise,
    #[serde(rename = "contorno_muslo")]
    Thigh,
}

impl MeasurementKind {
    pub const TOP: [MeasurementKind; 5] = [
        MeasurementKind::Chest,
        MeasurementKind::SleeveLength,
        MeasurementKind::TorsoLength,
        MeasurementKind::ShoulderWidth,
        MeasurementKind::TopWaist,
    ];

    pub const BOTTOM: [MeasurementKind; 5] = [
        MeasurementKind::PantsWaist,
        MeasurementKind::Hip,
        MeasurementKind::LegLength,
        MeasurementKind::Rise,
        MeasurementKind::Thigh,
    ];

    pub fn for_category(category: GarmentCategory) -> &'static [MeasurementKind] {
        match category {
            GarmentCategory::Top => &Self::TOP,
            GarmentCategory::Bottom => &Self::BOTTOM,
        }
    }

    /// Wire name of the measurement.
    pub fn name(self) -> &'static str {
        match self {
            MeasurementKind::Chest => "pecho_polera",
            MeasurementKind::SleeveLength => "largo_manga",
            MeasurementKind::TorsoLength => "largo_torso",
            MeasurementKind::ShoulderWidth => "ancho_hombros",
            MeasurementKind::TopWaist => "cintura_polera",
            MeasurementKind::PantsWaist => "cintura_pantalon",
            MeasurementKind::Hip => "cadera_pantalon",
            MeasurementKind::LegLength => "largo_pierna",
            MeasurementKind::Rise => "largo_tiro",
            MeasurementKind::Thigh => "contorno_muslo",
        }
    }

    pub fn category(self) -> GarmentCategory {
        if Self::TOP.contains(&self) {
            GarmentCategory::Top
        } else {
            GarmentCategory::Bottom
        }
    }

    /// Text shown next to the value in client UIs.
    pub fn description(self) -> &'static str {
        match self {
            MeasurementKind::Chest => "Contorno de pecho para polera",
            MeasurementKind::SleeveLength => "Largo de manga para polera",
            MeasurementKind::TorsoLength => "Largo de torso para polera",
            MeasurementKind::ShoulderWidth => "Ancho de hombros para polera",
            MeasurementKind::TopWaist => "Cintura para ajuste de polera",
            MeasurementKind::PantsWaist => "Cintura para pantalón",
            MeasurementKind::Hip => "Cadera para pantalón",
            MeasurementKind::LegLength => "Largo exterior de pantalón",
            MeasurementKind::Rise => "Largo de tiro para pantalón",
            MeasurementKind::Thigh => "Contorno de muslo",
        }
    }

    /// Fixed per-formula confidence.
    ///
    /// Rise uses the shoulder line as a waist proxy and thigh girth is a
    /// single-segment estimate, so both rank lower.
    pub fn base_confidence(self) -> f32 {
        match self {
            MeasurementKind::Rise | MeasurementKind::Thigh => 0.7,
            _ => 0.8,
        }
    }
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One derived garment measurement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Centimetres, rounded to one decimal.
    pub value: f32,
    pub confidence: f32,
    pub description: String,
    pub category: GarmentCategory,
}

/// Measurements keyed by name. May hold only part of a category when some
/// landmarks were missing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeasurementSet {
    entries: BTreeMap<MeasurementKind, Measurement>,
}

impl MeasurementSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: MeasurementKind, measurement: Measurement) {
        self.entries.insert(kind, measurement);
    }

    pub fn get(&self, kind: MeasurementKind) -> Option<&Measurement> {
        self.entries.get(&kind)
    }

    /// Shortcut for the value of one measurement.
    pub fn value(&self, kind: MeasurementKind) -> Option<f32> {
        self.get(kind).map(|m| m.value)
    }

    pub fn contains(&self, kind: MeasurementKind) -> bool {
        self.entries.contains_key(&kind)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MeasurementKind, &Measurement)> {
        self.entries.iter().map(|(k, m)| (*k, m))
    }
}

/// Top and bottom measurements derived from the same landmark set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyMeasurements {
    pub top: MeasurementSet,
    pub bottom: MeasurementSet,
}

impl BodyMeasurements {
    pub fn get(&self, kind: MeasurementKind) -> Option<&Measurement> {
        match kind.category() {
            GarmentCategory::Top => self.top.get(kind),
            GarmentCategory::Bottom => self.bottom.get(kind),
        }
    }
}
