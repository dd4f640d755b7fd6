/// Invalid measurement engine configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MeasurementParamsError {
    #[error("coefficient `{name}` must be finite and > 0 (got {value})")]
    InvalidCoefficient { name: &'static str, value: f32 },
    #[error("fallback scale must be finite and > 0 cm/px (got {0})")]
    InvalidFallbackScale(f32),
    #[error("reference length must be finite and > 0 cm (got {0})")]
    InvalidReferenceLength(f32),
}
