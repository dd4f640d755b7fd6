use nalgebra::Point2;

/// Euclidean distance between two image points.
#[inline]
pub fn distance(a: Point2<f32>, b: Point2<f32>) -> f32 {
    (b - a).norm()
}

/// Mean vertical coordinate of two points.
#[inline]
pub fn mean_y(a: Point2<f32>, b: Point2<f32>) -> f32 {
    (a.y + b.y) * 0.5
}

/// Round to `decimals` places, ties to even (`50.25` -> `50.2`).
///
/// Non-finite for inputs whose scaled value overflows `f32`.
#[inline]
pub fn round_to(value: f32, decimals: i32) -> f32 {
    let k = 10f32.powi(decimals);
    (value * k).round_ties_even() / k
}
