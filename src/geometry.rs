// src/geometry.rs
use nalgebra::Point2;

/// Angle at vertex `b` between the rays b->a and b->c, in degrees.
///
/// This is the absolute difference of the two `atan2` headings and is not
/// folded back into [0, 180]: depending on where the rays straddle the
/// negative x axis the result can reach just under 360.
pub fn calculate_angle(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> f64 {
    let to_c = c - b;
    let to_a = a - b;

    (to_c.y.atan2(to_c.x) - to_a.y.atan2(to_a.x)).to_degrees().abs()
}
