//! Planar joint geometry.

/// Angle in degrees at vertex `b` formed by the segments to `a` and `c`.
///
/// Always in `[0, 180]` and symmetric in `a` and `c`.
pub fn angle_at(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> f32 {
    let radians = (c.1 - b.1).atan2(c.0 - b.0) - (a.1 - b.1).atan2(a.0 - b.0);
    let angle = radians.to_degrees().abs();

    if angle > 180.0 {
        360.0 - angle
    } else {
        angle
    }
}

/// Absolute vertical separation between two points.
pub fn vertical_distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    (a.1 - b.1).abs()
}
