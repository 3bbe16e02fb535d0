use nalgebra::{UnitQuaternion, Vector3};

/// Convert radians to degrees
#[inline]
pub fn rad_to_deg(rad: f32) -> f32 {
    rad.to_degrees()
}

#[inline]
pub fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Linear interpolation between two values, with the factor clamped to [0, 1]
#[inline]
pub fn lerp(start: f32, end: f32, factor: f32) -> f32 {
    start + (end - start) * clamp01(factor)
}

/// Replaces NaN with zero; finite and infinite values pass through.
#[inline]
pub fn sanitize(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

/// Wrap an angle in degrees into [0, 360)
pub fn normalize_degrees(deg: f32) -> f32 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Length of the horizontal (X/Z) component of a vector
#[inline]
pub fn horizontal_length(v: &Vector3<f32>) -> f32 {
    v.x.hypot(v.z)
}

/// World-space direction of the body's local +Y axis
#[inline]
pub fn body_up(rotation: &UnitQuaternion<f32>) -> Vector3<f32> {
    rotation * Vector3::y()
}

/// World-space direction of the body's local +Z axis
#[inline]
pub fn body_forward(rotation: &UnitQuaternion<f32>) -> Vector3<f32> {
    rotation * Vector3::z()
}

/// World-space direction of the body's local +X axis
#[inline]
pub fn body_right(rotation: &UnitQuaternion<f32>) -> Vector3<f32> {
    rotation * Vector3::x()
}

/// Compass heading of a forward vector in degrees, 0 along +Z, increasing towards +X
pub fn heading_degrees(forward: &Vector3<f32>) -> f32 {
    normalize_degrees(rad_to_deg(forward.x.atan2(forward.z)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_normalize_degrees() {
        assert_relative_eq!(normalize_degrees(-90.0), 270.0);
        assert_relative_eq!(normalize_degrees(720.0), 0.0);
        assert_relative_eq!(normalize_degrees(45.0), 45.0);
        assert!(normalize_degrees(-1e-7) < 360.0);
    }

    #[test]
    fn test_lerp_clamps_factor() {
        assert_relative_eq!(lerp(0.45, 1.0, 0.5), 0.725);
        assert_relative_eq!(lerp(0.45, 1.0, -3.0), 0.45);
        assert_relative_eq!(lerp(0.45, 1.0, 3.0), 1.0);
    }

    #[test]
    fn test_heading_from_rotation() {
        let identity = UnitQuaternion::identity();
        assert_relative_eq!(heading_degrees(&body_forward(&identity)), 0.0);

        let turned = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2);
        assert_relative_eq!(heading_degrees(&body_forward(&turned)), 90.0, epsilon = 1e-4);

        let turned_back = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), -FRAC_PI_2);
        assert_relative_eq!(heading_degrees(&body_forward(&turned_back)), 270.0, epsilon = 1e-4);
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize(f32::NAN), 0.0);
        assert_eq!(sanitize(0.3), 0.3);
    }
}
