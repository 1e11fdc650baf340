use glam::Vec3;

/// The engine works in centimeters, blender in meters.
pub const UNITS_PER_METER: f32 = 100.0;

/// The engine is left handed (Z up, Y right), blender right handed (Z up), so Y flips.
#[inline]
pub fn ue_to_blender_location(source: Vec3, scale_factor: f32) -> Vec3 {
    Vec3::new(source.x, -source.y, source.z) / UNITS_PER_METER * scale_factor
}

/// `source` is (Roll, Pitch, Yaw) in degrees, the result are XYZ euler degrees.
/// Flipping the handedness inverts Pitch and Yaw, Roll stays.
#[inline]
pub fn ue_to_blender_rotation(source: Vec3) -> Vec3 {
    Vec3::new(source.x, -source.y, -source.z)
}

#[inline]
pub fn ue_to_blender_scale(source: Option<Vec3>, scale_factor: f32) -> Vec3 {
    source.unwrap_or(Vec3::ONE) * scale_factor
}
