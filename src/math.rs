//! Angle arithmetic on the 0°/360° heading circle

/// Mathematical constants
pub const DEG_TO_RAD: f32 = core::f32::consts::PI / 180.0;
pub const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

/// One full turn in degrees
pub const FULL_TURN: f32 = 360.0;
const HALF_TURN: f32 = 180.0;

/// Wrap an angle into `[0, 360)`
///
/// Non-finite input has no meaningful direction and maps to 0°.
///
/// # Example
/// ```
/// use compass_heading::normalize_degrees;
///
/// assert_eq!(normalize_degrees(370.0), 10.0);
/// assert_eq!(normalize_degrees(-90.0), 270.0);
/// assert_eq!(normalize_degrees(360.0), 0.0);
/// ```
pub fn normalize_degrees(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }

    let mut wrapped = angle % FULL_TURN;
    if wrapped < 0.0 {
        wrapped += FULL_TURN;
    }

    // Tiny negative remainders round up to exactly 360.0 in f32
    if wrapped >= FULL_TURN { 0.0 } else { wrapped }
}

/// Signed shortest rotation from `from` to `to`, in `[-180, 180]`
///
/// Both angles are expected in `[0, 360)`, so a single wrap of the raw
/// difference is enough.
pub fn shortest_difference(from: f32, to: f32) -> f32 {
    let mut diff = to - from;
    if diff > HALF_TURN {
        diff -= FULL_TURN;
    } else if diff < -HALF_TURN {
        diff += FULL_TURN;
    }
    diff
}

/// Move `current` toward `target` along the shorter arc
///
/// `factor` is the fraction of the remaining arc to cover: 1.0 jumps straight
/// to the target, smaller values respond more slowly. The result is always in
/// `[0, 360)`, including across the north wraparound.
///
/// # Example
/// ```
/// use compass_heading::smooth_angle;
///
/// // 350° -> 10° moves +20° through north, not -340°
/// assert_eq!(smooth_angle(350.0, 10.0, 1.0), 10.0);
/// assert!((smooth_angle(350.0, 10.0, 0.5) - 0.0).abs() < 1e-4);
/// ```
pub fn smooth_angle(current: f32, target: f32, factor: f32) -> f32 {
    let current = normalize_degrees(current);
    let target = normalize_degrees(target);

    normalize_degrees(current + shortest_difference(current, target) * factor)
}
