//! Conversion of raw orientation samples into compass headings
//!
//! Platforms disagree on how orientation is reported. Some deliver a native
//! compass heading that is already clockwise from north and corrected for the
//! screen; others only deliver Euler angles whose alpha sign convention varies
//! between devices. Each shape is handled by its own [`HeadingSource`] and the
//! [`HeadingConverter`] picks one per sample.

use nalgebra::{RealField, Rotation3, Vector3};

use crate::math::{DEG_TO_RAD, FULL_TURN, RAD_TO_DEG, normalize_degrees};
use crate::types::{AlphaConvention, AlphaMode, HeadingSettings, OrientationSample, ScreenRotation};

/// Smallest squared horizontal length treated as a usable pointing direction
const MIN_HORIZONTAL_SQUARED: f32 = 1e-6;

/// Strategy turning one sample shape into a heading
pub trait HeadingSource {
    /// Heading in degrees `[0, 360)`, clockwise from north, or `None` when the
    /// sample lacks the fields this source needs
    fn heading(&self, sample: &OrientationSample, screen_rotation: ScreenRotation) -> Option<f32>;
}

/// Platform-native compass heading
///
/// The platform already reports clockwise from north and compensates for the
/// screen, so the value passes through untouched apart from wrapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeCompassSource;

impl HeadingSource for NativeCompassSource {
    fn heading(&self, sample: &OrientationSample, _screen_rotation: ScreenRotation) -> Option<f32> {
        finite(sample.compass_heading).map(normalize_degrees)
    }
}

/// Alpha angle used directly as the heading
#[derive(Debug, Clone, Copy, Default)]
pub struct RawAlphaSource {
    pub convention: AlphaConvention,
}

impl HeadingSource for RawAlphaSource {
    fn heading(&self, sample: &OrientationSample, screen_rotation: ScreenRotation) -> Option<f32> {
        let alpha = finite(sample.alpha)?;
        Some(compensate_screen(self.convention.to_heading(alpha), screen_rotation))
    }
}

/// Alpha corrected for device tilt using beta and gamma
///
/// Reports the bearing of whichever device axis points most nearly along the
/// ground: the top edge while the device lies flat, the rear-facing axis while
/// it is held upright. A flat device gives the same heading as
/// [`RawAlphaSource`]. Samples without tilt angles fall back to raw alpha.
#[derive(Debug, Clone, Copy, Default)]
pub struct TiltCompensatedSource {
    pub convention: AlphaConvention,
}

impl HeadingSource for TiltCompensatedSource {
    fn heading(&self, sample: &OrientationSample, screen_rotation: ScreenRotation) -> Option<f32> {
        let alpha = finite(sample.alpha)?;

        let compensated_alpha = match (finite(sample.beta), finite(sample.gamma)) {
            (Some(beta), Some(gamma)) => tilt_compensated_alpha(alpha, beta, gamma).unwrap_or(alpha),
            _ => alpha,
        };

        Some(compensate_screen(self.convention.to_heading(compensated_alpha), screen_rotation))
    }
}

/// Pure sample-to-heading conversion
///
/// # Example
/// ```
/// use compass_heading::{HeadingConverter, OrientationSample, ScreenRotation};
///
/// let converter = HeadingConverter::default();
///
/// let sample = OrientationSample::from_alpha(90.0, true);
/// assert_eq!(converter.convert(&sample, ScreenRotation::Natural), Some(90.0));
/// assert_eq!(converter.convert(&sample, ScreenRotation::Quarter), Some(0.0));
///
/// let empty = OrientationSample::default();
/// assert_eq!(converter.convert(&empty, ScreenRotation::Natural), None);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingConverter {
    native: NativeCompassSource,
    raw_alpha: RawAlphaSource,
    tilt_compensated: TiltCompensatedSource,
    alpha_mode: AlphaMode,
}

impl HeadingConverter {
    /// Converter using the alpha convention and mode from `settings`
    pub fn new(settings: &HeadingSettings) -> Self {
        Self {
            native: NativeCompassSource,
            raw_alpha: RawAlphaSource {
                convention: settings.alpha_convention,
            },
            tilt_compensated: TiltCompensatedSource {
                convention: settings.alpha_convention,
            },
            alpha_mode: settings.alpha_mode,
        }
    }

    /// Source able to handle this sample's shape
    ///
    /// A native compass heading takes priority over alpha.
    pub fn source_for(&self, sample: &OrientationSample) -> Option<&dyn HeadingSource> {
        if finite(sample.compass_heading).is_some() {
            return Some(&self.native);
        }

        finite(sample.alpha)?;
        let source: &dyn HeadingSource = match self.alpha_mode {
            AlphaMode::Raw => &self.raw_alpha,
            AlphaMode::TiltCompensated => &self.tilt_compensated,
        };
        Some(source)
    }

    /// Heading in degrees `[0, 360)`, or `None` when the sample has no usable data
    pub fn convert(&self, sample: &OrientationSample, screen_rotation: ScreenRotation) -> Option<f32> {
        self.source_for(sample)?.heading(sample, screen_rotation)
    }
}

/// Remove the display rotation from a device-frame heading
fn compensate_screen(heading: f32, screen_rotation: ScreenRotation) -> f32 {
    normalize_degrees(heading - screen_rotation.degrees())
}

fn finite(value: Option<f32>) -> Option<f32> {
    value.filter(|angle| angle.is_finite())
}

/// Alpha a level device would report while pointing where this one points
///
/// Builds the device attitude as `Rz(alpha) * Rx(beta) * Ry(gamma)` in an
/// east-north-up frame, takes the device axis with the longest horizontal
/// projection and returns its counter-clockwise angle from north.
fn tilt_compensated_alpha(alpha: f32, beta: f32, gamma: f32) -> Option<f32> {
    let attitude = Rotation3::from_axis_angle(&Vector3::z_axis(), alpha * DEG_TO_RAD)
        * Rotation3::from_axis_angle(&Vector3::x_axis(), beta * DEG_TO_RAD)
        * Rotation3::from_axis_angle(&Vector3::y_axis(), gamma * DEG_TO_RAD);

    let top_edge = attitude * Vector3::y();
    let rear_axis = -(attitude * Vector3::z());

    let top_horizontal = horizontal_squared(&top_edge);
    let rear_horizontal = horizontal_squared(&rear_axis);

    let (pointing, horizontal) = if rear_horizontal > top_horizontal {
        (rear_axis, rear_horizontal)
    } else {
        (top_edge, top_horizontal)
    };

    if horizontal < MIN_HORIZONTAL_SQUARED {
        return None;
    }

    // Clockwise bearing: east component over north component
    let bearing = normalize_degrees(pointing.x.atan2(pointing.y) * RAD_TO_DEG);
    Some(normalize_degrees(FULL_TURN - bearing))
}

fn horizontal_squared(vector: &Vector3<f32>) -> f32 {
    vector.x * vector.x + vector.y * vector.y
}
