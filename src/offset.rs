//! User calibration offset for compass headings

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::math::{FULL_TURN, normalize_degrees};

/// Constant correction added to every raw heading
///
/// Corrects systematic sensor bias. The stored value is always wrapped into
/// `[0, 360)` and non-finite inputs leave it unchanged. With the `serde`
/// feature it serializes as a plain number so hosts can persist it.
///
/// # Example
/// ```
/// use compass_heading::CalibrationOffset;
///
/// let mut offset = CalibrationOffset::default();
/// offset.adjust(-10.0);
/// assert_eq!(offset.degrees(), 350.0);
/// assert_eq!(offset.apply(15.0), 5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "f32", into = "f32"))]
pub struct CalibrationOffset {
    degrees: f32,
}

impl CalibrationOffset {
    /// Offset of `degrees`, wrapped into `[0, 360)`
    pub fn new(degrees: f32) -> Self {
        Self {
            degrees: normalize_degrees(degrees),
        }
    }

    /// Current offset in degrees
    pub fn degrees(&self) -> f32 {
        self.degrees
    }

    /// Replace the offset
    pub fn set(&mut self, degrees: f32) {
        if !degrees.is_finite() {
            log::debug!("ignoring non-finite calibration offset {}", degrees);
            return;
        }
        self.degrees = normalize_degrees(degrees);
    }

    /// Nudge the offset by `delta` degrees
    pub fn adjust(&mut self, delta: f32) {
        if !delta.is_finite() {
            log::debug!("ignoring non-finite calibration adjustment {}", delta);
            return;
        }
        self.degrees = normalize_degrees(self.degrees + delta);
    }

    /// Choose the offset that makes the current direction read as north
    ///
    /// `calibrated_heading` is the heading as currently displayed, i.e. with
    /// this offset already applied. The offset is stripped first so the old
    /// correction is not counted twice.
    ///
    /// # Returns
    /// The new offset in degrees
    pub fn calibrate_to_north(&mut self, calibrated_heading: f32) -> f32 {
        if !calibrated_heading.is_finite() {
            log::debug!("ignoring calibration against non-finite heading");
            return self.degrees;
        }

        let raw = self.remove(calibrated_heading);
        self.degrees = normalize_degrees(FULL_TURN - raw);
        self.degrees
    }

    /// Raw heading with the offset added
    pub fn apply(&self, raw_heading: f32) -> f32 {
        normalize_degrees(raw_heading + self.degrees)
    }

    /// Calibrated heading with the offset taken back out
    pub fn remove(&self, calibrated_heading: f32) -> f32 {
        normalize_degrees(calibrated_heading - self.degrees)
    }

    /// Clear the offset
    pub fn reset(&mut self) {
        self.degrees = 0.0;
    }
}

impl From<f32> for CalibrationOffset {
    fn from(degrees: f32) -> Self {
        Self::new(degrees)
    }
}

impl From<CalibrationOffset> for f32 {
    fn from(offset: CalibrationOffset) -> Self {
        offset.degrees
    }
}
