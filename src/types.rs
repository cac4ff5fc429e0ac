//! Core types and conventions for compass heading estimation

use core::fmt;
use core::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::math::{FULL_TURN, normalize_degrees};

/// One raw orientation reading from the sensor feed
///
/// Every field is optional because platforms deliver events with some or all
/// angles missing. A sample with neither a native compass heading nor an alpha
/// angle carries no usable heading.
///
/// # Example
/// ```
/// use compass_heading::{OrientationSample, SourceKind};
///
/// let sample = OrientationSample::from_alpha(90.0, true).with_tilt(10.0, -5.0);
/// assert_eq!(sample.kind(), SourceKind::Absolute);
/// assert_eq!(sample.beta, Some(10.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrientationSample {
    /// Platform-native heading, already clockwise from north
    pub compass_heading: Option<f32>,
    /// Rotation about the device Z axis in degrees
    pub alpha: Option<f32>,
    /// Rotation about the device X axis (front-back tilt) in degrees
    pub beta: Option<f32>,
    /// Rotation about the device Y axis (left-right tilt) in degrees
    pub gamma: Option<f32>,
    /// Whether the event was delivered as an absolute (north-referenced) event
    pub absolute: bool,
}

impl OrientationSample {
    /// Sample carrying only an alpha angle
    pub fn from_alpha(alpha: f32, absolute: bool) -> Self {
        Self {
            alpha: Some(alpha),
            absolute,
            ..Default::default()
        }
    }

    /// Sample carrying a platform-native compass heading
    ///
    /// Native headings arrive on the plain (non-absolute) orientation event.
    pub fn from_compass_heading(heading: f32) -> Self {
        Self {
            compass_heading: Some(heading),
            ..Default::default()
        }
    }

    /// Attach front-back and left-right tilt angles
    pub fn with_tilt(mut self, beta: f32, gamma: f32) -> Self {
        self.beta = Some(beta);
        self.gamma = Some(gamma);
        self
    }

    /// Event kind used for source locking
    pub fn kind(&self) -> SourceKind {
        if self.absolute {
            SourceKind::Absolute
        } else {
            SourceKind::Relative
        }
    }
}

/// Kind of orientation event a sample arrived on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SourceKind {
    /// Referenced to north
    Absolute,
    /// Referenced to an arbitrary baseline
    Relative,
}

/// Which event kind the estimator currently trusts
///
/// Both event kinds may fire for the same physical motion. Once a kind has
/// produced a heading, the estimator keeps to it (absolute always wins) so the
/// output does not flip between the two baselines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SourceLock {
    /// No sample accepted since the last start
    #[default]
    Unset,
    /// Locked to absolute samples; relative samples are rejected
    Absolute,
    /// Locked to relative samples until an absolute one arrives
    Relative,
}

impl SourceLock {
    /// Whether a sample of `kind` may update the heading under this lock
    pub fn admits(self, kind: SourceKind) -> bool {
        !matches!((self, kind), (SourceLock::Absolute, SourceKind::Relative))
    }

    /// Lock state after a sample of `kind` has been accepted
    pub fn after(self, kind: SourceKind) -> SourceLock {
        match (self, kind) {
            (SourceLock::Absolute, _) | (_, SourceKind::Absolute) => SourceLock::Absolute,
            (_, SourceKind::Relative) => SourceLock::Relative,
        }
    }
}

/// Display rotation relative to the device's natural orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScreenRotation {
    /// 0°
    #[default]
    Natural,
    /// 90°
    Quarter,
    /// 180°
    Half,
    /// 270°
    ThreeQuarter,
}

impl ScreenRotation {
    /// Snap an arbitrary angle to the nearest quarter turn
    ///
    /// Legacy orientation APIs report landscape as `-90`, which maps to 270°.
    ///
    /// # Example
    /// ```
    /// use compass_heading::ScreenRotation;
    ///
    /// assert_eq!(ScreenRotation::from_degrees(-90.0), ScreenRotation::ThreeQuarter);
    /// assert_eq!(ScreenRotation::from_degrees(90.0), ScreenRotation::Quarter);
    /// ```
    pub fn from_degrees(degrees: f32) -> Self {
        let quarter = ((normalize_degrees(degrees) + 45.0) / 90.0) as u32 % 4;
        match quarter {
            1 => ScreenRotation::Quarter,
            2 => ScreenRotation::Half,
            3 => ScreenRotation::ThreeQuarter,
            _ => ScreenRotation::Natural,
        }
    }

    /// Rotation in degrees
    pub fn degrees(self) -> f32 {
        match self {
            ScreenRotation::Natural => 0.0,
            ScreenRotation::Quarter => 90.0,
            ScreenRotation::Half => 180.0,
            ScreenRotation::ThreeQuarter => 270.0,
        }
    }
}

/// Direction in which the raw alpha angle grows as the device turns
///
/// Devices disagree on this, so it is a per-deployment setting.
///
/// - **Clockwise**: heading equals alpha (the empirically calibrated default)
/// - **CounterClockwise**: heading is `360 - alpha`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AlphaConvention {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl AlphaConvention {
    /// Map an angle measured in this convention to a clockwise heading
    pub fn to_heading(self, angle: f32) -> f32 {
        match self {
            AlphaConvention::Clockwise => normalize_degrees(angle),
            AlphaConvention::CounterClockwise => normalize_degrees(FULL_TURN - angle),
        }
    }
}

/// How alpha-only samples are turned into a heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AlphaMode {
    /// Use alpha as-is
    #[default]
    Raw,
    /// Use alpha, beta and gamma to compensate for device tilt
    TiltCompensated,
}

/// Heading estimator settings
///
/// # Example
/// ```
/// use core::time::Duration;
/// use compass_heading::{AlphaConvention, HeadingSettings};
///
/// let settings = HeadingSettings {
///     smoothing_factor: 0.3,                       // Faster response
///     throttle_interval: Duration::from_millis(100),
///     alpha_convention: AlphaConvention::CounterClockwise,
///     ..Default::default()
/// };
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeadingSettings {
    /// Fraction of the remaining arc covered per applied sample, in `(0, 1]`
    ///
    /// Smaller values give a steadier but slower needle.
    pub smoothing_factor: f32,
    /// Minimum time between two applied samples
    pub throttle_interval: Duration,
    /// Sign convention of the alpha angle on this device
    pub alpha_convention: AlphaConvention,
    /// Conversion strategy for alpha-only samples
    pub alpha_mode: AlphaMode,
}

impl HeadingSettings {
    pub const DEFAULT_SMOOTHING_FACTOR: f32 = 0.15;
    pub const DEFAULT_THROTTLE_INTERVAL: Duration = Duration::from_millis(50);

    /// Check that every value is usable as-is
    pub fn validate(&self) -> Result<(), SettingsError> {
        let factor = self.smoothing_factor;
        if !factor.is_finite() || factor <= 0.0 || factor > 1.0 {
            return Err(SettingsError::SmoothingFactor(factor));
        }
        Ok(())
    }
}

impl Default for HeadingSettings {
    fn default() -> Self {
        Self {
            smoothing_factor: Self::DEFAULT_SMOOTHING_FACTOR,
            throttle_interval: Self::DEFAULT_THROTTLE_INTERVAL,
            alpha_convention: AlphaConvention::default(),
            alpha_mode: AlphaMode::default(),
        }
    }
}

/// One of the eight compass points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CardinalDirection {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CardinalDirection {
    const ALL: [CardinalDirection; 8] = [
        CardinalDirection::N,
        CardinalDirection::NE,
        CardinalDirection::E,
        CardinalDirection::SE,
        CardinalDirection::S,
        CardinalDirection::SW,
        CardinalDirection::W,
        CardinalDirection::NW,
    ];

    /// Nearest compass point to a heading
    ///
    /// Each point covers a 45° sector centred on it, so north spans
    /// 337.5° to 22.5°.
    ///
    /// # Example
    /// ```
    /// use compass_heading::CardinalDirection;
    ///
    /// assert_eq!(CardinalDirection::from_heading(359.0), CardinalDirection::N);
    /// assert_eq!(CardinalDirection::from_heading(46.0), CardinalDirection::NE);
    /// ```
    pub fn from_heading(heading: f32) -> Self {
        // Adding half a sector then truncating rounds the non-negative index
        let index = (normalize_degrees(heading) / 45.0 + 0.5) as usize % Self::ALL.len();
        Self::ALL[index]
    }

    /// Short label such as `"NE"`
    pub fn label(self) -> &'static str {
        match self {
            CardinalDirection::N => "N",
            CardinalDirection::NE => "NE",
            CardinalDirection::E => "E",
            CardinalDirection::SE => "SE",
            CardinalDirection::S => "S",
            CardinalDirection::SW => "SW",
            CardinalDirection::W => "W",
            CardinalDirection::NW => "NW",
        }
    }
}

impl fmt::Display for CardinalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of feeding one sample to the estimator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleOutcome {
    /// Heading updated; carries the new smoothed heading
    Applied(f32),
    /// Relative sample while locked to absolute
    Rejected,
    /// Arrived inside the throttle interval
    Throttled,
    /// Sample had no usable heading data
    Unavailable,
    /// Estimator is stopped
    Inactive,
}

impl SampleOutcome {
    /// New heading if the sample was applied
    pub fn heading(self) -> Option<f32> {
        match self {
            SampleOutcome::Applied(heading) => Some(heading),
            _ => None,
        }
    }
}
