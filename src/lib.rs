#![no_std]

//! Compass Heading - stable, calibrated compass headings from device orientation samples
//!
//! Device orientation sensors are noisy and platforms disagree on how they
//! report direction. This library turns a stream of raw orientation samples
//! into a single smoothed heading suitable for rotating a map display and a
//! north-pointing needle.
//!
//! # Features
//!
//! - Per-sample conversion for native compass headings and raw alpha angles,
//!   with screen rotation compensation
//! - Configurable alpha sign convention and optional tilt compensation
//! - Source locking so absolute and relative events never fight each other
//! - Circular smoothing that takes the short way across north
//! - Persistent calibration offset, including "current direction is north"
//! - Throttled, allocation-free updates; `#![no_std]` compatible
//!
//! # Quick Start
//!
//! ```rust
//! use core::time::Duration;
//! use compass_heading::{HeadingEstimator, OrientationSample, ScreenRotation};
//!
//! let mut estimator = HeadingEstimator::new();
//! estimator.start();
//!
//! // Absolute orientation event, device pointing east
//! let sample = OrientationSample::from_alpha(90.0, true);
//!
//! for step in 0..40u64 {
//!     let now = Duration::from_millis(step * 50);
//!     estimator.on_sample(&sample, ScreenRotation::Natural, now);
//! }
//!
//! assert!((estimator.heading() - 90.0).abs() < 1.0);
//! assert_eq!(estimator.cardinal_direction().label(), "E");
//! ```
//!
//! To drive a map and needle directly, implement the traits in
//! [`collaborators`] and use [`RotationMode`].

pub mod collaborators;
pub mod compass;
mod error;
mod estimator;
mod math;
mod mode;
pub mod offset;
mod types;

// Re-export all public types and functions
pub use collaborators::{
    MapRenderer, NeedleRenderer, Notifier, Permission, ScreenOrientation, SensorFeed, Status,
};
pub use compass::{
    HeadingConverter, HeadingSource, NativeCompassSource, RawAlphaSource, TiltCompensatedSource,
};
pub use error::{ModeError, SettingsError};
pub use estimator::HeadingEstimator;
pub use math::{
    DEG_TO_RAD, FULL_TURN, RAD_TO_DEG, normalize_degrees, shortest_difference, smooth_angle,
};
pub use mode::RotationMode;
pub use offset::CalibrationOffset;
pub use types::*;
