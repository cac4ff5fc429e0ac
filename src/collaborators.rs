//! Interfaces to the platform around the heading estimator
//!
//! The estimator knows nothing about sensors, screens or rendering. A host
//! implements these traits and hands them to [`RotationMode`](crate::RotationMode).

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::ScreenRotation;

/// Outcome of asking the user for sensor access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Permission {
    Granted,
    Denied,
}

/// Source of orientation samples
///
/// Samples themselves are pushed by the host through
/// [`RotationMode::on_sample`](crate::RotationMode::on_sample); this trait only
/// covers the capability and permission checks made when rotation is enabled.
#[allow(async_fn_in_trait)]
pub trait SensorFeed {
    /// Whether the platform can deliver orientation samples at all
    fn is_supported(&self) -> bool;

    /// Ask for access to orientation samples
    ///
    /// Platforms without a permission prompt keep the default, which grants
    /// immediately.
    async fn request_permission(&mut self) -> Permission {
        Permission::Granted
    }
}

/// Current display rotation
pub trait ScreenOrientation {
    fn rotation(&self) -> ScreenRotation;
}

/// Map view that can be turned to follow the heading
pub trait MapRenderer {
    type Error: fmt::Display;

    /// Turn the map so `bearing` (degrees clockwise from north) points up
    fn set_rotation(&mut self, bearing: f32) -> Result<(), Self::Error>;

    /// Return the map to north-up
    fn reset_rotation(&mut self) -> Result<(), Self::Error>;
}

/// Needle or arrow indicating north
pub trait NeedleRenderer {
    type Error: fmt::Display;

    /// Rotate the needle to `angle` degrees clockwise on screen
    fn set_angle(&mut self, angle: f32) -> Result<(), Self::Error>;
}

/// Receiver of user-facing status messages
pub trait Notifier {
    fn notify(&mut self, status: Status);
}

/// User-facing status change
///
/// `Display` renders the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Status {
    /// Map rotation follows the compass
    Enabled,
    /// Map rotation returned to north-up
    Disabled,
    /// Calibration offset changed
    Calibrated {
        /// New offset in degrees
        offset: f32,
    },
    /// No orientation sensors available
    Unsupported,
    /// Access to orientation sensors declined
    PermissionDenied,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Enabled => f.write_str("Compass rotation enabled"),
            Status::Disabled => f.write_str("Compass rotation disabled"),
            Status::Calibrated { offset } => {
                write!(f, "Compass calibrated (offset {:.0}°)", offset)
            }
            Status::Unsupported => f.write_str("Compass not supported on this device"),
            Status::PermissionDenied => f.write_str("Compass permission denied"),
        }
    }
}
