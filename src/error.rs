//! Error types for compass heading estimation
//!
//! Sample processing never fails; malformed samples degrade to
//! [`SampleOutcome::Unavailable`](crate::SampleOutcome::Unavailable). These
//! errors cover configuration and enabling rotation mode.

use thiserror::Error;

/// Invalid heading settings
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SettingsError {
    /// Smoothing factor outside `(0, 1]` or not finite
    #[error("smoothing factor must be in (0, 1], got {0}")]
    SmoothingFactor(f32),
}

/// Reasons rotation mode could not be enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ModeError {
    /// The platform has no orientation sensor support
    #[error("orientation sensors are not supported on this device")]
    Unsupported,
    /// The user declined access to orientation sensors
    #[error("permission to read orientation sensors was denied")]
    PermissionDenied,
}
