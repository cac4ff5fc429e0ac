//! Compass rotation mode: the heading estimator wired to its collaborators

use core::time::Duration;

use log::{info, warn};

use crate::collaborators::{
    MapRenderer, NeedleRenderer, Notifier, Permission, ScreenOrientation, SensorFeed, Status,
};
use crate::error::ModeError;
use crate::estimator::HeadingEstimator;
use crate::math::{FULL_TURN, normalize_degrees};
use crate::types::{CardinalDirection, OrientationSample, SampleOutcome, SourceLock};

/// Map rotation driven by the device compass
///
/// Owns a [`HeadingEstimator`] and the host collaborators. Each applied sample
/// turns the map to the new heading and counter-rotates the needle so it keeps
/// pointing north. Renderer failures are logged and never stop estimation.
pub struct RotationMode<F, S, M, N, T> {
    estimator: HeadingEstimator,
    feed: F,
    screen: S,
    map: M,
    needle: N,
    notifier: T,
}

impl<F, S, M, N, T> RotationMode<F, S, M, N, T>
where
    F: SensorFeed,
    S: ScreenOrientation,
    M: MapRenderer,
    N: NeedleRenderer,
    T: Notifier,
{
    /// Rotation mode with a default estimator, initially disabled
    pub fn new(feed: F, screen: S, map: M, needle: N, notifier: T) -> Self {
        Self::with_estimator(HeadingEstimator::new(), feed, screen, map, needle, notifier)
    }

    /// Rotation mode around an existing estimator
    ///
    /// The estimator is stopped; its settings and calibration are kept.
    pub fn with_estimator(
        mut estimator: HeadingEstimator,
        feed: F,
        screen: S,
        map: M,
        needle: N,
        notifier: T,
    ) -> Self {
        estimator.stop();
        Self {
            estimator,
            feed,
            screen,
            map,
            needle,
            notifier,
        }
    }

    /// Whether the platform can deliver orientation samples
    pub fn is_supported(&self) -> bool {
        self.feed.is_supported()
    }

    /// Whether the map is following the compass
    pub fn is_active(&self) -> bool {
        self.estimator.is_active()
    }

    /// Start following the compass
    ///
    /// Checks sensor support and asks for permission first. Enabling an
    /// already active mode does nothing.
    pub async fn enable(&mut self) -> Result<(), ModeError> {
        if self.estimator.is_active() {
            return Ok(());
        }

        if !self.feed.is_supported() {
            warn!("orientation sensors not supported");
            self.notifier.notify(Status::Unsupported);
            return Err(ModeError::Unsupported);
        }

        if self.feed.request_permission().await == Permission::Denied {
            warn!("orientation sensor permission denied");
            self.notifier.notify(Status::PermissionDenied);
            return Err(ModeError::PermissionDenied);
        }

        self.estimator.start();
        self.notifier.notify(Status::Enabled);
        Ok(())
    }

    /// Stop following the compass and return the map to north-up
    ///
    /// Disabling an inactive mode does nothing.
    pub fn disable(&mut self) {
        if !self.estimator.is_active() {
            return;
        }

        self.estimator.stop();

        if let Err(err) = self.map.reset_rotation() {
            warn!("failed to reset map rotation: {}", err);
        }
        self.render_needle(0.0);

        self.notifier.notify(Status::Disabled);
    }

    /// Flip between enabled and disabled
    ///
    /// # Returns
    /// Whether the mode is active afterwards
    pub async fn toggle(&mut self) -> Result<bool, ModeError> {
        if self.estimator.is_active() {
            self.disable();
        } else {
            self.enable().await?;
        }
        Ok(self.estimator.is_active())
    }

    /// Feed one sample from the sensor feed
    ///
    /// Reads the current screen rotation, runs the estimator and redraws when
    /// the heading changed.
    pub fn on_sample(&mut self, sample: &OrientationSample, now: Duration) -> SampleOutcome {
        let screen_rotation = self.screen.rotation();
        let outcome = self.estimator.on_sample(sample, screen_rotation, now);

        if let SampleOutcome::Applied(heading) = outcome {
            self.render(heading);
        }

        outcome
    }

    /// Make the current direction read as north
    ///
    /// # Returns
    /// The new calibration offset in degrees
    pub fn calibrate_to_north(&mut self) -> f32 {
        let offset = self.estimator.calibrate_to_current_as_north();
        self.after_calibration();
        offset
    }

    /// Nudge the calibration offset by `delta` degrees
    pub fn adjust_calibration(&mut self, delta: f32) {
        self.estimator.adjust_calibration(delta);
        self.after_calibration();
    }

    /// Replace the calibration offset
    pub fn set_calibration_offset(&mut self, degrees: f32) {
        self.estimator.set_calibration_offset(degrees);
        self.after_calibration();
    }

    fn after_calibration(&mut self) {
        let offset = self.estimator.calibration_offset();
        info!("calibration offset now {:.1}°", offset);
        self.notifier.notify(Status::Calibrated { offset });

        if self.estimator.is_active() {
            self.render(self.estimator.heading());
        }
    }

    fn render(&mut self, heading: f32) {
        if let Err(err) = self.map.set_rotation(heading) {
            warn!("failed to rotate map to {:.1}°: {}", heading, err);
        }
        self.render_needle(normalize_degrees(FULL_TURN - heading));
    }

    fn render_needle(&mut self, angle: f32) {
        if let Err(err) = self.needle.set_angle(angle) {
            warn!("failed to rotate needle to {:.1}°: {}", angle, err);
        }
    }

    /// Smoothed, calibrated heading in degrees
    pub fn heading(&self) -> f32 {
        self.estimator.heading()
    }

    /// Compass point nearest to the heading
    pub fn cardinal_direction(&self) -> CardinalDirection {
        self.estimator.cardinal_direction()
    }

    /// Event kind the estimator currently trusts
    pub fn source_lock(&self) -> SourceLock {
        self.estimator.source_lock()
    }

    /// Underlying estimator
    pub fn estimator(&self) -> &HeadingEstimator {
        &self.estimator
    }

    /// Map renderer
    pub fn map(&self) -> &M {
        &self.map
    }

    /// Needle renderer
    pub fn needle(&self) -> &N {
        &self.needle
    }

    /// Status notifier
    pub fn notifier(&self) -> &T {
        &self.notifier
    }
}
