//! Stateful heading estimation: source locking, throttling, smoothing and calibration

use core::time::Duration;

use log::{debug, info, trace, warn};

use crate::compass::HeadingConverter;
use crate::math::smooth_angle;
use crate::offset::CalibrationOffset;
use crate::types::{
    CardinalDirection, HeadingSettings, OrientationSample, SampleOutcome, ScreenRotation,
    SourceLock,
};

/// Heading estimator
///
/// Consumes converted samples one at a time and maintains a smoothed,
/// calibrated heading. Samples are only processed between [`start`] and
/// [`stop`]. The calibration offset survives restarts; everything else is
/// reset on [`start`].
///
/// [`start`]: HeadingEstimator::start
/// [`stop`]: HeadingEstimator::stop
///
/// # Example
/// ```
/// use core::time::Duration;
/// use compass_heading::{HeadingEstimator, OrientationSample, ScreenRotation};
///
/// let mut estimator = HeadingEstimator::new();
/// estimator.start();
///
/// let sample = OrientationSample::from_alpha(90.0, true);
/// estimator.on_sample(&sample, ScreenRotation::Natural, Duration::from_millis(0));
///
/// // One step of the default 0.15 smoothing factor from north toward east
/// assert!((estimator.heading() - 13.5).abs() < 1e-3);
/// ```
#[derive(Debug, Clone)]
pub struct HeadingEstimator {
    /// Estimator settings after sanitizing
    settings: HeadingSettings,
    /// Sample-to-heading conversion built from the settings
    converter: HeadingConverter,
    /// Smoothed, calibrated heading in `[0, 360)`
    smoothed_heading: f32,
    /// Event kind currently trusted
    source_lock: SourceLock,
    /// User calibration, kept across restarts
    calibration: CalibrationOffset,
    /// Arrival time of the last applied sample
    last_update: Option<Duration>,
    /// Whether samples are being processed
    active: bool,
}

impl HeadingEstimator {
    /// Create a stopped estimator with default settings
    pub fn new() -> Self {
        Self::with_settings(HeadingSettings::default())
    }

    /// Create a stopped estimator with the given settings
    ///
    /// Invalid values are replaced by their defaults; use
    /// [`HeadingSettings::validate`] beforehand to reject them instead.
    pub fn with_settings(settings: HeadingSettings) -> Self {
        let mut estimator = HeadingEstimator {
            settings,
            converter: HeadingConverter::default(),
            smoothed_heading: 0.0,
            source_lock: SourceLock::Unset,
            calibration: CalibrationOffset::default(),
            last_update: None,
            active: false,
        };

        estimator.process_settings();
        estimator
    }

    /// Replace the settings without touching the current heading
    pub fn set_settings(&mut self, settings: HeadingSettings) {
        self.settings = settings;
        self.process_settings();
    }

    /// Current settings
    pub fn settings(&self) -> HeadingSettings {
        self.settings
    }

    /// Sanitize settings and rebuild the converter
    fn process_settings(&mut self) {
        if let Err(err) = self.settings.validate() {
            warn!(
                "{}; using default of {}",
                err,
                HeadingSettings::DEFAULT_SMOOTHING_FACTOR
            );
            self.settings.smoothing_factor = HeadingSettings::DEFAULT_SMOOTHING_FACTOR;
        }

        self.converter = HeadingConverter::new(&self.settings);
    }

    /// Begin processing samples
    ///
    /// Resets the heading to north, clears the source lock and the throttle
    /// window. The calibration offset is kept.
    pub fn start(&mut self) {
        self.smoothed_heading = 0.0;
        self.source_lock = SourceLock::Unset;
        self.last_update = None;
        self.active = true;

        info!(
            "heading estimation started (calibration offset {:.1}°)",
            self.calibration.degrees()
        );
    }

    /// Stop processing samples
    ///
    /// Safe to call at any time and any number of times. Samples that arrive
    /// afterwards are ignored.
    pub fn stop(&mut self) {
        if self.active {
            info!("heading estimation stopped");
        }

        self.active = false;
        self.source_lock = SourceLock::Unset;
    }

    /// Whether samples are being processed
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Feed one orientation sample
    ///
    /// 1. Ignore the sample while stopped
    /// 2. Reject relative samples once locked to absolute ones, otherwise
    ///    accept the sample and move the source lock
    /// 3. Drop samples arriving within the throttle interval of the last applied one
    /// 4. Convert to a heading, dropping samples with no usable data
    /// 5. Apply the calibration offset and smooth toward the result
    ///
    /// The lock moves on acceptance, so an absolute sample upgrades the lock
    /// even when it is throttled or carries no usable data.
    ///
    /// # Arguments
    /// * `sample` - Raw orientation reading
    /// * `screen_rotation` - Display rotation at the time of the reading
    /// * `now` - Arrival time on a monotonic clock
    pub fn on_sample(
        &mut self,
        sample: &OrientationSample,
        screen_rotation: ScreenRotation,
        now: Duration,
    ) -> SampleOutcome {
        if !self.active {
            return SampleOutcome::Inactive;
        }

        let kind = sample.kind();
        if !self.source_lock.admits(kind) {
            trace!("rejecting {:?} sample while locked to {:?}", kind, self.source_lock);
            return SampleOutcome::Rejected;
        }

        let lock = self.source_lock.after(kind);
        if lock != self.source_lock {
            debug!("source lock {:?} -> {:?}", self.source_lock, lock);
            self.source_lock = lock;
        }

        if let Some(last_update) = self.last_update {
            if now.saturating_sub(last_update) < self.settings.throttle_interval {
                trace!("throttling sample at {:?}", now);
                return SampleOutcome::Throttled;
            }
        }

        let Some(converted) = self.converter.convert(sample, screen_rotation) else {
            debug!("discarding sample without usable heading: {:?}", sample);
            return SampleOutcome::Unavailable;
        };

        let calibrated = self.calibration.apply(converted);
        self.smoothed_heading =
            smooth_angle(self.smoothed_heading, calibrated, self.settings.smoothing_factor);
        self.last_update = Some(now);

        SampleOutcome::Applied(self.smoothed_heading)
    }

    /// Smoothed, calibrated heading in degrees `[0, 360)`
    pub fn heading(&self) -> f32 {
        self.smoothed_heading
    }

    /// Compass point nearest to the current heading
    pub fn cardinal_direction(&self) -> CardinalDirection {
        CardinalDirection::from_heading(self.smoothed_heading)
    }

    /// Event kind currently trusted
    pub fn source_lock(&self) -> SourceLock {
        self.source_lock
    }

    /// Arrival time of the last applied sample since the last start
    pub fn last_update(&self) -> Option<Duration> {
        self.last_update
    }

    /// Calibration offset in degrees `[0, 360)`
    pub fn calibration_offset(&self) -> f32 {
        self.calibration.degrees()
    }

    /// Calibration state, e.g. for persisting it
    pub fn calibration(&self) -> CalibrationOffset {
        self.calibration
    }

    /// Replace the calibration offset
    pub fn set_calibration_offset(&mut self, degrees: f32) {
        let previous = self.calibration;
        self.calibration.set(degrees);
        self.rebase(previous);
    }

    /// Nudge the calibration offset by `delta` degrees
    pub fn adjust_calibration(&mut self, delta: f32) {
        let previous = self.calibration;
        self.calibration.adjust(delta);
        self.rebase(previous);
    }

    /// Make the direction the device currently points read as north
    ///
    /// # Returns
    /// The new calibration offset in degrees
    pub fn calibrate_to_current_as_north(&mut self) -> f32 {
        let previous = self.calibration;
        let offset = self.calibration.calibrate_to_north(self.smoothed_heading);
        self.rebase(previous);
        offset
    }

    /// Shift the smoothed heading from the `previous` offset to the current one
    fn rebase(&mut self, previous: CalibrationOffset) {
        if previous == self.calibration {
            return;
        }

        let raw = previous.remove(self.smoothed_heading);
        self.smoothed_heading = self.calibration.apply(raw);

        info!(
            "calibration offset {:.1}° -> {:.1}°",
            previous.degrees(),
            self.calibration.degrees()
        );
    }
}

impl Default for HeadingEstimator {
    fn default() -> Self {
        Self::new()
    }
}
