use compass_heading::{
    MapRenderer, ModeError, NeedleRenderer, Notifier, OrientationSample, Permission,
    RotationMode, SampleOutcome, ScreenOrientation, ScreenRotation, SensorFeed, SourceLock,
    Status,
};
use futures::executor::block_on;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

const EPSILON: f32 = 1e-3;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

struct MockFeed {
    supported: bool,
    permission: Permission,
    permission_requests: Rc<Cell<usize>>,
}

impl SensorFeed for MockFeed {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn request_permission(&mut self) -> Permission {
        self.permission_requests.set(self.permission_requests.get() + 1);
        self.permission
    }
}

/// Feed on a platform without a permission prompt
struct PromptlessFeed;

impl SensorFeed for PromptlessFeed {
    fn is_supported(&self) -> bool {
        true
    }
}

struct MockScreen {
    rotation: Rc<Cell<ScreenRotation>>,
}

impl ScreenOrientation for MockScreen {
    fn rotation(&self) -> ScreenRotation {
        self.rotation.get()
    }
}

#[derive(Default)]
struct MockMap {
    rotations: Vec<f32>,
    resets: usize,
    failing: bool,
}

impl MapRenderer for MockMap {
    type Error = &'static str;

    fn set_rotation(&mut self, bearing: f32) -> Result<(), Self::Error> {
        if self.failing {
            return Err("map not ready");
        }
        self.rotations.push(bearing);
        Ok(())
    }

    fn reset_rotation(&mut self) -> Result<(), Self::Error> {
        if self.failing {
            return Err("map not ready");
        }
        self.resets += 1;
        Ok(())
    }
}

#[derive(Default)]
struct MockNeedle {
    angles: Vec<f32>,
    failing: bool,
}

impl NeedleRenderer for MockNeedle {
    type Error = String;

    fn set_angle(&mut self, angle: f32) -> Result<(), Self::Error> {
        if self.failing {
            return Err(format!("needle element missing at {}", angle));
        }
        self.angles.push(angle);
        Ok(())
    }
}

#[derive(Default)]
struct MockNotifier {
    statuses: Vec<Status>,
    messages: Vec<String>,
}

impl Notifier for MockNotifier {
    fn notify(&mut self, status: Status) {
        self.messages.push(status.to_string());
        self.statuses.push(status);
    }
}

type TestMode = RotationMode<MockFeed, MockScreen, MockMap, MockNeedle, MockNotifier>;

struct Harness {
    mode: TestMode,
    rotation: Rc<Cell<ScreenRotation>>,
    permission_requests: Rc<Cell<usize>>,
}

fn harness(supported: bool, permission: Permission, map: MockMap, needle: MockNeedle) -> Harness {
    init_logging();

    let rotation = Rc::new(Cell::new(ScreenRotation::Natural));
    let permission_requests = Rc::new(Cell::new(0));

    let feed = MockFeed {
        supported,
        permission,
        permission_requests: Rc::clone(&permission_requests),
    };
    let screen = MockScreen {
        rotation: Rc::clone(&rotation),
    };

    Harness {
        mode: RotationMode::new(feed, screen, map, needle, MockNotifier::default()),
        rotation,
        permission_requests,
    }
}

fn working() -> Harness {
    harness(
        true,
        Permission::Granted,
        MockMap::default(),
        MockNeedle::default(),
    )
}

/// Enabling starts estimation and announces it
#[test]
fn test_enable_starts_estimation() {
    let mut h = working();
    assert!(!h.mode.is_active());
    assert!(h.mode.is_supported());

    block_on(h.mode.enable()).unwrap();

    assert!(h.mode.is_active());
    assert_eq!(h.permission_requests.get(), 1);
    assert_eq!(h.mode.notifier().statuses, vec![Status::Enabled]);
    assert_eq!(h.mode.notifier().messages, vec!["Compass rotation enabled"]);
    assert_eq!(h.mode.source_lock(), SourceLock::Unset);
}

/// Enabling twice asks for permission once
#[test]
fn test_enable_is_idempotent() {
    let mut h = working();
    block_on(h.mode.enable()).unwrap();
    block_on(h.mode.enable()).unwrap();

    assert_eq!(h.permission_requests.get(), 1);
    assert_eq!(h.mode.notifier().statuses.len(), 1);
}

/// Missing sensor support is reported without starting
#[test]
fn test_enable_unsupported() {
    let mut h = harness(
        false,
        Permission::Granted,
        MockMap::default(),
        MockNeedle::default(),
    );
    assert!(!h.mode.is_supported());

    let result = block_on(h.mode.enable());
    assert_eq!(result, Err(ModeError::Unsupported));
    assert!(!h.mode.is_active());
    assert_eq!(h.permission_requests.get(), 0);
    assert_eq!(h.mode.notifier().statuses, vec![Status::Unsupported]);

    // Samples are ignored
    let outcome = h
        .mode
        .on_sample(&OrientationSample::from_alpha(90.0, true), ms(0));
    assert_eq!(outcome, SampleOutcome::Inactive);
    assert!(h.mode.map().rotations.is_empty());
}

/// Permission denial is reported without starting
#[test]
fn test_enable_permission_denied() {
    let mut h = harness(
        true,
        Permission::Denied,
        MockMap::default(),
        MockNeedle::default(),
    );

    let result = block_on(h.mode.enable());
    assert_eq!(result, Err(ModeError::PermissionDenied));
    assert!(!h.mode.is_active());
    assert_eq!(h.mode.notifier().statuses, vec![Status::PermissionDenied]);
    assert_eq!(h.mode.notifier().messages, vec!["Compass permission denied"]);
}

/// Platforms without a prompt are granted by default
#[test]
fn test_promptless_feed_enables() {
    init_logging();
    let screen = MockScreen {
        rotation: Rc::new(Cell::new(ScreenRotation::Natural)),
    };
    let mut mode = RotationMode::new(
        PromptlessFeed,
        screen,
        MockMap::default(),
        MockNeedle::default(),
        MockNotifier::default(),
    );

    block_on(mode.enable()).unwrap();
    assert!(mode.is_active());
}

/// Applied samples rotate the map and counter-rotate the needle
#[test]
fn test_samples_drive_renderers() {
    let mut h = working();
    block_on(h.mode.enable()).unwrap();

    let sample = OrientationSample::from_alpha(90.0, true);
    let outcome = h.mode.on_sample(&sample, ms(0));
    let heading = outcome.heading().unwrap();
    assert!((heading - 13.5).abs() < EPSILON);

    assert_eq!(h.mode.map().rotations.len(), 1);
    assert!((h.mode.map().rotations[0] - 13.5).abs() < EPSILON);
    assert!((h.mode.needle().angles[0] - 346.5).abs() < EPSILON);

    // Throttled samples do not redraw
    let outcome = h.mode.on_sample(&sample, ms(20));
    assert_eq!(outcome, SampleOutcome::Throttled);
    assert_eq!(h.mode.map().rotations.len(), 1);

    // Rejected samples do not redraw either
    let outcome = h
        .mode
        .on_sample(&OrientationSample::from_alpha(0.0, false), ms(100));
    assert_eq!(outcome, SampleOutcome::Rejected);
    assert_eq!(h.mode.map().rotations.len(), 1);
}

/// Screen rotation is read for every sample
#[test]
fn test_screen_rotation_is_queried() {
    let mut h = working();
    block_on(h.mode.enable()).unwrap();
    block_on(h.mode.toggle()).unwrap();
    block_on(h.mode.toggle()).unwrap();

    h.rotation.set(ScreenRotation::Quarter);
    for step in 0..100u64 {
        h.mode
            .on_sample(&OrientationSample::from_alpha(180.0, true), ms(step * 50));
    }
    assert!((h.mode.heading() - 90.0).abs() < 0.01, "got {}", h.mode.heading());
    assert_eq!(h.mode.cardinal_direction().label(), "E");
}

/// Disabling resets the map, the needle, and announces it
#[test]
fn test_disable_resets_renderers() {
    let mut h = working();
    block_on(h.mode.enable()).unwrap();
    h.mode
        .on_sample(&OrientationSample::from_alpha(90.0, true), ms(0));

    h.mode.disable();
    assert!(!h.mode.is_active());
    assert_eq!(h.mode.map().resets, 1);
    assert_eq!(h.mode.needle().angles.last(), Some(&0.0));
    assert_eq!(
        h.mode.notifier().statuses,
        vec![Status::Enabled, Status::Disabled]
    );

    // Disabling again changes nothing
    h.mode.disable();
    assert_eq!(h.mode.map().resets, 1);
    assert_eq!(h.mode.notifier().statuses.len(), 2);

    let outcome = h
        .mode
        .on_sample(&OrientationSample::from_alpha(90.0, true), ms(500));
    assert_eq!(outcome, SampleOutcome::Inactive);
}

/// Toggle flips the mode and reports the new state
#[test]
fn test_toggle() {
    let mut h = working();

    assert_eq!(block_on(h.mode.toggle()), Ok(true));
    assert!(h.mode.is_active());

    assert_eq!(block_on(h.mode.toggle()), Ok(false));
    assert!(!h.mode.is_active());

    let mut denied = harness(
        true,
        Permission::Denied,
        MockMap::default(),
        MockNeedle::default(),
    );
    assert_eq!(
        block_on(denied.mode.toggle()),
        Err(ModeError::PermissionDenied)
    );
}

/// Renderer failures are logged and estimation carries on
#[test]
fn test_renderer_failures_are_isolated() {
    let map = MockMap {
        failing: true,
        ..Default::default()
    };
    let needle = MockNeedle {
        failing: true,
        ..Default::default()
    };
    let mut h = harness(true, Permission::Granted, map, needle);
    block_on(h.mode.enable()).unwrap();

    let sample = OrientationSample::from_alpha(90.0, true);
    for step in 0..10u64 {
        let outcome = h.mode.on_sample(&sample, ms(step * 50));
        assert!(matches!(outcome, SampleOutcome::Applied(_)));
    }
    assert!(h.mode.heading() > 13.5);

    h.mode.calibrate_to_north();
    h.mode.disable();
    assert!(!h.mode.is_active());
    assert_eq!(h.mode.notifier().statuses.last(), Some(&Status::Disabled));
}

/// Calibration announces the new offset and redraws
#[test]
fn test_calibration_notifies_and_redraws() {
    let mut h = working();
    block_on(h.mode.enable()).unwrap();

    let sample = OrientationSample::from_alpha(90.0, true);
    for step in 0..200u64 {
        h.mode.on_sample(&sample, ms(step * 50));
    }
    let draws = h.mode.map().rotations.len();

    let offset = h.mode.calibrate_to_north();
    assert!((offset - 270.0).abs() < 0.01, "got {}", offset);
    assert!(h.mode.heading() < 0.01 || h.mode.heading() > 359.99);
    assert_eq!(h.mode.map().rotations.len(), draws + 1);
    assert_eq!(h.mode.cardinal_direction().label(), "N");

    match h.mode.notifier().statuses.last() {
        Some(Status::Calibrated { offset: announced }) => {
            assert!((announced - offset).abs() < EPSILON)
        }
        other => panic!("expected calibration status, got {:?}", other),
    }
    assert_eq!(
        h.mode.notifier().messages.last().map(String::as_str),
        Some("Compass calibrated (offset 270°)")
    );

    h.mode.adjust_calibration(5.0);
    assert!((h.mode.estimator().calibration_offset() - 275.0).abs() < 0.01);
    assert!((h.mode.heading() - 5.0).abs() < 0.01);
}

/// Calibration while disabled is stored for the next session
#[test]
fn test_calibration_while_disabled_persists() {
    let mut h = working();

    h.mode.set_calibration_offset(-15.0);
    assert!(h.mode.map().rotations.is_empty());
    assert_eq!(
        h.mode.notifier().statuses,
        vec![Status::Calibrated { offset: 345.0 }]
    );

    block_on(h.mode.enable()).unwrap();
    assert_eq!(h.mode.estimator().calibration_offset(), 345.0);

    h.mode.disable();
    block_on(h.mode.enable()).unwrap();
    assert_eq!(h.mode.estimator().calibration_offset(), 345.0);
}
