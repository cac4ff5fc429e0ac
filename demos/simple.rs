use compass_heading::{
    MapRenderer, NeedleRenderer, Notifier, OrientationSample, RotationMode, ScreenOrientation,
    ScreenRotation, SensorFeed, Status,
};
use std::convert::Infallible;
use std::time::Duration;

const SAMPLE_PERIOD: Duration = Duration::from_millis(20); // 50 Hz sensor feed

struct DeviceFeed;

impl SensorFeed for DeviceFeed {
    fn is_supported(&self) -> bool {
        true
    }
}

struct PortraitScreen;

impl ScreenOrientation for PortraitScreen {
    fn rotation(&self) -> ScreenRotation {
        ScreenRotation::Natural
    }
}

struct ConsoleMap;

impl MapRenderer for ConsoleMap {
    type Error = Infallible;

    fn set_rotation(&mut self, bearing: f32) -> Result<(), Self::Error> {
        println!("map bearing: {:6.2}", bearing);
        Ok(())
    }

    fn reset_rotation(&mut self) -> Result<(), Self::Error> {
        println!("map north-up");
        Ok(())
    }
}

struct ConsoleNeedle;

impl NeedleRenderer for ConsoleNeedle {
    type Error = Infallible;

    fn set_angle(&mut self, angle: f32) -> Result<(), Self::Error> {
        println!("needle:      {:6.2}", angle);
        Ok(())
    }
}

struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, status: Status) {
        println!("[{}]", status);
    }
}

fn main() {
    env_logger::init();

    let mut mode = RotationMode::new(
        DeviceFeed,
        PortraitScreen,
        ConsoleMap,
        ConsoleNeedle,
        ConsoleNotifier,
    );

    if let Err(err) = futures::executor::block_on(mode.enable()) {
        eprintln!("cannot enable compass rotation: {}", err);
        return;
    }

    let mut now = Duration::ZERO;
    for _ in 0..50 {
        // this loop should run each time the platform delivers an orientation event
        // both event kinds fire; the relative one is dropped once an absolute one is seen
        let absolute = OrientationSample::from_alpha(75.0, true); // replace with actual event data
        let relative = OrientationSample::from_alpha(12.0, false);

        mode.on_sample(&absolute, now);
        mode.on_sample(&relative, now);
        now += SAMPLE_PERIOD;
    }

    println!(
        "heading {:.1}° ({}), locked to {:?}",
        mode.heading(),
        mode.cardinal_direction(),
        mode.source_lock()
    );

    mode.calibrate_to_north();
    mode.disable();
}
