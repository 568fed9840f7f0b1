//! In-memory simulated drivers for every supported device type.
//!
//! Each driver keeps its mutable state behind a [`parking_lot::Mutex`] and computes motion
//! lazily from the time elapsed since the previous access, so there's no background task to
//! spawn and simulated devices can be registered directly:
//!
//! ```no_run
//! use alpaca_observatory::Server;
//! use alpaca_observatory::sim::SimFocuser;
//!
//! # fn main() -> eyre::Result<()> {
//! let mut server = Server::default();
//! server.devices.register(SimFocuser::new("Focuser", 0, 200, 10.0))?;
//! # Ok(())
//! # }
//! ```

use std::time::{Duration, Instant};

#[cfg(feature = "cover_calibrator")]
mod cover_calibrator;
#[cfg(feature = "cover_calibrator")]
pub use cover_calibrator::SimCoverCalibrator;

#[cfg(feature = "dome")]
mod dome;
#[cfg(feature = "dome")]
pub use dome::SimDome;

#[cfg(feature = "filter_wheel")]
mod filter_wheel;
#[cfg(feature = "filter_wheel")]
pub use filter_wheel::SimFilterWheel;

#[cfg(feature = "focuser")]
mod focuser;
#[cfg(feature = "focuser")]
pub use focuser::SimFocuser;

#[cfg(feature = "observing_conditions")]
mod observing_conditions;
#[cfg(feature = "observing_conditions")]
pub use observing_conditions::SimObservingConditions;

#[cfg(feature = "rotator")]
mod rotator;
#[cfg(feature = "rotator")]
pub use rotator::SimRotator;

#[cfg(feature = "safety_monitor")]
mod safety_monitor;
#[cfg(feature = "safety_monitor")]
pub use safety_monitor::SimSafetyMonitor;

#[cfg(feature = "switch")]
mod switch;
#[cfg(feature = "switch")]
pub use switch::SimSwitch;

/// Default time between two steps of a simulated stepper motor.
pub const DEFAULT_STEP_INTERVAL: Duration = Duration::from_millis(2);

/// Counts whole step intervals elapsed between accesses.
///
/// A zero interval completes any motion on the next access.
#[cfg(any(feature = "filter_wheel", feature = "focuser", feature = "rotator"))]
#[derive(Debug)]
struct Ticker {
    interval: Duration,
    last: Instant,
}

#[cfg(any(feature = "filter_wheel", feature = "focuser", feature = "rotator"))]
impl Ticker {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Instant::now(),
        }
    }

    /// Start counting from now, discarding the idle time.
    fn restart(&mut self) {
        self.last = Instant::now();
    }

    fn ticks(&mut self) -> u64 {
        let now = Instant::now();
        if self.interval.is_zero() {
            self.last = now;
            return u64::MAX;
        }
        let ticks = now.duration_since(self.last).as_nanos() / self.interval.as_nanos();
        // Keep the remainder of a partial interval for the next access.
        match u32::try_from(ticks) {
            Ok(whole) => self.last += self.interval * whole,
            Err(_) => self.last = now,
        }
        u64::try_from(ticks).unwrap_or(u64::MAX)
    }
}

/// Normalize an angle into `[0, 360)` degrees.
#[cfg(any(feature = "dome", feature = "rotator"))]
fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    // `rem_euclid` rounds tiny negative inputs up to exactly 360.
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Signed rotation from `from` to `to` along the shortest path, in `(-180, 180]`.
#[cfg(any(feature = "dome", feature = "rotator"))]
fn shortest_rotation(from: f64, to: f64) -> f64 {
    let diff = normalize_degrees(to - from);
    if diff > 180.0 { diff - 360.0 } else { diff }
}

/// Seconds elapsed since `since`, moving it to now.
#[cfg(feature = "dome")]
fn take_elapsed(since: &mut Instant) -> f64 {
    let now = Instant::now();
    let elapsed = now.duration_since(*since).as_secs_f64();
    *since = now;
    elapsed
}
