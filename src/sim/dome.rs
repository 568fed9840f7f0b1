use super::{normalize_degrees, shortest_rotation, take_elapsed};
use crate::api::dome::ShutterState;
use crate::api::{Device, DeviceBase, Dome};
use crate::ASCOMResult;
use async_trait::async_trait;
use parking_lot::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

const AZIMUTH_SPEED: f64 = 5.0;
const ALTITUDE_SPEED: f64 = 2.0;
const SHUTTER_DURATION: Duration = Duration::from_secs(10);
const HOME_AZIMUTH: f64 = 0.0;
/// Positions closer than this (in degrees) count as "at home" or "at park".
const POSITION_TOLERANCE: f64 = 1.0;

/// Simulated observatory dome with optional shutter and altitude control.
///
/// Azimuth slews at 5°/s along the shortest path, altitude at 2°/s, and the shutter takes
/// 10 seconds to open or close.
#[derive(Debug)]
pub struct SimDome {
    base: DeviceBase,
    has_shutter: bool,
    has_altitude: bool,
    state: Mutex<State>,
}

#[derive(Debug)]
struct State {
    azimuth: f64,
    altitude: f64,
    target_azimuth: f64,
    target_altitude: f64,
    park_azimuth: f64,
    park_altitude: f64,
    slaved: bool,
    shutter: ShutterState,
    shutter_done_at: Option<Instant>,
    last_update: Instant,
}

impl State {
    fn is_slewing(&self) -> bool {
        self.azimuth != self.target_azimuth || self.altitude != self.target_altitude
    }

    fn advance(&mut self) {
        let elapsed = take_elapsed(&mut self.last_update);

        let azimuth_diff = shortest_rotation(self.azimuth, self.target_azimuth);
        let azimuth_move = AZIMUTH_SPEED * elapsed;
        self.azimuth = if azimuth_diff.abs() <= azimuth_move {
            self.target_azimuth
        } else {
            normalize_degrees(self.azimuth + azimuth_move.copysign(azimuth_diff))
        };

        let altitude_diff = self.target_altitude - self.altitude;
        let altitude_move = ALTITUDE_SPEED * elapsed;
        self.altitude = if altitude_diff.abs() <= altitude_move {
            self.target_altitude
        } else {
            (self.altitude + altitude_move.copysign(altitude_diff)).clamp(0.0, 90.0)
        };

        if let Some(done_at) = self.shutter_done_at
            && Instant::now() >= done_at
        {
            self.shutter_done_at = None;
            self.shutter = match self.shutter {
                ShutterState::Opening => ShutterState::Open,
                ShutterState::Closing => ShutterState::Closed,
                other => other,
            };
            tracing::debug!(shutter = ?self.shutter, "Shutter movement complete");
        }
    }

    fn slew_to(&mut self, azimuth: f64, altitude: f64) {
        self.target_azimuth = normalize_degrees(azimuth);
        self.target_altitude = altitude;
        self.last_update = Instant::now();
        tracing::debug!(
            azimuth = self.target_azimuth,
            altitude = self.target_altitude,
            "Dome slewing"
        );
    }

    fn move_shutter(&mut self, moving: ShutterState, done: ShutterState) {
        if self.shutter == done {
            tracing::debug!(shutter = ?done, "Shutter is already there");
            return;
        }
        self.shutter = moving;
        self.shutter_done_at = Some(Instant::now() + SHUTTER_DURATION);
    }
}

fn azimuth_distance(a: f64, b: f64) -> f64 {
    shortest_rotation(a, b).abs()
}

impl SimDome {
    /// Dome starting at azimuth 0 and altitude 45, parked at azimuth 180.
    ///
    /// Without a shutter, it's reported as permanently open.
    pub fn new(
        name: impl Into<String>,
        number: usize,
        has_shutter: bool,
        has_altitude: bool,
    ) -> Self {
        Self {
            base: DeviceBase::new(name, number, "Simulated dome"),
            has_shutter,
            has_altitude,
            state: Mutex::new(State {
                azimuth: HOME_AZIMUTH,
                altitude: 45.0,
                target_azimuth: HOME_AZIMUTH,
                target_altitude: 45.0,
                park_azimuth: 180.0,
                park_altitude: 45.0,
                slaved: false,
                shutter: if has_shutter {
                    ShutterState::Closed
                } else {
                    ShutterState::Open
                },
                shutter_done_at: None,
                last_update: Instant::now(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        let mut state = self.state.lock();
        state.advance();
        state
    }
}

#[async_trait]
impl Device for SimDome {
    fn base(&self) -> &DeviceBase {
        &self.base
    }

    async fn driver_info(&self) -> ASCOMResult<String> {
        Ok("ASCOM Alpaca Dome Driver".to_owned())
    }
}

#[async_trait]
impl Dome for SimDome {
    async fn altitude(&self) -> ASCOMResult<f64> {
        Ok(self.state().altitude)
    }

    async fn at_home(&self) -> ASCOMResult<bool> {
        Ok(azimuth_distance(self.state().azimuth, HOME_AZIMUTH) < POSITION_TOLERANCE)
    }

    async fn at_park(&self) -> ASCOMResult<bool> {
        let state = self.state();
        Ok(
            azimuth_distance(state.azimuth, state.park_azimuth) < POSITION_TOLERANCE
                && (state.altitude - state.park_altitude).abs() < POSITION_TOLERANCE,
        )
    }

    async fn azimuth(&self) -> ASCOMResult<f64> {
        Ok(self.state().azimuth)
    }

    async fn can_find_home(&self) -> ASCOMResult<bool> {
        Ok(true)
    }

    async fn can_park(&self) -> ASCOMResult<bool> {
        Ok(true)
    }

    async fn can_set_altitude(&self) -> ASCOMResult<bool> {
        Ok(self.has_altitude)
    }

    async fn can_set_azimuth(&self) -> ASCOMResult<bool> {
        Ok(true)
    }

    async fn can_set_park(&self) -> ASCOMResult<bool> {
        Ok(true)
    }

    async fn can_set_shutter(&self) -> ASCOMResult<bool> {
        Ok(self.has_shutter)
    }

    async fn can_sync_azimuth(&self) -> ASCOMResult<bool> {
        Ok(true)
    }

    async fn shutter_status(&self) -> ASCOMResult<ShutterState> {
        Ok(self.state().shutter)
    }

    async fn slaved(&self) -> ASCOMResult<bool> {
        Ok(self.state.lock().slaved)
    }

    async fn set_slaved(&self, slaved: bool) -> ASCOMResult<()> {
        self.state.lock().slaved = slaved;
        Ok(())
    }

    async fn slewing(&self) -> ASCOMResult<bool> {
        let state = self.state();
        Ok(state.is_slewing()
            || matches!(
                state.shutter,
                ShutterState::Opening | ShutterState::Closing
            ))
    }

    async fn abort_slew(&self) -> ASCOMResult<()> {
        let mut state = self.state();
        state.target_azimuth = state.azimuth;
        state.target_altitude = state.altitude;
        if state.shutter_done_at.take().is_some() {
            state.shutter = ShutterState::Error;
            tracing::warn!("Shutter movement aborted");
        }
        Ok(())
    }

    async fn close_shutter(&self) -> ASCOMResult<()> {
        if !self.has_shutter {
            tracing::warn!("Dome has no shutter to close");
            return Ok(());
        }
        self.state()
            .move_shutter(ShutterState::Closing, ShutterState::Closed);
        Ok(())
    }

    async fn find_home(&self) -> ASCOMResult<()> {
        let mut state = self.state();
        let altitude = state.altitude;
        state.slew_to(HOME_AZIMUTH, altitude);
        Ok(())
    }

    async fn open_shutter(&self) -> ASCOMResult<()> {
        if !self.has_shutter {
            tracing::warn!("Dome has no shutter to open");
            return Ok(());
        }
        self.state()
            .move_shutter(ShutterState::Opening, ShutterState::Open);
        Ok(())
    }

    async fn park(&self) -> ASCOMResult<()> {
        let mut state = self.state();
        let (azimuth, altitude) = (state.park_azimuth, state.park_altitude);
        state.slew_to(azimuth, altitude);
        Ok(())
    }

    async fn set_park(&self) -> ASCOMResult<()> {
        let mut state = self.state();
        state.park_azimuth = state.azimuth;
        state.park_altitude = state.altitude;
        Ok(())
    }

    async fn slew_to_altitude(&self, altitude: f64) -> ASCOMResult<()> {
        if !self.has_altitude {
            tracing::warn!("Dome has no altitude control");
            return Ok(());
        }
        if !(0.0..=90.0).contains(&altitude) {
            tracing::warn!(altitude, "Ignoring out of range dome altitude");
            return Ok(());
        }
        let mut state = self.state();
        let azimuth = state.target_azimuth;
        state.slew_to(azimuth, altitude);
        Ok(())
    }

    async fn slew_to_azimuth(&self, azimuth: f64) -> ASCOMResult<()> {
        let mut state = self.state();
        let altitude = state.target_altitude;
        state.slew_to(azimuth, altitude);
        Ok(())
    }

    async fn sync_to_azimuth(&self, azimuth: f64) -> ASCOMResult<()> {
        let mut state = self.state();
        state.azimuth = normalize_degrees(azimuth);
        state.target_azimuth = state.azimuth;
        Ok(())
    }
}
