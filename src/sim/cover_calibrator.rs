use crate::ASCOMResult;
use crate::api::cover_calibrator::{CalibratorStatus, CoverStatus};
use crate::api::{CoverCalibrator, Device, DeviceBase};
use async_trait::async_trait;
use parking_lot::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

const COVER_DURATION: Duration = Duration::from_secs(5);
const BRIGHTNESS_DURATION: Duration = Duration::from_secs(2);

/// Simulated dust cover with a flat-field calibrator panel.
///
/// The cover takes 5 seconds to open or close and the panel settles 2 seconds after a
/// brightness change.
#[derive(Debug)]
pub struct SimCoverCalibrator {
    base: DeviceBase,
    max_brightness: i32,
    state: Mutex<State>,
}

#[derive(Debug)]
struct State {
    brightness: i32,
    calibrator: CalibratorStatus,
    calibrator_ready_at: Option<Instant>,
    cover: CoverStatus,
    /// Final state and completion time of the cover movement in progress.
    cover_motion: Option<(CoverStatus, Instant)>,
}

impl State {
    fn advance(&mut self) {
        let now = Instant::now();
        if let Some((done, done_at)) = self.cover_motion
            && now >= done_at
        {
            self.cover = done;
            self.cover_motion = None;
            tracing::debug!(cover = ?done, "Cover movement complete");
        }
        if let Some(ready_at) = self.calibrator_ready_at
            && now >= ready_at
        {
            self.calibrator_ready_at = None;
            self.calibrator = if self.brightness == 0 {
                CalibratorStatus::Off
            } else {
                CalibratorStatus::Ready
            };
        }
    }

    fn set_brightness(&mut self, brightness: i32) {
        self.brightness = brightness;
        self.calibrator = CalibratorStatus::NotReady;
        self.calibrator_ready_at = Some(Instant::now() + BRIGHTNESS_DURATION);
    }

    fn move_cover(&mut self, done: CoverStatus) {
        if self.cover == done {
            tracing::debug!(cover = ?done, "Cover is already there");
            return;
        }
        self.cover = CoverStatus::Moving;
        self.cover_motion = Some((done, Instant::now() + COVER_DURATION));
    }
}

impl SimCoverCalibrator {
    /// Closed cover with the calibrator off, dimmable from 0 to `max_brightness`.
    pub fn new(name: impl Into<String>, number: usize, max_brightness: i32) -> Self {
        Self {
            base: DeviceBase::new(name, number, "Simulated cover calibrator"),
            max_brightness,
            state: Mutex::new(State {
                brightness: 0,
                calibrator: CalibratorStatus::Off,
                calibrator_ready_at: None,
                cover: CoverStatus::Closed,
                cover_motion: None,
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
impl Device for SimCoverCalibrator {
    fn base(&self) -> &DeviceBase {
        &self.base
    }

    async fn driver_info(&self) -> ASCOMResult<String> {
        Ok("ASCOM Alpaca CoverCalibrator Driver".to_owned())
    }
}

#[async_trait]
impl CoverCalibrator for SimCoverCalibrator {
    async fn brightness(&self) -> ASCOMResult<i32> {
        Ok(self.state().brightness)
    }

    async fn calibrator_state(&self) -> ASCOMResult<CalibratorStatus> {
        Ok(self.state().calibrator)
    }

    async fn cover_state(&self) -> ASCOMResult<CoverStatus> {
        Ok(self.state().cover)
    }

    async fn max_brightness(&self) -> ASCOMResult<i32> {
        Ok(self.max_brightness)
    }

    async fn calibrator_off(&self) -> ASCOMResult<()> {
        self.state().set_brightness(0);
        Ok(())
    }

    async fn calibrator_on(&self, brightness: i32) -> ASCOMResult<()> {
        if !(0..=self.max_brightness).contains(&brightness) {
            tracing::warn!(
                brightness,
                max_brightness = self.max_brightness,
                "Ignoring out of range calibrator brightness"
            );
            return Ok(());
        }
        self.state().set_brightness(brightness);
        Ok(())
    }

    async fn close_cover(&self) -> ASCOMResult<()> {
        self.state().move_cover(CoverStatus::Closed);
        Ok(())
    }

    async fn halt_cover(&self) -> ASCOMResult<()> {
        let mut state = self.state();
        state.cover_motion = None;
        state.cover = CoverStatus::Unknown;
        Ok(())
    }

    async fn open_cover(&self) -> ASCOMResult<()> {
        self.state().move_cover(CoverStatus::Open);
        Ok(())
    }
}
