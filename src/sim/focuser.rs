use super::{DEFAULT_STEP_INTERVAL, Ticker};
use crate::ASCOMResult;
use crate::api::device::DeviceStateItem;
use crate::api::{Device, DeviceBase, Focuser};
use async_trait::async_trait;
use parking_lot::{Mutex, MutexGuard};
use std::time::Duration;

/// Simulated absolute focuser.
///
/// The position advances by one step towards the target every step interval.
#[derive(Debug)]
pub struct SimFocuser {
    base: DeviceBase,
    max_step: i32,
    step_size: f64,
    state: Mutex<State>,
}

#[derive(Debug)]
struct State {
    position: i32,
    target: i32,
    temp_comp: bool,
    ticker: Ticker,
}

impl State {
    fn advance(&mut self) {
        let delta = i64::from(self.target) - i64::from(self.position);
        if delta == 0 {
            return;
        }
        let steps = self.ticker.ticks().min(delta.unsigned_abs());
        let steps = i64::try_from(steps).unwrap_or(i64::MAX);
        self.position = i32::try_from(i64::from(self.position) + delta.signum() * steps)
            .unwrap_or(self.target);
    }
}

impl SimFocuser {
    /// Focuser travelling between 0 and `max_step`, with `step_size` microns per step.
    pub fn new(name: impl Into<String>, number: usize, max_step: i32, step_size: f64) -> Self {
        Self {
            base: DeviceBase::new(name, number, "Simulated focuser"),
            max_step,
            step_size,
            state: Mutex::new(State {
                position: 0,
                target: 0,
                temp_comp: false,
                ticker: Ticker::new(DEFAULT_STEP_INTERVAL),
            }),
        }
    }

    /// Override the time the simulated motor takes per step.
    #[must_use]
    pub fn with_step_interval(mut self, interval: Duration) -> Self {
        self.state.get_mut().ticker.interval = interval;
        self
    }

    fn state(&self) -> MutexGuard<'_, State> {
        let mut state = self.state.lock();
        state.advance();
        state
    }
}

#[async_trait]
impl Device for SimFocuser {
    fn base(&self) -> &DeviceBase {
        &self.base
    }

    async fn driver_info(&self) -> ASCOMResult<String> {
        Ok("ASCOM Alpaca Focuser Driver".to_owned())
    }

    async fn device_state(&self) -> ASCOMResult<Vec<DeviceStateItem>> {
        let state = self.state();
        Ok(vec![
            DeviceStateItem {
                name: "IsMoving".to_owned(),
                value: (state.position != state.target).into(),
            },
            DeviceStateItem {
                name: "Position".to_owned(),
                value: state.position.into(),
            },
        ])
    }
}

#[async_trait]
impl Focuser for SimFocuser {
    async fn absolute(&self) -> ASCOMResult<bool> {
        Ok(true)
    }

    async fn is_moving(&self) -> ASCOMResult<bool> {
        let state = self.state();
        Ok(state.position != state.target)
    }

    async fn max_increment(&self) -> ASCOMResult<i32> {
        Ok(1000)
    }

    async fn max_step(&self) -> ASCOMResult<i32> {
        Ok(self.max_step)
    }

    async fn position(&self) -> ASCOMResult<i32> {
        Ok(self.state().position)
    }

    async fn step_size(&self) -> ASCOMResult<f64> {
        Ok(self.step_size)
    }

    async fn temp_comp(&self) -> ASCOMResult<bool> {
        Ok(self.state.lock().temp_comp)
    }

    async fn set_temp_comp(&self, temp_comp: bool) -> ASCOMResult<()> {
        self.state.lock().temp_comp = temp_comp;
        Ok(())
    }

    async fn temp_comp_available(&self) -> ASCOMResult<bool> {
        Ok(true)
    }

    async fn temperature(&self) -> ASCOMResult<f64> {
        Ok(20.0)
    }

    async fn halt(&self) -> ASCOMResult<()> {
        let mut state = self.state();
        state.target = state.position;
        tracing::debug!(position = state.position, "Focuser halted");
        Ok(())
    }

    async fn move_(&self, position: i32) -> ASCOMResult<()> {
        if !(0..=self.max_step).contains(&position) {
            tracing::warn!(position, max_step = self.max_step, "Ignoring out of range focuser move");
            return Ok(());
        }
        let mut state = self.state();
        state.target = position;
        state.ticker.restart();
        tracing::debug!(from = state.position, to = position, "Focuser moving");
        Ok(())
    }
}
