use super::{DEFAULT_STEP_INTERVAL, Ticker, normalize_degrees, shortest_rotation};
use crate::ASCOMResult;
use crate::api::{Device, DeviceBase, Rotator};
use async_trait::async_trait;
use parking_lot::{Mutex, MutexGuard};
use std::time::Duration;

/// Simulated reversible rotator.
///
/// Moves by one `step_size` every step interval along the shortest path.
#[derive(Debug)]
pub struct SimRotator {
    base: DeviceBase,
    step_size: f64,
    state: Mutex<State>,
}

#[derive(Debug)]
struct State {
    position: f64,
    target: f64,
    reverse: bool,
    ticker: Ticker,
}

impl State {
    fn is_moving(&self) -> bool {
        self.position != self.target
    }

    fn mechanical_position(&self) -> f64 {
        if self.reverse {
            normalize_degrees(360.0 - self.position)
        } else {
            self.position
        }
    }

    fn advance(&mut self, step_size: f64) {
        if !self.is_moving() {
            return;
        }
        let remaining = shortest_rotation(self.position, self.target);
        let ticks = self.ticker.ticks();
        // Precision loss is irrelevant past a full turn of steps.
        #[expect(clippy::cast_precision_loss, clippy::as_conversions)]
        let travel = step_size * ticks as f64;
        // Land exactly on the target once less than half a step is left.
        self.position = if remaining.abs() - travel < step_size / 2.0 {
            self.target
        } else {
            normalize_degrees(self.position + travel.copysign(remaining))
        };
    }

    fn move_to(&mut self, target: f64) {
        self.target = normalize_degrees(target);
        self.ticker.restart();
        tracing::debug!(from = self.position, to = self.target, "Rotator moving");
    }
}

impl SimRotator {
    /// Rotator at sky position 0 moving `step_size` degrees per step.
    pub fn new(name: impl Into<String>, number: usize, step_size: f64) -> Self {
        Self {
            base: DeviceBase::new(name, number, "Simulated rotator"),
            step_size,
            state: Mutex::new(State {
                position: 0.0,
                target: 0.0,
                reverse: false,
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
        state.advance(self.step_size);
        state
    }
}

#[async_trait]
impl Device for SimRotator {
    fn base(&self) -> &DeviceBase {
        &self.base
    }

    async fn driver_info(&self) -> ASCOMResult<String> {
        Ok("ASCOM Alpaca Rotator Driver".to_owned())
    }
}

#[async_trait]
impl Rotator for SimRotator {
    async fn can_reverse(&self) -> ASCOMResult<bool> {
        Ok(true)
    }

    async fn is_moving(&self) -> ASCOMResult<bool> {
        Ok(self.state().is_moving())
    }

    async fn mechanical_position(&self) -> ASCOMResult<f64> {
        Ok(self.state().mechanical_position())
    }

    async fn position(&self) -> ASCOMResult<f64> {
        Ok(self.state().position)
    }

    async fn reverse(&self) -> ASCOMResult<bool> {
        Ok(self.state.lock().reverse)
    }

    async fn set_reverse(&self, reverse: bool) -> ASCOMResult<()> {
        self.state.lock().reverse = reverse;
        Ok(())
    }

    async fn step_size(&self) -> ASCOMResult<f64> {
        Ok(self.step_size)
    }

    async fn target_position(&self) -> ASCOMResult<f64> {
        Ok(self.state.lock().target)
    }

    async fn halt(&self) -> ASCOMResult<()> {
        let mut state = self.state();
        state.target = state.position;
        Ok(())
    }

    async fn move_(&self, position: f64) -> ASCOMResult<()> {
        let mut state = self.state();
        let target = state.position + position;
        state.move_to(target);
        Ok(())
    }

    async fn move_absolute(&self, position: f64) -> ASCOMResult<()> {
        self.state().move_to(position);
        Ok(())
    }

    async fn move_mechanical(&self, position: f64) -> ASCOMResult<()> {
        let mut state = self.state();
        let target = if state.reverse {
            360.0 - position
        } else {
            position
        };
        state.move_to(target);
        Ok(())
    }

    async fn sync(&self, position: f64) -> ASCOMResult<()> {
        let mut state = self.state();
        state.position = normalize_degrees(position);
        state.target = state.position;
        Ok(())
    }
}
