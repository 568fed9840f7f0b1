use super::{DEFAULT_STEP_INTERVAL, Ticker};
use crate::ASCOMResult;
use crate::api::{Device, DeviceBase, FilterWheel};
use async_trait::async_trait;
use parking_lot::{Mutex, MutexGuard};
use std::time::Duration;

const FILTERS: [(&str, i32); 8] = [
    ("Red", 0),
    ("Green", -20),
    ("Blue", -40),
    ("Luminance", 0),
    ("Ha", 10),
    ("OIII", -15),
    ("SII", 5),
    ("Clear", 0),
];

/// Simulated filter wheel moving one slot per step interval.
///
/// The first eight slots hold a standard LRGB + narrowband set; extra slots are named
/// `Filter N` with no focus offset.
#[derive(Debug)]
pub struct SimFilterWheel {
    base: DeviceBase,
    names: Vec<String>,
    focus_offsets: Vec<i32>,
    state: Mutex<State>,
}

#[derive(Debug)]
struct State {
    position: i32,
    target: i32,
    ticker: Ticker,
}

impl State {
    fn advance(&mut self) {
        let delta = i64::from(self.target) - i64::from(self.position);
        if delta == 0 {
            return;
        }
        let slots = i64::try_from(self.ticker.ticks().min(delta.unsigned_abs())).unwrap_or(0);
        self.position = i32::try_from(i64::from(self.position) + delta.signum() * slots)
            .unwrap_or(self.target);
    }
}

impl SimFilterWheel {
    /// Filter wheel with `count` slots, starting at slot 0.
    pub fn new(name: impl Into<String>, number: usize, count: usize) -> Self {
        let (names, focus_offsets) = (0..count)
            .map(|slot| match FILTERS.get(slot) {
                Some(&(name, offset)) => (name.to_owned(), offset),
                None => (format!("Filter {slot}"), 0),
            })
            .unzip();

        Self {
            base: DeviceBase::new(name, number, "Simulated filter wheel"),
            names,
            focus_offsets,
            state: Mutex::new(State {
                position: 0,
                target: 0,
                ticker: Ticker::new(DEFAULT_STEP_INTERVAL),
            }),
        }
    }

    /// Override the time the simulated wheel takes per slot.
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
impl Device for SimFilterWheel {
    fn base(&self) -> &DeviceBase {
        &self.base
    }

    async fn driver_info(&self) -> ASCOMResult<String> {
        Ok("ASCOM Alpaca FilterWheel Driver".to_owned())
    }
}

#[async_trait]
impl FilterWheel for SimFilterWheel {
    async fn focus_offsets(&self) -> ASCOMResult<Vec<i32>> {
        Ok(self.focus_offsets.clone())
    }

    async fn names(&self) -> ASCOMResult<Vec<String>> {
        Ok(self.names.clone())
    }

    async fn position(&self) -> ASCOMResult<i32> {
        let state = self.state();
        Ok(if state.position == state.target {
            state.position
        } else {
            -1
        })
    }

    async fn set_position(&self, position: i32) -> ASCOMResult<()> {
        if !usize::try_from(position).is_ok_and(|slot| slot < self.names.len()) {
            tracing::warn!(position, count = self.names.len(), "Ignoring invalid filter position");
            return Ok(());
        }
        let mut state = self.state();
        state.target = position;
        state.ticker.restart();
        tracing::debug!(from = state.position, to = position, "Filter wheel moving");
        Ok(())
    }
}
