use crate::ASCOMResult;
use crate::api::{Device, DeviceBase, Switch};
use async_trait::async_trait;
use parking_lot::Mutex;

/// One channel of a [`SimSwitch`].
#[derive(Debug, Clone)]
struct Channel {
    name: String,
    description: String,
    can_write: bool,
    value: f64,
    min: f64,
    max: f64,
    step: f64,
}

/// Simulated bank of switches.
///
/// Every channel starts as a writable on/off switch with range `[0, 1]`. Requests for
/// unknown switch IDs get neutral fallback values and writes to them are ignored.
#[derive(Debug)]
pub struct SimSwitch {
    base: DeviceBase,
    channels: Mutex<Vec<Channel>>,
}

impl SimSwitch {
    /// Bank of `count` on/off switches named `Switch 0`, `Switch 1` and so on.
    pub fn new(name: impl Into<String>, number: usize, count: usize) -> Self {
        let channels = (0..count)
            .map(|i| Channel {
                name: format!("Switch {i}"),
                description: format!("Switch device {i}"),
                can_write: true,
                value: 0.0,
                min: 0.0,
                max: 1.0,
                step: 1.0,
            })
            .collect();

        Self {
            base: DeviceBase::new(name, number, "Simulated switch bank"),
            channels: Mutex::new(channels),
        }
    }

    /// Reconfigure a channel's metadata and value range.
    ///
    /// The current value is clamped into the new range. Unknown IDs are ignored, an inverted
    /// range is swapped and a range with a NaN bound leaves the channel untouched.
    #[expect(clippy::too_many_arguments)]
    pub fn configure_switch(
        &self,
        id: i32,
        name: impl Into<String>,
        description: impl Into<String>,
        can_write: bool,
        min: f64,
        max: f64,
        step: f64,
    ) {
        if min.is_nan() || max.is_nan() {
            tracing::warn!(id, min, max, "Ignoring switch range with a NaN bound");
            return;
        }
        let (min, max) = if min > max {
            tracing::warn!(id, min, max, "Swapping inverted switch range");
            (max, min)
        } else {
            (min, max)
        };
        _ = self.with_channel(id, |channel| {
            channel.name = name.into();
            channel.description = description.into();
            channel.can_write = can_write;
            channel.min = min;
            channel.max = max;
            channel.step = step;
            channel.value = channel.value.clamp(min, max);
        });
    }

    fn with_channel<T>(&self, id: i32, f: impl FnOnce(&mut Channel) -> T) -> Option<T> {
        let mut channels = self.channels.lock();
        let channel = usize::try_from(id)
            .ok()
            .and_then(|index| channels.get_mut(index));
        if channel.is_none() {
            tracing::debug!(id, "Unknown switch ID");
        }
        channel.map(f)
    }

    fn read<T>(&self, id: i32, fallback: T, f: impl FnOnce(&Channel) -> T) -> T {
        self.with_channel(id, |channel| f(channel))
            .unwrap_or(fallback)
    }

    fn write_value(&self, id: i32, value: f64) {
        _ = self.with_channel(id, |channel| {
            if channel.can_write {
                channel.value = value.clamp(channel.min, channel.max);
            } else {
                tracing::warn!(id, "Ignoring write to read-only switch");
            }
        });
    }

    fn write_state(&self, id: i32, state: bool) {
        _ = self.with_channel(id, |channel| {
            if channel.can_write {
                channel.value = if state { channel.max } else { channel.min };
            } else {
                tracing::warn!(id, "Ignoring write to read-only switch");
            }
        });
    }
}

#[async_trait]
impl Device for SimSwitch {
    fn base(&self) -> &DeviceBase {
        &self.base
    }

    async fn driver_info(&self) -> ASCOMResult<String> {
        Ok("ASCOM Alpaca Switch Driver".to_owned())
    }
}

#[async_trait]
impl Switch for SimSwitch {
    async fn max_switch(&self) -> ASCOMResult<i32> {
        Ok(i32::try_from(self.channels.lock().len()).unwrap_or(i32::MAX))
    }

    async fn can_write(&self, id: i32) -> ASCOMResult<bool> {
        Ok(self.read(id, false, |channel| channel.can_write))
    }

    async fn get_switch(&self, id: i32) -> ASCOMResult<bool> {
        Ok(self.read(id, false, |channel| channel.value > 0.0))
    }

    async fn get_switch_description(&self, id: i32) -> ASCOMResult<String> {
        Ok(self.read(id, "Invalid switch".to_owned(), |channel| {
            channel.description.clone()
        }))
    }

    async fn get_switch_name(&self, id: i32) -> ASCOMResult<String> {
        Ok(self.read(id, "Invalid".to_owned(), |channel| channel.name.clone()))
    }

    async fn get_switch_value(&self, id: i32) -> ASCOMResult<f64> {
        Ok(self.read(id, 0.0, |channel| channel.value))
    }

    async fn min_switch_value(&self, id: i32) -> ASCOMResult<f64> {
        Ok(self.read(id, 0.0, |channel| channel.min))
    }

    async fn max_switch_value(&self, id: i32) -> ASCOMResult<f64> {
        Ok(self.read(id, 1.0, |channel| channel.max))
    }

    async fn set_async(&self, id: i32, state: bool) -> ASCOMResult<()> {
        self.write_state(id, state);
        Ok(())
    }

    async fn set_async_value(&self, id: i32, value: f64) -> ASCOMResult<()> {
        self.write_value(id, value);
        Ok(())
    }

    async fn set_switch(&self, id: i32, state: bool) -> ASCOMResult<()> {
        self.write_state(id, state);
        Ok(())
    }

    async fn set_switch_name(&self, id: i32, name: String) -> ASCOMResult<()> {
        // Renaming is allowed even for read-only switches.
        _ = self.with_channel(id, |channel| channel.name = name);
        Ok(())
    }

    async fn set_switch_value(&self, id: i32, value: f64) -> ASCOMResult<()> {
        self.write_value(id, value);
        Ok(())
    }

    async fn switch_step(&self, id: i32) -> ASCOMResult<f64> {
        Ok(self.read(id, 1.0, |channel| channel.step))
    }
}
