use crate::ASCOMResult;
use crate::api::{Device, DeviceBase, SafetyMonitor};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};

/// Simulated safety monitor combining weather, power and hardware checks.
///
/// Conditions are safe only when all three flags are set, which they are initially.
#[derive(Debug)]
pub struct SimSafetyMonitor {
    base: DeviceBase,
    weather_safe: AtomicBool,
    power_safe: AtomicBool,
    hardware_safe: AtomicBool,
}

impl SimSafetyMonitor {
    /// Safety monitor reporting safe conditions.
    pub fn new(name: impl Into<String>, number: usize) -> Self {
        Self {
            base: DeviceBase::new(name, number, "Simulated safety monitor"),
            weather_safe: AtomicBool::new(true),
            power_safe: AtomicBool::new(true),
            hardware_safe: AtomicBool::new(true),
        }
    }

    /// Report whether weather conditions are safe.
    pub fn set_weather_safe(&self, safe: bool) {
        self.weather_safe.store(safe, Ordering::Relaxed);
    }

    /// Report whether the power supply is healthy.
    pub fn set_power_safe(&self, safe: bool) {
        self.power_safe.store(safe, Ordering::Relaxed);
    }

    /// Report whether the observatory hardware is in a safe state.
    pub fn set_hardware_safe(&self, safe: bool) {
        self.hardware_safe.store(safe, Ordering::Relaxed);
    }
}

#[async_trait]
impl Device for SimSafetyMonitor {
    fn base(&self) -> &DeviceBase {
        &self.base
    }

    async fn driver_info(&self) -> ASCOMResult<String> {
        Ok("ASCOM Alpaca SafetyMonitor Driver".to_owned())
    }
}

#[async_trait]
impl SafetyMonitor for SimSafetyMonitor {
    async fn is_safe(&self) -> ASCOMResult<bool> {
        let weather = self.weather_safe.load(Ordering::Relaxed);
        let power = self.power_safe.load(Ordering::Relaxed);
        let hardware = self.hardware_safe.load(Ordering::Relaxed);
        tracing::debug!(weather, power, hardware, "Safety check");
        Ok(weather && power && hardware)
    }
}
