use crate::ASCOMResult;
use crate::api::{Device, DeviceBase, ObservingConditions};
use async_trait::async_trait;
use parking_lot::{Mutex, MutexGuard};
use rand::Rng;
use std::time::{Duration, Instant};

const AUTO_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Dew point in °C from temperature (°C) and relative humidity (%), by the Magnus formula.
fn dew_point(temperature: f64, humidity: f64) -> f64 {
    const A: f64 = 17.27;
    const B: f64 = 237.7;
    let alpha = A * temperature / (B + temperature) + (humidity / 100.0).ln();
    B * alpha / (A - alpha)
}

#[derive(Debug, Clone, Copy)]
struct Readings {
    cloud_cover: f64,
    humidity: f64,
    pressure: f64,
    rain_rate: f64,
    sky_brightness: f64,
    sky_quality: f64,
    sky_temperature: f64,
    star_fwhm: f64,
    temperature: f64,
    wind_direction: f64,
    wind_gust: f64,
    wind_speed: f64,
}

impl Readings {
    fn sample(rng: &mut impl Rng) -> Self {
        let temperature = 15.0 + rng.random_range(-0.5..0.5);
        let wind_speed = rng.random_range(0.0..10.0);
        Self {
            cloud_cover: rng.random_range(0.0..100.0),
            humidity: (60.0 + rng.random_range(-1.0..1.0_f64)).clamp(0.0, 100.0),
            pressure: 1013.0 + rng.random_range(-10.0..10.0),
            rain_rate: if rng.random_bool(0.05) {
                rng.random_range(0.1..5.0)
            } else {
                0.0
            },
            sky_brightness: 10.0,
            sky_quality: 20.0,
            sky_temperature: temperature - 25.0,
            star_fwhm: 2.0 + rng.random_range(0.0..3.0),
            temperature,
            wind_direction: (180.0 + rng.random_range(-30.0..30.0_f64)).rem_euclid(360.0),
            wind_gust: wind_speed * (1.0 + rng.random_range(0.0..0.5)),
            wind_speed,
        }
    }
}

/// Simulated weather station.
///
/// Readings are regenerated with a little noise on `refresh` and automatically once a
/// minute. All sensors update together.
#[derive(Debug)]
pub struct SimObservingConditions {
    base: DeviceBase,
    state: Mutex<State>,
}

#[derive(Debug)]
struct State {
    average_period: f64,
    readings: Readings,
    last_update: Instant,
}

impl State {
    fn refresh(&mut self) {
        self.readings = Readings::sample(&mut rand::rng());
        self.last_update = Instant::now();
    }
}

impl SimObservingConditions {
    /// Weather station with a fresh set of readings.
    pub fn new(name: impl Into<String>, number: usize) -> Self {
        Self {
            base: DeviceBase::new(name, number, "Simulated observing conditions"),
            state: Mutex::new(State {
                average_period: 0.0,
                readings: Readings::sample(&mut rand::rng()),
                last_update: Instant::now(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        let mut state = self.state.lock();
        if state.last_update.elapsed() >= AUTO_REFRESH_INTERVAL {
            state.refresh();
        }
        state
    }

    fn reading(&self, f: impl FnOnce(&Readings) -> f64) -> ASCOMResult<f64> {
        Ok(f(&self.state().readings))
    }
}

#[async_trait]
impl Device for SimObservingConditions {
    fn base(&self) -> &DeviceBase {
        &self.base
    }

    async fn driver_info(&self) -> ASCOMResult<String> {
        Ok("ASCOM Alpaca ObservingConditions Driver".to_owned())
    }
}

#[async_trait]
impl ObservingConditions for SimObservingConditions {
    async fn average_period(&self) -> ASCOMResult<f64> {
        Ok(self.state.lock().average_period)
    }

    async fn set_average_period(&self, average_period: f64) -> ASCOMResult<()> {
        if average_period < 0.0 {
            tracing::warn!(average_period, "Ignoring negative average period");
            return Ok(());
        }
        self.state.lock().average_period = average_period;
        Ok(())
    }

    async fn cloud_cover(&self) -> ASCOMResult<f64> {
        self.reading(|r| r.cloud_cover)
    }

    async fn dew_point(&self) -> ASCOMResult<f64> {
        self.reading(|r| dew_point(r.temperature, r.humidity))
    }

    async fn humidity(&self) -> ASCOMResult<f64> {
        self.reading(|r| r.humidity)
    }

    async fn pressure(&self) -> ASCOMResult<f64> {
        self.reading(|r| r.pressure)
    }

    async fn rain_rate(&self) -> ASCOMResult<f64> {
        self.reading(|r| r.rain_rate)
    }

    async fn sky_brightness(&self) -> ASCOMResult<f64> {
        self.reading(|r| r.sky_brightness)
    }

    async fn sky_quality(&self) -> ASCOMResult<f64> {
        self.reading(|r| r.sky_quality)
    }

    async fn sky_temperature(&self) -> ASCOMResult<f64> {
        self.reading(|r| r.sky_temperature)
    }

    async fn star_fwhm(&self) -> ASCOMResult<f64> {
        self.reading(|r| r.star_fwhm)
    }

    async fn temperature(&self) -> ASCOMResult<f64> {
        self.reading(|r| r.temperature)
    }

    async fn wind_direction(&self) -> ASCOMResult<f64> {
        self.reading(|r| r.wind_direction)
    }

    async fn wind_gust(&self) -> ASCOMResult<f64> {
        self.reading(|r| r.wind_gust)
    }

    async fn wind_speed(&self) -> ASCOMResult<f64> {
        self.reading(|r| r.wind_speed)
    }

    async fn refresh(&self) -> ASCOMResult<()> {
        tracing::debug!("Refreshing weather readings");
        self.state.lock().refresh();
        Ok(())
    }

    async fn sensor_description(&self, sensor_name: String) -> ASCOMResult<String> {
        let description = match sensor_name.to_ascii_lowercase().as_str() {
            "cloudcover" => "Simulated cloud cover",
            "dewpoint" => "Calculated from temperature and humidity using Magnus formula",
            "humidity" => "Simulated humidity sensor",
            "pressure" => "Simulated pressure sensor",
            "rainrate" => "Simulated rain detector",
            "skybrightness" => "Simulated sky brightness",
            "skyquality" => "Simulated sky quality",
            "skytemperature" => "Simulated sky temperature",
            "starfwhm" => "Simulated seeing",
            "temperature" => "Simulated temperature sensor",
            "winddirection" => "Simulated wind direction",
            "windgust" => "Simulated wind gust",
            "windspeed" => "Simulated wind speed",
            _ => return Ok(format!("Unknown sensor: {sensor_name}")),
        };
        Ok(description.to_owned())
    }

    async fn time_since_last_update(&self, _sensor_name: String) -> ASCOMResult<f64> {
        Ok(self.state().last_update.elapsed().as_secs_f64())
    }
}
