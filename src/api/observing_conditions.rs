use super::Device;
use crate::{ASCOMError, ASCOMResult};
use macro_rules_attribute::apply;

/// ObservingConditions Specific Methods.
#[apply(rpc_trait)]
pub trait ObservingConditions: Device + Send + Sync {
    /// Gets the time period over which observations will be averaged, in hours.
    #[http("averageperiod", method = Get)]
    async fn average_period(&self) -> ASCOMResult<f64>;

    /// Sets the time period over which observations will be averaged.
    #[http("averageperiod", method = Put)]
    async fn set_average_period(
        &self,

        #[http("AveragePeriod")] average_period: f64,
    ) -> ASCOMResult<()> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Amount of sky obscured by cloud, in percent.
    #[http("cloudcover", method = Get)]
    async fn cloud_cover(&self) -> ASCOMResult<f64> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Atmospheric dew point at the observatory, in degrees Celsius.
    #[http("dewpoint", method = Get)]
    async fn dew_point(&self) -> ASCOMResult<f64> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Atmospheric relative humidity at the observatory, in percent.
    #[http("humidity", method = Get)]
    async fn humidity(&self) -> ASCOMResult<f64> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Atmospheric pressure at the observatory, in hectopascals.
    #[http("pressure", method = Get)]
    async fn pressure(&self) -> ASCOMResult<f64> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Rain rate at the observatory, in millimeters per hour.
    #[http("rainrate", method = Get)]
    async fn rain_rate(&self) -> ASCOMResult<f64> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Sky brightness at the observatory, in Lux.
    #[http("skybrightness", method = Get)]
    async fn sky_brightness(&self) -> ASCOMResult<f64> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Sky quality at the observatory, in magnitudes per square arc second.
    #[http("skyquality", method = Get)]
    async fn sky_quality(&self) -> ASCOMResult<f64> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Sky temperature at the observatory, in degrees Celsius.
    #[http("skytemperature", method = Get)]
    async fn sky_temperature(&self) -> ASCOMResult<f64> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Seeing at the observatory, as star FWHM in arc seconds.
    #[http("starfwhm", method = Get)]
    async fn star_fwhm(&self) -> ASCOMResult<f64> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Temperature at the observatory, in degrees Celsius.
    #[http("temperature", method = Get)]
    async fn temperature(&self) -> ASCOMResult<f64> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Wind direction at the observatory, in degrees.
    #[http("winddirection", method = Get)]
    async fn wind_direction(&self) -> ASCOMResult<f64> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Peak 3 second wind gust at the observatory over the last 2 minutes, in m/s.
    #[http("windgust", method = Get)]
    async fn wind_gust(&self) -> ASCOMResult<f64> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Wind speed at the observatory, in m/s.
    #[http("windspeed", method = Get)]
    async fn wind_speed(&self) -> ASCOMResult<f64> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Forces the driver to immediately refresh sensor values.
    #[http("refresh", method = Put)]
    async fn refresh(&self) -> ASCOMResult<()> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Gets a description of the sensor with the name specified in the SensorName parameter.
    #[http("sensordescription", method = Get)]
    async fn sensor_description(
        &self,

        #[http("SensorName")] sensor_name: String,
    ) -> ASCOMResult<String> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Gets the time since the sensor specified in the SensorName parameter was last updated, in seconds.
    #[http("timesincelastupdate", method = Get)]
    async fn time_since_last_update(
        &self,

        #[http("SensorName")] sensor_name: String,
    ) -> ASCOMResult<f64> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Version of the IObservingConditions interface this driver implements.
    #[http("interfaceversion", method = Get)]
    async fn interface_version(&self) -> ASCOMResult<i32> {
        Ok(1_i32)
    }
}
