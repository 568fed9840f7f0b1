use super::Device;
use crate::{ASCOMError, ASCOMResult};
use macro_rules_attribute::apply;
use serde_repr::Serialize_repr;

/// CoverCalibrator Specific Methods.
#[apply(rpc_trait)]
pub trait CoverCalibrator: Device + Send + Sync {
    /// Returns the current calibrator brightness in the range 0 (completely off) to MaxBrightness (fully on).
    #[http("brightness", method = Get)]
    async fn brightness(&self) -> ASCOMResult<i32> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// True if the calibrator is not yet stable.
    #[http("calibratorchanging", method = Get)]
    async fn calibrator_changing(&self) -> ASCOMResult<bool> {
        Ok(self.calibrator_state().await? == CalibratorStatus::NotReady)
    }

    /// Returns the state of the calibration device, if present, otherwise returns "NotPresent".
    #[http("calibratorstate", method = Get)]
    async fn calibrator_state(&self) -> ASCOMResult<CalibratorStatus>;

    /// True if the cover is moving.
    #[http("covermoving", method = Get)]
    async fn cover_moving(&self) -> ASCOMResult<bool> {
        Ok(self.cover_state().await? == CoverStatus::Moving)
    }

    /// Returns the state of the device cover, if present, otherwise returns "NotPresent".
    #[http("coverstate", method = Get)]
    async fn cover_state(&self) -> ASCOMResult<CoverStatus>;

    /// The Brightness value that makes the calibrator deliver its maximum illumination.
    #[http("maxbrightness", method = Get)]
    async fn max_brightness(&self) -> ASCOMResult<i32> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Turns the calibrator off if the device has calibration capability.
    #[http("calibratoroff", method = Put)]
    async fn calibrator_off(&self) -> ASCOMResult<()> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Turns the calibrator on at the specified brightness if the device has calibration capability.
    #[http("calibratoron", method = Put)]
    async fn calibrator_on(&self, #[http("Brightness")] brightness: i32) -> ASCOMResult<()> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Initiates cover closing if a cover is present.
    #[http("closecover", method = Put)]
    async fn close_cover(&self) -> ASCOMResult<()> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Stops any cover movement that may be in progress.
    #[http("haltcover", method = Put)]
    async fn halt_cover(&self) -> ASCOMResult<()> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Initiates cover opening if a cover is present.
    #[http("opencover", method = Put)]
    async fn open_cover(&self) -> ASCOMResult<()> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Version of the ICoverCalibrator interface this driver implements.
    #[http("interfaceversion", method = Get)]
    async fn interface_version(&self) -> ASCOMResult<i32> {
        Ok(1_i32)
    }
}

/// Describes the state of a calibration device.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize_repr)]
#[repr(i32)]
pub enum CalibratorStatus {
    /// This device does not have a calibration capability.
    NotPresent = 0,

    /// The calibrator is off.
    Off = 1,

    /// The calibrator is stabilising or is not yet in the commanded state.
    NotReady = 2,

    /// The calibrator is ready for use.
    Ready = 3,

    /// The calibrator state is unknown.
    Unknown = 4,

    /// The calibrator encountered an error when changing state.
    Error = 5,
}

/// Describes the state of a telescope cover.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize_repr)]
#[repr(i32)]
pub enum CoverStatus {
    /// This device does not have a cover that can be closed independently.
    NotPresent = 0,

    /// The cover is closed.
    Closed = 1,

    /// The cover is moving to a new position.
    Moving = 2,

    /// The cover is open.
    Open = 3,

    /// The state of the cover is unknown.
    Unknown = 4,

    /// The device encountered an error when changing state.
    Error = 5,
}
