use super::Device;
use crate::{ASCOMError, ASCOMResult};
use macro_rules_attribute::apply;

/// Rotator Specific Methods.
///
/// Angles are in degrees, in the range [0, 360).
#[apply(rpc_trait)]
pub trait Rotator: Device + Send + Sync {
    /// Indicates whether the Rotator supports the Reverse method.
    #[http("canreverse", method = Get)]
    async fn can_reverse(&self) -> ASCOMResult<bool> {
        Ok(false)
    }

    /// True if the rotator is currently moving to a new position.
    #[http("ismoving", method = Get)]
    async fn is_moving(&self) -> ASCOMResult<bool>;

    /// Raw mechanical position of the rotator.
    #[http("mechanicalposition", method = Get)]
    async fn mechanical_position(&self) -> ASCOMResult<f64>;

    /// Current instantaneous sky position.
    #[http("position", method = Get)]
    async fn position(&self) -> ASCOMResult<f64>;

    /// Returns the rotator’s Reverse state.
    #[http("reverse", method = Get)]
    async fn reverse(&self) -> ASCOMResult<bool> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Sets the rotator’s Reverse state.
    #[http("reverse", method = Put)]
    async fn set_reverse(&self, #[http("Reverse")] reverse: bool) -> ASCOMResult<()> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// The minimum step size.
    #[http("stepsize", method = Get)]
    async fn step_size(&self) -> ASCOMResult<f64> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// The destination sky position of the current or last move.
    #[http("targetposition", method = Get)]
    async fn target_position(&self) -> ASCOMResult<f64>;

    /// Immediately stop any Rotator motion.
    #[http("halt", method = Put)]
    async fn halt(&self) -> ASCOMResult<()> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Causes the rotator to move Position degrees relative to the current Position value.
    #[http("move", method = Put)]
    async fn move_(&self, #[http("Position")] position: f64) -> ASCOMResult<()>;

    /// Causes the rotator to move the absolute position of Position degrees.
    #[http("moveabsolute", method = Put)]
    async fn move_absolute(&self, #[http("Position")] position: f64) -> ASCOMResult<()>;

    /// Causes the rotator to move the mechanical position of Position degrees.
    #[http("movemechanical", method = Put)]
    async fn move_mechanical(&self, #[http("Position")] position: f64) -> ASCOMResult<()> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Syncs the rotator to the specified position angle without moving it.
    #[http("sync", method = Put)]
    async fn sync(&self, #[http("Position")] position: f64) -> ASCOMResult<()> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Version of the IRotator interface this driver implements.
    #[http("interfaceversion", method = Get)]
    async fn interface_version(&self) -> ASCOMResult<i32> {
        Ok(3_i32)
    }
}
