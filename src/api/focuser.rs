use super::Device;
use crate::{ASCOMError, ASCOMResult};
use macro_rules_attribute::apply;

/// Focuser Specific Methods.
#[apply(rpc_trait)]
pub trait Focuser: Device + Send + Sync {
    /// True if the focuser is capable of absolute position; that is, being commanded to a specific step location.
    #[http("absolute", method = Get)]
    async fn absolute(&self) -> ASCOMResult<bool>;

    /// True if the focuser is currently moving to a new position.
    #[http("ismoving", method = Get)]
    async fn is_moving(&self) -> ASCOMResult<bool>;

    /// Maximum number of steps allowed in one move operation.
    #[http("maxincrement", method = Get)]
    async fn max_increment(&self) -> ASCOMResult<i32>;

    /// Maximum step position permitted.
    #[http("maxstep", method = Get)]
    async fn max_step(&self) -> ASCOMResult<i32>;

    /// Current focuser position, in steps.
    #[http("position", method = Get)]
    async fn position(&self) -> ASCOMResult<i32> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Step size (microns) for the focuser.
    #[http("stepsize", method = Get)]
    async fn step_size(&self) -> ASCOMResult<f64> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Gets the state of temperature compensation mode (if available), else always False.
    #[http("tempcomp", method = Get)]
    async fn temp_comp(&self) -> ASCOMResult<bool> {
        Ok(false)
    }

    /// Sets the state of temperature compensation mode.
    #[http("tempcomp", method = Put)]
    async fn set_temp_comp(&self, #[http("TempComp")] temp_comp: bool) -> ASCOMResult<()> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// True if focuser has temperature compensation available.
    #[http("tempcompavailable", method = Get)]
    async fn temp_comp_available(&self) -> ASCOMResult<bool> {
        Ok(false)
    }

    /// Current ambient temperature as measured by the focuser.
    #[http("temperature", method = Get)]
    async fn temperature(&self) -> ASCOMResult<f64> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Immediately stop any focuser motion.
    #[http("halt", method = Put)]
    async fn halt(&self) -> ASCOMResult<()> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Starts moving the focuser to the specified position.
    #[http("move", method = Put)]
    async fn move_(&self, #[http("Position")] position: i32) -> ASCOMResult<()>;

    /// Version of the IFocuser interface this driver implements.
    #[http("interfaceversion", method = Get)]
    async fn interface_version(&self) -> ASCOMResult<i32> {
        Ok(2_i32)
    }
}
