use super::Device;
use crate::{ASCOMError, ASCOMResult};
use macro_rules_attribute::apply;

/// Switch Specific Methods.
///
/// Switches are numbered from 0 to `max_switch - 1`. The `Id` parameter is passed to the
/// driver as is; range checks are up to the implementation.
#[apply(rpc_trait)]
pub trait Switch: Device + Send + Sync {
    /// The number of switch devices managed by this driver.
    #[http("maxswitch", method = Get)]
    async fn max_switch(&self) -> ASCOMResult<i32>;

    /// True if the switch can operate asynchronously.
    #[http("canasync", method = Get)]
    async fn can_async(&self, #[http("Id", alias = "iD")] id: i32) -> ASCOMResult<bool> {
        Ok(false)
    }

    /// Reports if the specified switch device can be written to.
    #[http("canwrite", method = Get)]
    async fn can_write(&self, #[http("Id", alias = "iD")] id: i32) -> ASCOMResult<bool>;

    /// Return the state of switch device id as a boolean.
    #[http("getswitch", method = Get)]
    async fn get_switch(&self, #[http("Id", alias = "iD")] id: i32) -> ASCOMResult<bool>;

    /// Gets the description of the specified switch device.
    #[http("getswitchdescription", method = Get)]
    async fn get_switch_description(
        &self,
        #[http("Id", alias = "iD")] id: i32,
    ) -> ASCOMResult<String>;

    /// Gets the name of the specified switch device.
    #[http("getswitchname", method = Get)]
    async fn get_switch_name(&self, #[http("Id", alias = "iD")] id: i32) -> ASCOMResult<String>;

    /// Gets the value of the specified switch device as a double.
    #[http("getswitchvalue", method = Get)]
    async fn get_switch_value(&self, #[http("Id", alias = "iD")] id: i32) -> ASCOMResult<f64>;

    /// Gets the minimum value of the specified switch device as a double.
    #[http("minswitchvalue", method = Get)]
    async fn min_switch_value(&self, #[http("Id", alias = "iD")] id: i32) -> ASCOMResult<f64>;

    /// Gets the maximum value of the specified switch device as a double.
    #[http("maxswitchvalue", method = Get)]
    async fn max_switch_value(&self, #[http("Id", alias = "iD")] id: i32) -> ASCOMResult<f64>;

    /// Asynchronously sets a switch controller device to the specified state, true or false.
    #[http("setasync", method = Put)]
    async fn set_async(
        &self,
        #[http("Id", alias = "iD")] id: i32,
        #[http("State")] state: bool,
    ) -> ASCOMResult<()> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Asynchronously sets a switch device value to the specified value.
    #[http("setasyncvalue", method = Put)]
    async fn set_async_value(
        &self,
        #[http("Id", alias = "iD")] id: i32,
        #[http("Value")] value: f64,
    ) -> ASCOMResult<()> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Sets a switch controller device to the specified state, true or false.
    #[http("setswitch", method = Put)]
    async fn set_switch(
        &self,
        #[http("Id", alias = "iD")] id: i32,
        #[http("State")] state: bool,
    ) -> ASCOMResult<()>;

    /// Sets a switch device name to the specified value.
    #[http("setswitchname", method = Put)]
    async fn set_switch_name(
        &self,
        #[http("Id", alias = "iD")] id: i32,
        #[http("Name")] name: String,
    ) -> ASCOMResult<()>;

    /// Sets a switch device value to the specified value.
    #[http("setswitchvalue", method = Put)]
    async fn set_switch_value(
        &self,
        #[http("Id", alias = "iD")] id: i32,
        #[http("Value")] value: f64,
    ) -> ASCOMResult<()>;

    /// True if the last asynchronous state change has completed.
    #[http("statechangecomplete", method = Get)]
    async fn state_change_complete(
        &self,
        #[http("Id", alias = "iD")] id: i32,
    ) -> ASCOMResult<bool> {
        Ok(true)
    }

    /// Returns the step size that this device supports.
    #[http("switchstep", method = Get)]
    async fn switch_step(&self, #[http("Id", alias = "iD")] id: i32) -> ASCOMResult<f64>;

    /// Version of the ISwitch interface this driver implements.
    #[http("interfaceversion", method = Get)]
    async fn interface_version(&self) -> ASCOMResult<i32> {
        Ok(2_i32)
    }
}
