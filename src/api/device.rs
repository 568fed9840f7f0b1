use crate::server::{AllowEmpty, ServerTransactions};
use crate::{ASCOMError, ASCOMResult};
use macro_rules_attribute::apply;
use std::fmt::Debug;

/// Identity and bookkeeping shared by every device.
///
/// Each driver owns one and hands it out via [`Device::base`].
#[derive(Debug)]
pub struct DeviceBase {
    name: String,
    number: usize,
    description: String,
    unique_id: String,
    transactions: ServerTransactions,
}

impl DeviceBase {
    /// Create the identity for a new device.
    ///
    /// A fresh UUID v4 is generated as the device's unique ID.
    pub fn new(name: impl Into<String>, number: usize, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number,
            description: description.into(),
            unique_id: uuid::Uuid::new_v4().to_string(),
            transactions: ServerTransactions::default(),
        }
    }

    /// Device name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number distinguishing devices of the same type.
    pub const fn number(&self) -> usize {
        self.number
    }

    /// Device description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Globally unique ID of this device instance.
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub(crate) const fn transactions(&self) -> &ServerTransactions {
        &self.transactions
    }
}

/// ASCOM Methods Common To All Devices.
#[apply(rpc_trait)]
pub trait Device: Debug + Send + Sync {
    /// Invokes the specified device-specific custom action.
    ///
    /// Drivers without bespoke functionality return `ACTION_NOT_IMPLEMENTED`.
    #[http("action", method = Put)]
    async fn action(
        &self,

        #[http("Action")] action: String,

        #[http("Parameters", via = AllowEmpty)] parameters: String,
    ) -> ASCOMResult<String> {
        Err(ASCOMError::ACTION_NOT_IMPLEMENTED)
    }

    /// Transmits an arbitrary string to the device and does not wait for a response.
    #[http("commandblind", method = Put)]
    async fn command_blind(
        &self,

        #[http("Command")] command: String,

        #[http("Raw")] raw: bool,
    ) -> ASCOMResult<()> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Transmits an arbitrary string to the device and waits for a boolean response.
    #[http("commandbool", method = Put)]
    async fn command_bool(
        &self,

        #[http("Command")] command: String,

        #[http("Raw")] raw: bool,
    ) -> ASCOMResult<bool> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Transmits an arbitrary string to the device and waits for a string response.
    #[http("commandstring", method = Put)]
    async fn command_string(
        &self,

        #[http("Command")] command: String,

        #[http("Raw")] raw: bool,
    ) -> ASCOMResult<String> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Connect to the device asynchronously.
    #[http("connect", method = Put)]
    async fn connect(&self) -> ASCOMResult<()> {
        Ok(())
    }

    /// Retrieves the connected state of the device.
    #[http("connected", method = Get)]
    async fn connected(&self) -> ASCOMResult<bool> {
        Ok(true)
    }

    /// Sets the connected state of the device.
    ///
    /// The value is validated and accepted but not applied unless a driver overrides this.
    #[http("connected", method = Put)]
    async fn set_connected(&self, #[http("Connected")] connected: bool) -> ASCOMResult<()> {
        Ok(())
    }

    /// Returns true while the device is connecting or disconnecting.
    #[http("connecting", method = Get)]
    async fn connecting(&self) -> ASCOMResult<bool> {
        Ok(false)
    }

    /// The description of the device.
    #[http("description", method = Get)]
    async fn description(&self) -> ASCOMResult<String> {
        Ok(self.base().description().to_owned())
    }

    /// Operational state of the device.
    #[http("devicestate", method = Get)]
    async fn device_state(&self) -> ASCOMResult<Vec<DeviceStateItem>> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Disconnect from the device asynchronously.
    #[http("disconnect", method = Put)]
    async fn disconnect(&self) -> ASCOMResult<()> {
        Ok(())
    }

    /// The description of the driver.
    #[http("driverinfo", method = Get)]
    async fn driver_info(&self) -> ASCOMResult<String>;

    /// A string containing only the major and minor version of the driver.
    #[http("driverversion", method = Get)]
    async fn driver_version(&self) -> ASCOMResult<String> {
        Ok(env!("CARGO_PKG_VERSION").to_owned())
    }

    /// The name of the device.
    #[http("name", method = Get)]
    async fn name(&self) -> ASCOMResult<String> {
        Ok(self.static_name().to_owned())
    }

    /// Returns the list of action names supported by this driver.
    #[http("supportedactions", method = Get)]
    async fn supported_actions(&self) -> ASCOMResult<Vec<String>> {
        Ok(vec![])
    }
}

/// A DeviceState object representing an operational property of this device.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeviceStateItem {
    /// The property name.
    pub name: String,

    /// The corresponding value of the named operational property.
    pub value: serde_json::Value,
}
