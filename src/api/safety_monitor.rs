use super::Device;
use crate::ASCOMResult;
use macro_rules_attribute::apply;

/// SafetyMonitor Specific Methods.
#[apply(rpc_trait)]
pub trait SafetyMonitor: Device + Send + Sync {
    /// Indicates whether the monitored state is safe for use.
    #[http("issafe", method = Get)]
    async fn is_safe(&self) -> ASCOMResult<bool>;

    /// Version of the ISafetyMonitor interface this driver implements.
    #[http("interfaceversion", method = Get)]
    async fn interface_version(&self) -> ASCOMResult<i32> {
        Ok(3_i32)
    }
}
