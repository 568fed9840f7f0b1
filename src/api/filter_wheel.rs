use super::Device;
use crate::{ASCOMError, ASCOMResult};
use macro_rules_attribute::apply;

/// FilterWheel Specific Methods.
#[apply(rpc_trait)]
pub trait FilterWheel: Device + Send + Sync {
    /// Focus offset of each filter, in focuser steps.
    #[http("focusoffsets", method = Get)]
    async fn focus_offsets(&self) -> ASCOMResult<Vec<i32>> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// The names of the filters.
    #[http("names", method = Get)]
    async fn names(&self) -> ASCOMResult<Vec<String>> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Returns the current filter wheel position, or -1 while moving.
    #[http("position", method = Get)]
    async fn position(&self) -> ASCOMResult<i32> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Starts moving the wheel to the given slot.
    #[http("position", method = Put)]
    async fn set_position(&self, #[http("Position")] position: i32) -> ASCOMResult<()> {
        Err(ASCOMError::NOT_IMPLEMENTED)
    }

    /// Version of the IFilterWheel interface this driver implements.
    #[http("interfaceversion", method = Get)]
    async fn interface_version(&self) -> ASCOMResult<i32> {
        Ok(2_i32)
    }
}
