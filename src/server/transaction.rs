use super::params::{ActionParams, Method, OpaqueParams, is_integer};
use serde::Serialize;
use std::sync::atomic::{AtomicU32, Ordering};

/// Monotonic server transaction counter.
///
/// Starts at 0; every call to [`Self::next`] returns the incremented value.
#[derive(Debug, Default)]
pub(crate) struct ServerTransactions(AtomicU32);

impl ServerTransactions {
    pub(crate) fn next(&self) -> u32 {
        self.0.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }
}

#[derive(Debug, Serialize, Clone, Copy)]
pub(crate) struct ResponseTransaction {
    #[serde(rename = "ClientTransactionID")]
    pub(crate) client_transaction_id: u32,

    #[serde(rename = "ServerTransactionID")]
    pub(crate) server_transaction_id: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RequestTransaction {
    pub(crate) client_id: u32,
    pub(crate) client_transaction_id: u32,
}

/// Rejected client IDs.
///
/// Keeps the client transaction ID if that one was valid so it can still be echoed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InvalidTransaction {
    pub(crate) client_transaction_id: u32,
}

fn parse_id(raw: &str) -> Option<u32> {
    if !is_integer(raw, false) {
        return None;
    }
    raw.parse().ok()
}

/// Absent IDs default to 0. `None` means the ID was present but malformed.
fn extract_id(
    params: &mut OpaqueParams,
    name: &'static str,
    alias: &'static str,
    validate_alias: bool,
) -> Option<u32> {
    let canonical = params.take(name);
    let aliased = params.take(alias);

    let (param, raw) = match (canonical, aliased) {
        (Some(raw), _) => (name, raw),
        (None, Some(raw)) if validate_alias => (alias, raw),
        (None, Some(raw)) => {
            tracing::debug!(param = alias, value = %raw, "Ignoring lowercase transaction parameter");
            return Some(0);
        }
        (None, None) => return Some(0),
    };

    let id = parse_id(&raw);
    if id.is_none() {
        tracing::warn!(param, value = %raw, "Invalid transaction parameter");
    }
    id
}

impl RequestTransaction {
    /// Pull `ClientID` and `ClientTransactionID` out of the request.
    ///
    /// Both are always extracted so that each failure gets logged.
    pub(crate) fn extract(
        params: &mut ActionParams,
        legacy_transaction_alias: bool,
    ) -> Result<Self, InvalidTransaction> {
        let validate_transaction_alias =
            !(legacy_transaction_alias && params.method() == Method::Put);
        let params = params.params_mut();

        let client_id = extract_id(params, "ClientID", "clientid", true);
        let client_transaction_id = extract_id(
            params,
            "ClientTransactionID",
            "clienttransactionid",
            validate_transaction_alias,
        );

        match (client_id, client_transaction_id) {
            (Some(client_id), Some(client_transaction_id)) => Ok(Self {
                client_id,
                client_transaction_id,
            }),
            (_, client_transaction_id) => Err(InvalidTransaction {
                client_transaction_id: client_transaction_id.unwrap_or(0),
            }),
        }
    }
}
