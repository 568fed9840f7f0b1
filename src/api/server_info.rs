use super::DeviceType;
use serde::Serialize;
use std::borrow::Cow;

/// Entry of the `configureddevices` management list.
#[derive(Debug, Serialize)]
pub(crate) struct ConfiguredDevice {
    #[serde(rename = "DeviceName")]
    pub(crate) name: String,
    #[serde(rename = "DeviceType")]
    pub(crate) ty: DeviceType,
    #[serde(rename = "DeviceNumber")]
    pub(crate) number: usize,
    #[serde(rename = "UniqueID")]
    pub(crate) unique_id: String,
}

/// General information about the server.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServerInfo {
    /// Server name.
    pub server_name: Cow<'static, str>,
    /// Manufacturer name.
    pub manufacturer: Cow<'static, str>,
    /// Manufacturer version.
    pub manufacturer_version: Cow<'static, str>,
    /// Server location.
    pub location: Cow<'static, str>,
}

#[doc(hidden)]
pub const fn or_unknown(value: &'static str) -> &'static str {
    if value.is_empty() { "Unknown" } else { value }
}

// Using macro namespacing hack from https://users.rust-lang.org/t/how-to-namespace-a-macro-rules-macro-within-a-module-or-macro-export-it-without-polluting-the-top-level-namespace/63779/5?u=rreverser.
#[doc(hidden)]
#[macro_export]
macro_rules! CargoServerInfo_5d1c0f7e_3a8b_4f62_9c1e_7b2a4e6d8f10 {
    () => {
        const {
            use std::borrow::Cow;

            $crate::api::ServerInfo {
                server_name: Cow::Borrowed(env!("CARGO_PKG_NAME")),
                manufacturer: Cow::Borrowed($crate::api::or_unknown(env!("CARGO_PKG_AUTHORS"))),
                manufacturer_version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
                // Technically this field should be a physical location,
                // but repository homepage seems better than nothing.
                location: Cow::Borrowed($crate::api::or_unknown(env!("CARGO_PKG_HOMEPAGE"))),
            }
        }
    };
}

/// A helper that constructs a [`ServerInfo`](crate::api::ServerInfo) instance populated with metadata from `Cargo.toml`.
#[doc(inline)]
pub use CargoServerInfo_5d1c0f7e_3a8b_4f62_9c1e_7b2a4e6d8f10 as CargoServerInfo;
