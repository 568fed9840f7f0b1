/*!
ASCOM Alpaca Device API v1

Device interfaces exposed by the server, one trait per device type.

Every trait method maps to an Alpaca endpoint of the form
**`/api/v1/{device_type}/{device_number}/{method}`**, e.g. a focuser "Position" method is
served at `/api/v1/focuser/0/position`.

URLs are case sensitive and all elements must be in lower case. Parameter names are matched
exactly, using the casing documented for each method (`Position`, `Id`, ...), with a few
documented aliases.

For GET operations, parameters should be placed in the URL query string and for PUT
operations they should be placed in the form-encoded body of the message.

## HTTP Status Codes and ASCOM Error codes
A `200` status means that the request was passed to the device. It doesn't necessarily mean
that the operation succeeded: driver errors are reported via the `ErrorNumber` and
`ErrorMessage` fields of the response.

A `400` status means that the client IDs or a required parameter were missing or malformed.
A `404` status means that the device type, device number or method is unknown, and `405`
means that the method doesn't accept the HTTP verb used.
*/

#![expect(clippy::doc_markdown)]

mod server_info;
pub use server_info::*;

use crate::server::Method;
use std::fmt::Debug;
use std::sync::Arc;

#[macro_use]
mod macros;

/// Types related to the general [`Device`] trait.
pub mod device;
pub use device::{Device, DeviceBase};

rpc_mod! {
    #[cfg(feature = "cover_calibrator")]
    CoverCalibrator = "covercalibrator",

    #[cfg(feature = "dome")]
    Dome = "dome",

    #[cfg(feature = "filter_wheel")]
    FilterWheel = "filterwheel",

    #[cfg(feature = "focuser")]
    Focuser = "focuser",

    #[cfg(feature = "observing_conditions")]
    ObservingConditions = "observingconditions",

    #[cfg(feature = "rotator")]
    Rotator = "rotator",

    #[cfg(feature = "safety_monitor")]
    SafetyMonitor = "safetymonitor",

    #[cfg(feature = "switch")]
    Switch = "switch",
}

pub(crate) trait RetrieavableDevice: 'static + Device {
    const TYPE: DeviceType;

    fn get_storage(storage: &Devices) -> &[Arc<Self>];

    fn get_storage_mut(storage: &mut Devices) -> &mut Vec<Arc<Self>>;

    fn to_typed(device: Arc<Self>) -> TypedDevice;
}

/// A trait for devices that can be registered in a `Devices` storage.
///
/// DynTrait is unused here, it's only necessary to cheat the type system
/// and allow "overlapping" blanket impls of RegistrableDevice for different
/// kinds of devices so that `devices.register(device)` "just works".
pub(crate) trait RegistrableDevice<DynTrait: ?Sized>: Debug {
    fn add_to(self, storage: &mut Devices) -> eyre::Result<()>;
}

impl Default for Devices {
    fn default() -> Self {
        // Invoke the inherent const implementation.
        Self::default()
    }
}

// we use internal interfaces to get type inference magic to work with polymorphic device types
#[expect(private_bounds)]
impl Devices {
    /// Register a device in the storage.
    ///
    /// `device` can be an instance of any of the device type traits (`Focuser`, `Dome`, etc.)
    /// or an `Arc<dyn Trait>` handle to one.
    ///
    /// Fails if a device of the same type is already registered under the same number.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn register<DynTrait: ?Sized>(
        &mut self,
        device: impl RegistrableDevice<DynTrait>,
    ) -> eyre::Result<()> {
        device.add_to(self)
    }

    fn insert<DynTrait: ?Sized + RetrieavableDevice>(
        &mut self,
        device: Arc<DynTrait>,
    ) -> eyre::Result<()> {
        let ty = DynTrait::TYPE;
        let device_number = device.device_number();
        let storage = DynTrait::get_storage_mut(self);
        if let Some(existing) = storage
            .iter()
            .find(|existing| existing.device_number() == device_number)
        {
            tracing::error!(
                %ty,
                device_number,
                name = device.static_name(),
                existing = existing.static_name(),
                "Device number is already taken"
            );
            eyre::bail!(
                "{ty}[{device_number}] is already registered as {:?}",
                existing.static_name()
            );
        }
        storage.push(Arc::clone(&device));
        self.registered.push(DynTrait::to_typed(device));
        Ok(())
    }

    fn remove<DynTrait: ?Sized + RetrieavableDevice>(
        &mut self,
        name: &str,
        device_number: usize,
    ) -> bool {
        let storage = DynTrait::get_storage_mut(self);
        let len_before = storage.len();
        storage.retain(|device| {
            !(device.static_name() == name && device.device_number() == device_number)
        });
        if storage.len() == len_before {
            return false;
        }
        self.registered.retain(|device| {
            let device_type = device.device_type();
            let device = device.as_device();
            !(device_type == DynTrait::TYPE
                && device.static_name() == name
                && device.device_number() == device_number)
        });
        true
    }

    /// Iterate over all devices of a given type.
    pub fn iter<DynTrait: ?Sized + RetrieavableDevice>(
        &self,
    ) -> impl '_ + ExactSizeIterator<Item = Arc<DynTrait>> {
        DynTrait::get_storage(self).iter().map(Arc::clone)
    }

    /// Retrieve a device by its type trait and device number.
    ///
    /// Example: `devices.get::<dyn Focuser>(0)` returns the focuser registered as number 0.
    pub fn get<DynTrait: ?Sized + RetrieavableDevice>(
        &self,
        device_number: usize,
    ) -> Option<Arc<DynTrait>> {
        DynTrait::get_storage(self)
            .iter()
            .find(|device| device.device_number() == device_number)
            .cloned()
    }

    /// Resolve the URL segments of a device request to a registered device.
    pub(crate) fn resolve(
        &self,
        device_type: &str,
        device_number: &str,
        action: &str,
        method: Method,
    ) -> crate::server::Result<TypedDevice> {
        let ty = DeviceType::from_path(device_type)
            .ok_or_else(|| crate::server::Error::UnknownDeviceType(device_type.to_owned()))?;
        let device = crate::server::is_integer(device_number, false)
            .then(|| device_number.parse().ok())
            .flatten()
            .and_then(|number| self.get_typed(ty, number))
            .ok_or_else(|| crate::server::Error::UnknownDeviceNumber {
                ty,
                device_number: device_number.to_owned(),
            })?;
        ty.check_route(action, method)?;
        Ok(device)
    }
}
