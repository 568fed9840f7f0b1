macro_rules! rpc_trait {
    (@extras Device trait) => {
        /// Identity and transaction counter of this device.
        fn base(&self) -> &DeviceBase;

        /// Static device name for the configured list.
        fn static_name(&self) -> &str {
            self.base().name()
        }

        /// Unique ID of this device.
        fn unique_id(&self) -> &str {
            self.base().unique_id()
        }

        /// Number of this device within its device type.
        fn device_number(&self) -> usize {
            self.base().number()
        }
    };

    (@extras Device mod) => {};
    (@extras $trait_name:ident mod) => {
        impl super::RetrieavableDevice for dyn $trait_name {
            const TYPE: super::DeviceType = super::DeviceType::$trait_name;

            fn get_storage(storage: &super::Devices) -> &[std::sync::Arc<Self>] {
                &storage.$trait_name
            }

            fn get_storage_mut(storage: &mut super::Devices) -> &mut Vec<std::sync::Arc<Self>> {
                &mut storage.$trait_name
            }

            fn to_typed(device: std::sync::Arc<Self>) -> super::TypedDevice {
                super::TypedDevice::$trait_name(device)
            }
        }

        impl super::RegistrableDevice<dyn $trait_name> for std::sync::Arc<dyn $trait_name> {
            fn add_to(self, storage: &mut super::Devices) -> eyre::Result<()> {
                storage.insert::<dyn $trait_name>(self)
            }
        }

        impl<T: 'static + $trait_name> super::RegistrableDevice<dyn $trait_name> for T {
            fn add_to(self, storage: &mut super::Devices) -> eyre::Result<()> {
                storage.insert::<dyn $trait_name>(std::sync::Arc::new(self))
            }
        }
    };

    // Don't add any extra code for other traits in other locations.
    (@extras $trait_name:ident $loc:ident) => {};

    (
        $(# $attr:tt)*
        $pub:vis trait $trait_name:ident: $first_parent:ident $(+ $trait_parents:ident)* {
            $(
                $(#[doc = $doc:literal])*
                #[http($method_path:literal, method = $http_method:ident)]
                $(# $method_attr:tt)*
                async fn $method_name:ident(
                    & $self:ident $(, #[http($param_query:literal $(, alias = $param_alias:literal)? $(, via = $param_via:ty)?)] $param:ident: $param_ty:ty)* $(,)?
                ) -> ASCOMResult<$return_type:ty> $default_body:tt
            )*
        }
    ) => {
        /// Paths and HTTP methods of every operation in this interface.
        pub(super) const ROUTES: &[(&str, $crate::server::Method)] = &[
            $(($method_path, $crate::server::Method::$http_method),)*
        ];

        #[expect(non_camel_case_types)]
        pub(super) enum Action {
            $(
                $method_name {
                    $(
                        $param: $param_ty,
                    )*
                },
            )*
        }

        #[derive(serde::Serialize)]
        #[serde(untagged)]
        #[expect(non_camel_case_types)]
        pub(super) enum Response {
            $(
                $method_name($return_type),
            )*
        }

        impl Action {
            /// Parse the action and its parameters.
            ///
            /// Returns `None` if this interface has no such action for the request method.
            pub(super) fn from_parts(action: &str, params: &mut $crate::server::ActionParams) -> $crate::server::Result<Option<Self>> {
                Ok(Some(match (action, params) {
                    $(
                        ($method_path, $crate::server::ActionParams::$http_method(params)) => {
                            #[expect(unused)]
                            let mut params = params;
                            $(
                                let $param =
                                    params.extract($param_query, &[$($param_alias)?])
                                    $(.map(<$param_via>::into))?
                                    ?;
                            )*

                            Self::$method_name { $($param),* }
                        }
                    )*
                    _ => return Ok(None),
                }))
            }

            pub(super) async fn handle(self, device: &dyn $trait_name) -> ASCOMResult<Response> {
                match self {
                    $(
                        Self::$method_name { $($param),* } => {
                            device.$method_name($($param),*).await.map(Response::$method_name)
                        }
                    )*
                }
            }
        }

        $(# $attr)*
        #[async_trait::async_trait]
        #[allow(unused_variables)]
        $pub trait $trait_name: $first_parent $(+ $trait_parents)* {
            $(
                $(#[doc = $doc])*
                ///
                /// Definition before the `#[async_trait]` expansion:
                ///
                /// ```ignore
                #[doc = concat!("async fn ", stringify!($method_name), "(&self", $(", ", stringify!($param), ": ", stringify!($param_ty),)* ") -> ASCOMResult<", stringify!($return_type), ">")]
                /// # { unimplemented!() }
                /// ```
                $(# $method_attr)*
                async fn $method_name(
                    & $self $(, $param: $param_ty)*
                ) -> ASCOMResult<$return_type> $default_body
            )*

            rpc_trait!(@extras $trait_name trait);
        }

        rpc_trait!(@extras $trait_name mod);
    };
}

macro_rules! rpc_mod {
    ($(# $cfg:tt $trait_name:ident = $path:literal,)*) => (paste::paste! {
        $(
            # $cfg
            #[doc = "Types related to [`" $trait_name "`] devices."]
            pub mod [<$trait_name:snake>];

            # $cfg
            pub use [<$trait_name:snake>]::$trait_name;
        )*

        /// Device type as it appears in Alpaca URLs and in the configured devices list.
        #[derive(PartialOrd, Ord, PartialEq, Eq, Hash, Clone, Copy, Debug, derive_more::Display, serde::Serialize)]
        #[expect(missing_docs)] // self-explanatory variants
        pub enum DeviceType {
            $(
                # $cfg
                #[display($path)]
                #[serde(rename = $path)]
                $trait_name,
            )*
        }

        impl DeviceType {
            /// Parse a device type from its URL path segment.
            pub fn from_path(path: &str) -> Option<Self> {
                match path {
                    $(
                        # $cfg
                        $path => Some(Self::$trait_name),
                    )*
                    _ => None,
                }
            }

            fn routes(self) -> impl Iterator<Item = &'static (&'static str, $crate::server::Method)> {
                let kind_routes = match self {
                    $(
                        # $cfg
                        Self::$trait_name => [<$trait_name:snake>]::ROUTES,
                    )*
                };
                kind_routes.iter().chain(device::ROUTES)
            }

            /// Check that the action exists for this device type and accepts the method.
            pub(crate) fn check_route(self, action: &str, method: $crate::server::Method) -> $crate::server::Result<()> {
                let mut exists = false;
                for &(path, route_method) in self.routes() {
                    if path == action {
                        if route_method == method {
                            return Ok(());
                        }
                        exists = true;
                    }
                }
                Err(if exists {
                    $crate::server::Error::MethodNotAllowed {
                        device_type: self,
                        action: action.to_owned(),
                        method,
                    }
                } else {
                    $crate::server::Error::UnknownAction {
                        device_type: self,
                        action: action.to_owned(),
                    }
                })
            }
        }

        /// A tagged enum wrapper for a type-erased instance of a device.
        #[derive(Clone, Debug)]
        #[expect(missing_docs)] // self-explanatory variants
        pub enum TypedDevice {
            $(
                # $cfg
                $trait_name(std::sync::Arc<dyn $trait_name>),
            )*
        }

        impl TypedDevice {
            /// Type of the wrapped device.
            pub const fn device_type(&self) -> DeviceType {
                match self {
                    $(
                        # $cfg
                        Self::$trait_name(_) => DeviceType::$trait_name,
                    )*
                }
            }

            /// Access the common device interface.
            pub fn as_device(&self) -> &dyn Device {
                // With trait upcasting, we can get any device as dyn Device directly
                match self {
                    $(
                        # $cfg
                        Self::$trait_name(device) => &**device,
                    )*
                }
            }

            pub(crate) fn to_configured_device(&self) -> ConfiguredDevice {
                let device = self.as_device();
                ConfiguredDevice {
                    name: device.static_name().to_owned(),
                    ty: self.device_type(),
                    number: device.device_number(),
                    unique_id: device.unique_id().to_owned(),
                }
            }

            /// Parse the action, invoke it on the device and serialize the result.
            ///
            /// Type-specific actions take priority over the common device ones.
            pub(crate) async fn handle_action(&self, action: &str, mut params: $crate::server::ActionParams) -> $crate::server::Result<serde_json::Value> {
                match self {
                    $(
                        # $cfg
                        Self::$trait_name(device) => {
                            if let Some(action) = [<$trait_name:snake>]::Action::from_parts(action, &mut params)? {
                                params.finish_extraction();
                                let response = action.handle(&**device).await?;
                                return Ok(serde_json::to_value(response)?);
                            }
                        }
                    )*
                }

                let action = device::Action::from_parts(action, &mut params)?
                    .ok_or_else(|| $crate::server::Error::UnknownAction {
                        device_type: self.device_type(),
                        action: action.to_owned(),
                    })?;
                params.finish_extraction();
                let response = action.handle(self.as_device()).await?;
                Ok(serde_json::to_value(response)?)
            }
        }

        /// Devices collection.
        ///
        /// This data structure owns devices of arbitrary types (focusers, domes, etc.)
        /// and allows to register and access them by their type and device number.
        #[expect(non_snake_case)]
        #[derive(Clone)]
        pub struct Devices {
            $(
                # $cfg
                $trait_name: Vec<std::sync::Arc<dyn $trait_name>>,
            )*
            /// All devices across types, in registration order.
            registered: Vec<TypedDevice>,
        }

        impl std::fmt::Debug for Devices {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let mut f = f.debug_struct("Devices");
                $(
                    # $cfg
                    if !self.$trait_name.is_empty() {
                        _ = f.field(stringify!($trait_name), &self.$trait_name);
                    }
                )*
                f.finish()
            }
        }

        impl Devices {
            /// Create an empty collection of devices.
            ///
            /// Same as [`Default::default`] but works in const contexts.
            pub const fn default() -> Self {
                Self {
                    $(
                        # $cfg
                        $trait_name: Vec::new(),
                    )*
                    registered: Vec::new(),
                }
            }

            /// Iterate over all registered devices in registration order.
            pub fn iter_all(&self) -> impl '_ + Iterator<Item = TypedDevice> {
                self.registered.iter().cloned()
            }

            /// Find a device by its type and device number.
            pub fn get_typed(&self, device_type: DeviceType, device_number: usize) -> Option<TypedDevice> {
                match device_type {
                    $(
                        # $cfg
                        DeviceType::$trait_name => self
                            .get::<dyn $trait_name>(device_number)
                            .map(TypedDevice::$trait_name),
                    )*
                }
            }

            /// Remove the device matching the given name, type and number.
            ///
            /// Returns whether anything was removed.
            #[tracing::instrument(level = "debug", skip(self))]
            pub fn unregister(&mut self, name: &str, device_type: DeviceType, device_number: usize) -> bool {
                match device_type {
                    $(
                        # $cfg
                        DeviceType::$trait_name => self.remove::<dyn $trait_name>(name, device_number),
                    )*
                }
            }
        }
    });
}
