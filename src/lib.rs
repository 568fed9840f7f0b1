/*!
ASCOM Alpaca server for observatory peripherals.

The crate implements the server side of the [ASCOM Alpaca](https://ascom-standards.org/api/)
protocol: device endpoints under `/api/v1/{device_type}/{device_number}/{method}`,
the management API and the UDP discovery responder.

Devices are plain Rust types implementing the [`api::Device`] trait plus one of the
device type traits ([`api::Focuser`], [`api::Dome`], [`api::Switch`] and so on). Every
trait method has a sensible default, so drivers only override what their hardware supports.
In-memory simulated drivers for each device type live in the [`sim`] module.

```no_run
use alpaca_observatory::Server;
use alpaca_observatory::sim::{SimFocuser, SimSwitch};

#[tokio::main]
async fn main() -> eyre::Result<std::convert::Infallible> {
    let mut server = Server::default();
    server.listen_addr.set_port(8000);

    server.devices.register(SimFocuser::new("Focuser", 0, 200, 10.0))?;
    server.devices.register(SimSwitch::new("Switch", 0, 4))?;

    server.bind().await?.start().await
}
```

## Cargo features

Each device type is gated behind a feature of the same name in snake case
(`cover_calibrator`, `dome`, `filter_wheel`, `focuser`, `observing_conditions`, `rotator`,
`safety_monitor`, `switch`). `all-devices` enables all of them and is on by default.
*/

pub mod api;
pub use api::Devices;

pub mod discovery;

mod errors;
pub use errors::{ASCOMError, ASCOMErrorCode, ASCOMResult};

mod server;
pub use server::{API_VERSION, BoundServer, Server};

pub mod sim;

#[cfg(test)]
mod test_utils;
