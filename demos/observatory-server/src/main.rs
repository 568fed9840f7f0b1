//! Alpaca server exposing one simulated device of every supported type.

use alpaca_observatory::Server;
use alpaca_observatory::sim::{
    SimCoverCalibrator, SimDome, SimFilterWheel, SimFocuser, SimObservingConditions, SimRotator,
    SimSafetyMonitor, SimSwitch,
};
use std::net::{Ipv6Addr, SocketAddr};

#[tokio::main]
async fn main() -> eyre::Result<std::convert::Infallible> {
    tracing_subscriber::fmt::init();

    let mut server = Server {
        listen_addr: SocketAddr::from((Ipv6Addr::UNSPECIFIED, 80)),
        ..Default::default()
    };

    let devices = &mut server.devices;
    for result in [
        devices.register(SimFocuser::new("Focuser", 0, 200, 10.0)),
        devices.register(SimSafetyMonitor::new("Safety monitor", 0)),
        devices.register(SimDome::new("Dome", 0, true, true)),
        devices.register(SimSwitch::new("Switch", 0, 4)),
        devices.register(SimFilterWheel::new("Filter wheel", 0, 8)),
        devices.register(SimRotator::new("Rotator", 0, 1.0)),
        devices.register(SimCoverCalibrator::new("Flat panel", 0, 255)),
        devices.register(SimObservingConditions::new("Weather station", 0)),
    ] {
        if let Err(err) = result {
            tracing::error!(%err, "Skipping device");
        }
    }

    let server = server.bind().await.inspect_err(|err| {
        tracing::error!(%err, "Failed to bind the Alpaca server");
    })?;

    tracing::info!(listen_addr = %server.listen_addr(), "Alpaca server is ready");

    server.start().await
}
