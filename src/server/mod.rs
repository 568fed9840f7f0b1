mod discovery;
pub use discovery::{BoundServer as BoundDiscoveryServer, Server as DiscoveryServer};

mod transaction;
pub(crate) use transaction::*;

mod params;
pub(crate) use params::{ActionParams, AllowEmpty, Method, is_integer};

mod response;

mod error;
pub(crate) use error::{Error, Result};

#[cfg(all(test, feature = "focuser", feature = "switch"))]
mod tests;

use crate::Devices;
use crate::api::{CargoServerInfo, ServerInfo};
use crate::discovery::DEFAULT_DISCOVERY_PORT;
use axum::Router;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{MethodRouter, any, get};
use serde::Serialize;
use std::convert::Infallible;
use std::net::{Ipv6Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::Instrument;
use tracing::field::Empty;

/// Version of the Alpaca API served under `/api/v1`.
pub const API_VERSION: u32 = 1;

/// The Alpaca server.
#[derive(Debug)]
pub struct Server {
    /// Registered devices.
    pub devices: Devices,
    /// General server information.
    pub info: ServerInfo,
    /// Address for the server to listen on.
    pub listen_addr: SocketAddr,
    /// Port for the discovery server to listen on.
    pub discovery_port: u16,
    /// Accept PUT requests that carry only a lowercase `clienttransactionid` without
    /// validating it, reporting the client transaction ID as 0.
    ///
    /// Off by default, in which case the lowercase alias is validated for every verb.
    pub legacy_transaction_alias: bool,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            devices: Devices::default(),
            info: CargoServerInfo!(),
            listen_addr: SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)),
            discovery_port: DEFAULT_DISCOVERY_PORT,
            legacy_transaction_alias: false,
        }
    }
}

/// Everything the request handlers need, shared between all of them.
#[derive(Debug)]
struct ServerState {
    devices: Devices,
    info: ServerInfo,
    management_transactions: ServerTransactions,
    legacy_transaction_alias: bool,
}

impl ServerState {
    /// Answer a management request.
    ///
    /// Unlike device requests, rejected client IDs don't consume a server transaction ID.
    fn management_response<T: Serialize>(
        &self,
        path: &'static str,
        mut params: ActionParams,
        make_value: impl FnOnce(&Self) -> T,
    ) -> Response {
        let span = tracing::error_span!(
            "Alpaca transaction",
            path,
            client_id = Empty,
            client_transaction_id = Empty,
            server_transaction_id = Empty,
        );
        let _enter = span.enter();

        let request_transaction =
            match RequestTransaction::extract(&mut params, self.legacy_transaction_alias) {
                Ok(transaction) => transaction,
                Err(invalid) => {
                    return response::into_axum(
                        ResponseTransaction {
                            client_transaction_id: invalid.client_transaction_id,
                            server_transaction_id: 0,
                        },
                        Err(Error::InvalidTransaction),
                    );
                }
            };
        params.finish_extraction();

        let value = serde_json::to_value(make_value(self)).map_err(Error::from);
        let response_transaction = ResponseTransaction {
            client_transaction_id: request_transaction.client_transaction_id,
            server_transaction_id: self.management_transactions.next(),
        };
        _ = span
            .record("client_id", request_transaction.client_id)
            .record(
                "client_transaction_id",
                request_transaction.client_transaction_id,
            )
            .record(
                "server_transaction_id",
                response_transaction.server_transaction_id,
            );

        response::into_axum(response_transaction, value)
    }
}

async fn device_request(
    State(state): State<Arc<ServerState>>,
    Path((device_type, device_number, action)): Path<(String, String, String)>,
    mut params: ActionParams,
) -> Response {
    let device = match state
        .devices
        .resolve(&device_type, &device_number, &action, params.method())
    {
        Ok(device) => device,
        Err(err) => return err.into_response(),
    };

    let span = tracing::error_span!(
        "Alpaca transaction",
        path = %format_args!("/api/v{API_VERSION}/{device_type}/{device_number}/{action}"),
        method = %params.method(),
        client_id = Empty,
        client_transaction_id = Empty,
        server_transaction_id = Empty,
    );

    async move {
        let (client_transaction_id, result) =
            match RequestTransaction::extract(&mut params, state.legacy_transaction_alias) {
                Ok(transaction) => {
                    _ = tracing::Span::current()
                        .record("client_id", transaction.client_id)
                        .record("client_transaction_id", transaction.client_transaction_id);
                    (
                        transaction.client_transaction_id,
                        device.handle_action(&action, params).await,
                    )
                }
                Err(invalid) => (invalid.client_transaction_id, Err(Error::InvalidTransaction)),
            };

        // Every response that got past routing consumes a transaction ID, errors included.
        let server_transaction_id = device.as_device().base().transactions().next();
        _ = tracing::Span::current().record("server_transaction_id", server_transaction_id);

        response::into_axum(
            ResponseTransaction {
                client_transaction_id,
                server_transaction_id,
            },
            result,
        )
    }
    .instrument(span)
    .await
}

fn management_route(
    path: &'static str,
    make_value: impl 'static + Clone + Send + Sync + Fn(&ServerState) -> serde_json::Value,
) -> MethodRouter<Arc<ServerState>> {
    get(
        move |State(state): State<Arc<ServerState>>, params: ActionParams| {
            let make_value = make_value.clone();
            async move { state.management_response(path, params, make_value) }
        },
    )
    .fallback(|| async { params::method_not_allowed() })
}

impl Server {
    /// Binds the Alpaca and discovery servers to local ports.
    ///
    /// The discovery server advertises the port the Alpaca server actually got, so it's bound
    /// only after the Alpaca server is bound successfully.
    #[tracing::instrument(level = "debug", skip(self), fields(listen_addr = %self.listen_addr))]
    pub async fn bind(self) -> eyre::Result<BoundServer> {
        tracing::debug!("Binding Alpaca server");

        let listener = TcpListener::bind(self.listen_addr).await?;

        // The address can differ e.g. when using port 0 (auto-assigned).
        let listen_addr = listener.local_addr()?;

        tracing::info!(%listen_addr, "Bound Alpaca server");

        let mut discovery = DiscoveryServer::for_alpaca_server_at(listen_addr);
        discovery.listen_addr.set_port(self.discovery_port);
        let discovery = discovery.bind()?;

        Ok(BoundServer {
            listener,
            listen_addr,
            router: self.into_router(),
            discovery,
        })
    }

    fn into_router(self) -> Router {
        let state = Arc::new(ServerState {
            devices: self.devices,
            info: self.info,
            management_transactions: ServerTransactions::default(),
            legacy_transaction_alias: self.legacy_transaction_alias,
        });

        Router::new()
            .route(
                "/management/apiversions",
                management_route("/management/apiversions", |_state| {
                    serde_json::json!([API_VERSION])
                }),
            )
            .route(
                "/management/v1/configureddevices",
                management_route("/management/v1/configureddevices", |state| {
                    state
                        .devices
                        .iter_all()
                        .map(|device| device.to_configured_device())
                        .map(|device| serde_json::json!(device))
                        .collect()
                }),
            )
            .route(
                "/management/v1/description",
                management_route("/management/v1/description", |state| {
                    serde_json::json!(state.info)
                }),
            )
            .route(
                "/api/v1/{device_type}/{device_number}/{action}",
                any(device_request),
            )
            .with_state(state)
    }
}

/// Alpaca and discovery servers bound to their ports but not yet serving requests.
#[derive(Debug)]
pub struct BoundServer {
    listener: TcpListener,
    listen_addr: SocketAddr,
    router: Router,
    discovery: BoundDiscoveryServer,
}

impl BoundServer {
    /// Address the Alpaca server is bound to.
    pub const fn listen_addr(&self) -> SocketAddr {
        self.listen_addr
    }

    /// Address the discovery server is bound to.
    pub fn discovery_listen_addr(&self) -> std::io::Result<SocketAddr> {
        self.discovery.listen_addr()
    }

    /// Starts the Alpaca and discovery servers.
    ///
    /// Note: this function starts an infinite async loop and it's your responsibility to spawn it off
    /// via [`tokio::spawn`] if necessary.
    pub async fn start(self) -> eyre::Result<Infallible> {
        let Self {
            listener,
            router,
            discovery,
            ..
        } = self;

        tracing::debug!("Starting Alpaca main and discovery servers");

        let (never, _) = tokio::try_join!(
            async move {
                axum::serve(listener, router).await?;
                Err::<Infallible, _>(eyre::eyre!("Alpaca server stopped unexpectedly"))
            },
            async move { Ok(discovery.start().await) },
        )?;

        match never {}
    }
}
