mod logging_env;

use crate::Server;
use std::net::{Ipv4Addr, SocketAddr};
use tokio::task::JoinHandle;

/// A server running in the background on ephemeral ports.
///
/// The server task is aborted when this is dropped.
pub(crate) struct TestServer {
    pub(crate) listen_addr: SocketAddr,
    pub(crate) discovery_addr: SocketAddr,
    pub(crate) client: reqwest::Client,
    task: JoinHandle<eyre::Result<std::convert::Infallible>>,
}

impl TestServer {
    pub(crate) async fn start(server: Server) -> eyre::Result<Self> {
        let server = Server {
            listen_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 0)),
            discovery_port: 0,
            ..server
        };

        let server = server.bind().await?;

        // Get the IP and the random ports assigned by the OS.
        let listen_addr = server.listen_addr();
        let discovery_addr = server.discovery_listen_addr()?;

        let task = tokio::spawn(server.start());

        Ok(Self {
            listen_addr,
            discovery_addr,
            client: reqwest::Client::new(),
            task,
        })
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.listen_addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
