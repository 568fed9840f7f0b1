use crate::discovery::{
    AlpacaPort, DEFAULT_DISCOVERY_PORT, DISCOVERY_ADDR_V6, DISCOVERY_MSG, bind_socket,
};
use std::convert::Infallible;
use std::net::SocketAddr;
use tokio::net::UdpSocket;

/// Alpaca discovery responder.
#[derive(Debug, Clone, Copy)]
pub struct Server {
    /// Port of the HTTP server advertised in replies.
    pub alpaca_port: u16,
    /// Address to listen on.
    ///
    /// Defaults to `/* Alpaca server address */:32227`.
    pub listen_addr: SocketAddr,
}

impl Server {
    /// Discovery responder advertising an Alpaca server bound at the given address.
    pub const fn for_alpaca_server_at(alpaca_listen_addr: SocketAddr) -> Self {
        Self {
            alpaca_port: alpaca_listen_addr.port(),
            listen_addr: SocketAddr::new(alpaca_listen_addr.ip(), DEFAULT_DISCOVERY_PORT),
        }
    }

    /// Bind the UDP socket.
    ///
    /// Binding is split from [`BoundServer::start`] so that callers can report bind errors
    /// before entering the infinite loop.
    #[tracing::instrument(level = "debug", err)]
    pub fn bind(self) -> eyre::Result<BoundServer> {
        let socket = bind_socket(self.listen_addr)?;
        if self.listen_addr.is_ipv6() {
            socket.join_multicast_v6(&DISCOVERY_ADDR_V6, 0)?;
        }
        let reply = serde_json::to_string(&AlpacaPort {
            alpaca_port: self.alpaca_port,
        })?;
        tracing::debug!(listen_addr = %socket.local_addr()?, "Bound Alpaca discovery server");
        Ok(BoundServer { socket, reply })
    }
}

/// Discovery responder with its socket already bound.
#[derive(Debug)]
pub struct BoundServer {
    socket: UdpSocket,
    reply: String,
}

impl BoundServer {
    /// Address the socket is actually bound to.
    pub fn listen_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    async fn handle_datagram(&self, buf: &mut [u8]) -> eyre::Result<()> {
        let (len, src) = self.socket.recv_from(buf).await?;
        let data = &buf[..len];
        if data == DISCOVERY_MSG {
            tracing::debug!(%src, "Received Alpaca discovery request");
            let sent = self.socket.send_to(self.reply.as_bytes(), src).await?;
            eyre::ensure!(
                sent == self.reply.len(),
                "Discovery reply was truncated ({sent} of {} bytes)",
                self.reply.len()
            );
        } else {
            tracing::warn!(%src, payload = %String::from_utf8_lossy(data), "Received unknown discovery packet");
        }
        Ok(())
    }

    /// Answer discovery requests forever.
    pub async fn start(self) -> Infallible {
        // One extra byte so that longer payloads don't compare equal after truncation.
        let mut buf = [0; DISCOVERY_MSG.len() + 1];
        loop {
            if let Err(err) = self.handle_datagram(&mut buf).await {
                tracing::error!(%err, "Error while handling a discovery request");
            }
        }
    }
}
