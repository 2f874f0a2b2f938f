//! Gateway - TCP listener that accepts incoming connections.
//!
//! The Gateway binds the listening socket and spawns a Connection task for
//! each inbound client.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info, instrument};

use super::Connection;
use crate::handlers::Registry;
use crate::state::Roster;

/// Accepts inbound connections and wires each one to a [`Connection`].
pub struct Gateway {
    listener: TcpListener,
    roster: Arc<Roster>,
    registry: Arc<Registry>,
}

impl Gateway {
    /// Bind the gateway to the specified address.
    pub async fn bind(
        addr: SocketAddr,
        roster: Arc<Roster>,
        registry: Arc<Registry>,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(%addr, "Listener bound");
        Ok(Self {
            listener,
            roster,
            registry,
        })
    }

    /// The bound local address (useful when binding port 0).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the gateway, accepting connections forever.
    ///
    /// A failed accept is logged and never stops the loop; a failure in
    /// one connection's task never reaches another.
    #[instrument(skip(self), name = "gateway")]
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    info!(%addr, "Connection accepted");

                    let roster = Arc::clone(&self.roster);
                    let registry = Arc::clone(&self.registry);
                    let uid = roster.next_uid();

                    tokio::spawn(async move {
                        Connection::new(uid, stream, addr, roster, registry)
                            .run()
                            .await;
                    });
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }
}
