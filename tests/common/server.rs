//! In-process test server.
//!
//! Runs the gateway inside the test process on an ephemeral port, so tests
//! can configure sub-minute timeouts and observe liveness behavior
//! deterministically.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use minnowd::config::Config;
use minnowd::handlers::Registry;
use minnowd::network::Gateway;
use minnowd::state::Roster;
use tokio::task::JoinHandle;

/// A server instance running inside the test process.
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Spawn with default configuration (timeouts long enough not to
    /// interfere with a test).
    pub async fn spawn() -> anyhow::Result<Self> {
        Self::spawn_with(Config::default()).await
    }

    /// Spawn with custom timeouts (seconds).
    #[allow(dead_code)]
    pub async fn spawn_with_timeouts(
        registration: u64,
        ping_period: u64,
        ping_timeout: u64,
    ) -> anyhow::Result<Self> {
        let mut config = Config::default();
        config.timeouts.registration = registration;
        config.timeouts.ping_period = ping_period;
        config.timeouts.ping_timeout = ping_timeout;
        Self::spawn_with(config).await
    }

    /// Spawn with the given config; the listen address is overridden to an
    /// ephemeral port.
    pub async fn spawn_with(mut config: Config) -> anyhow::Result<Self> {
        config.listen.address = SocketAddr::from((Ipv4Addr::LOCALHOST, 0));
        config.validate()?;

        let roster = Arc::new(Roster::new(&config));
        let registry = Arc::new(Registry::new());
        let gateway = Gateway::bind(config.listen.address, roster, registry).await?;
        let addr = gateway.local_addr()?;

        let handle = tokio::spawn(async move {
            let _ = gateway.run().await;
        });

        Ok(Self { addr, handle })
    }

    /// The server address.
    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    /// Create a new test client connected to this server.
    #[allow(dead_code)]
    pub async fn connect(&self, nick: &str) -> anyhow::Result<super::client::TestClient> {
        super::client::TestClient::connect(&self.address(), nick).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
