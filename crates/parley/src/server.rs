//! `ParleyServer` builder and accept loop.
//!
//! Ties the layers together: transport → protocol → coordinator.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use parley_presence::PresenceConfig;
use parley_protocol::{Codec, JsonCodec};
use parley_room::StoreConfig;
use parley_transport::{Transport, WebSocketTransport};

use crate::handler::handle_connection;
use crate::{ChatCoordinator, ParleyError};

/// Pause after a failed `accept` before trying again.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Shared state passed to each connection task.
///
/// The coordinator synchronizes internally, so no outer lock is needed.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) coordinator: ChatCoordinator,
    pub(crate) codec: C,
    pub(crate) idle_timeout: Duration,
}

/// Builder for configuring and starting a Parley server.
///
/// ```rust,no_run
/// # async fn start() -> Result<(), parley::ParleyError> {
/// let server = parley::ParleyServerBuilder::new()
///     .bind("0.0.0.0:50051")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct ParleyServerBuilder {
    bind_addr: String,
    store_config: StoreConfig,
    presence_config: PresenceConfig,
    idle_timeout: Duration,
}

impl ParleyServerBuilder {
    /// Creates a builder with default settings: `127.0.0.1:50051`, the
    /// `general` and `sports` rooms, a 15 s idle window and a 15 s
    /// connection idle timeout.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:50051".to_string(),
            store_config: StoreConfig::default(),
            presence_config: PresenceConfig::default(),
            idle_timeout: Duration::from_secs(15),
        }
    }

    /// Sets the address to listen on.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets which rooms exist at startup.
    pub fn store_config(mut self, config: StoreConfig) -> Self {
        self.store_config = config;
        self
    }

    /// Sets the presence configuration.
    pub fn presence_config(mut self, config: PresenceConfig) -> Self {
        self.presence_config = config;
        self
    }

    /// Closes connections that send nothing for this long. Clients that
    /// heartbeat regularly never hit it.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Binds the listener and builds the server with the JSON codec.
    pub async fn build(self) -> Result<ParleyServer<JsonCodec>, ParleyError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            coordinator: ChatCoordinator::new(&self.store_config, self.presence_config),
            codec: JsonCodec,
            idle_timeout: self.idle_timeout,
        });

        Ok(ParleyServer { transport, state })
    }
}

impl Default for ParleyServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Parley server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct ParleyServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> ParleyServer<C> {
    /// Creates a new builder.
    pub fn builder() -> ParleyServerBuilder {
        ParleyServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.transport.local_addr()
    }

    /// The coordinator serving this server's requests.
    pub fn coordinator(&self) -> &ChatCoordinator {
        &self.state.coordinator
    }

    /// Runs the accept loop until the process is terminated.
    pub async fn run(self) -> Result<(), ParleyError> {
        self.run_until(std::future::pending()).await
    }

    /// Runs the accept loop until `shutdown` completes.
    ///
    /// Each connection gets its own task, so clients are served in
    /// parallel. Connections already open keep running after shutdown
    /// until their clients leave or go idle.
    pub async fn run_until(
        mut self,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), ParleyError> {
        tracing::info!(addr = %self.local_addr(), "Parley server running");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => break,
                accepted = self.transport.accept() => match accepted {
                    Ok(incoming) => {
                        let state = Arc::clone(&self.state);
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(incoming, state).await {
                                tracing::debug!(error = %e, "connection ended with error");
                            }
                        });
                    }
                    Err(e) => {
                        // Usually out of file descriptors; retrying at once
                        // would only spin.
                        tracing::error!(error = %e, "accept failed");
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                },
            }
        }

        self.transport.shutdown().await?;
        tracing::info!("Parley server stopped");
        Ok(())
    }
}
