//! Frame transport for Parley.
//!
//! Serving a client happens in two steps. [`Transport::accept`] only takes
//! the next socket off the listener, which never waits on a peer. The
//! returned [`Incoming`] is then upgraded with [`Incoming::handshake`],
//! which does wait on the peer and so belongs in that client's own task.
//! Once upgraded, a [`Connection`] moves opaque frames; framing of
//! requests and responses lives in `parley-protocol`.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket transport via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketIncoming, WebSocketTransport};

use std::fmt;
use std::net::SocketAddr;

/// Server-assigned number identifying one client connection in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A listener handing out not-yet-upgraded client sockets.
pub trait Transport: Send + Sync + 'static {
    /// A socket that still has to complete its handshake.
    type Incoming: Incoming<Connection = Self::Connection, Error = Self::Error>;
    /// The upgraded connection.
    type Connection: Connection;
    type Error: std::error::Error + Send + Sync;

    /// Waits for the next socket. Does not read from it.
    ///
    /// Returns the `Shutdown` error once [`shutdown`](Self::shutdown) has
    /// run.
    async fn accept(&mut self) -> Result<Self::Incoming, Self::Error>;

    /// Closes the listening socket. Connections already accepted are
    /// unaffected.
    async fn shutdown(&mut self) -> Result<(), Self::Error>;
}

/// An accepted socket waiting for its protocol handshake.
pub trait Incoming: Send + 'static {
    type Connection: Connection;
    type Error: std::error::Error + Send + Sync;

    fn id(&self) -> ConnectionId;

    fn peer_addr(&self) -> SocketAddr;

    /// Reads the peer's upgrade request and answers it. Waits as long as
    /// the peer takes; callers bound it with a timeout.
    async fn handshake(self) -> Result<Self::Connection, Self::Error>;
}

/// A single connection that carries whole frames in both directions.
///
/// Sending and receiving may happen concurrently from different tasks.
pub trait Connection: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync;

    /// Sends one frame to the remote peer.
    async fn send(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Receives the next frame from the remote peer.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Sends a close frame.
    async fn close(&self) -> Result<(), Self::Error>;

    fn id(&self) -> ConnectionId;
}
