/// Errors from binding, accepting, upgrading, or using a connection.
///
/// The chat core never creates these; it only passes them up unchanged so
/// the caller can decide whether to reconnect.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The listening socket could not be bound.
    #[error("bind failed: {0}")]
    Bind(#[source] std::io::Error),

    /// Accepting a TCP connection failed.
    #[error("accept failed: {0}")]
    Accept(#[source] std::io::Error),

    /// The peer connected but did not complete the WebSocket upgrade.
    #[cfg(feature = "websocket")]
    #[error("handshake failed: {0}")]
    Handshake(#[source] tokio_tungstenite::tungstenite::Error),

    /// Writing a frame failed.
    #[cfg(feature = "websocket")]
    #[error("send failed: {0}")]
    Send(#[source] tokio_tungstenite::tungstenite::Error),

    /// Reading a frame failed.
    #[cfg(feature = "websocket")]
    #[error("receive failed: {0}")]
    Receive(#[source] tokio_tungstenite::tungstenite::Error),

    /// `accept` was called after `shutdown`.
    #[error("transport shut down")]
    Shutdown,
}
