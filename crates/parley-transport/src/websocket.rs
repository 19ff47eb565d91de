//! WebSocket transport implementation using `tokio-tungstenite`.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;

use crate::{Connection, ConnectionId, Incoming, Transport, TransportError};

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

type WsStream = WebSocketStream<TcpStream>;

/// A WebSocket-based [`Transport`] that listens for incoming connections.
pub struct WebSocketTransport {
    local_addr: SocketAddr,
    listener: Option<TcpListener>,
}

impl WebSocketTransport {
    /// Binds a new WebSocket transport to the given address.
    ///
    /// Pass port 0 to let the OS choose; [`local_addr`](Self::local_addr)
    /// reports what was picked.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr).await.map_err(TransportError::Bind)?;
        let local_addr = listener.local_addr().map_err(TransportError::Bind)?;
        tracing::info!(%local_addr, "WebSocket transport listening");
        Ok(Self {
            local_addr,
            listener: Some(listener),
        })
    }

    /// Returns the address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl Transport for WebSocketTransport {
    type Incoming = WebSocketIncoming;
    type Connection = WebSocketConnection;
    type Error = TransportError;

    async fn accept(&mut self) -> Result<WebSocketIncoming, TransportError> {
        let listener = self.listener.as_ref().ok_or(TransportError::Shutdown)?;
        let (stream, peer) = listener.accept().await.map_err(TransportError::Accept)?;

        let id = ConnectionId::new(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(%id, %peer, "accepted TCP connection");
        Ok(WebSocketIncoming { id, peer, stream })
    }

    async fn shutdown(&mut self) -> Result<(), TransportError> {
        if self.listener.take().is_some() {
            tracing::info!(local_addr = %self.local_addr, "WebSocket transport no longer accepting");
        }
        Ok(())
    }
}

/// A TCP socket that has not yet sent its WebSocket upgrade request.
pub struct WebSocketIncoming {
    id: ConnectionId,
    peer: SocketAddr,
    stream: TcpStream,
}

impl Incoming for WebSocketIncoming {
    type Connection = WebSocketConnection;
    type Error = TransportError;

    fn id(&self) -> ConnectionId {
        self.id
    }

    fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    async fn handshake(self) -> Result<WebSocketConnection, TransportError> {
        let ws = tokio_tungstenite::accept_async(self.stream)
            .await
            .map_err(TransportError::Handshake)?;

        // Separate halves so a pending recv never holds up a send.
        let (sink, stream) = ws.split();
        Ok(WebSocketConnection {
            id: self.id,
            peer: self.peer,
            sink: Mutex::new(sink),
            stream: Mutex::new(stream),
        })
    }
}

/// An upgraded WebSocket connection.
pub struct WebSocketConnection {
    id: ConnectionId,
    peer: SocketAddr,
    sink: Mutex<SplitSink<WsStream, Message>>,
    stream: Mutex<SplitStream<WsStream>>,
}

impl WebSocketConnection {
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}

impl Connection for WebSocketConnection {
    type Error = TransportError;

    /// UTF-8 payloads go out as text frames, anything else as binary.
    async fn send(&self, data: &[u8]) -> Result<(), Self::Error> {
        let msg = match String::from_utf8(data.to_vec()) {
            Ok(text) => Message::Text(text.into()),
            Err(e) => Message::Binary(e.into_bytes().into()),
        };
        self.sink
            .lock()
            .await
            .send(msg)
            .await
            .map_err(TransportError::Send)
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        let mut stream = self.stream.lock().await;
        loop {
            match stream.next().await {
                Some(Ok(Message::Binary(data))) => return Ok(Some(data.into())),
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.as_bytes().to_vec()));
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue, // ping/pong/raw frame
                Some(Err(e)) => return Err(TransportError::Receive(e)),
            }
        }
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.sink
            .lock()
            .await
            .close()
            .await
            .map_err(TransportError::Send)
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
