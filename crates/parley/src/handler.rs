//! Per-connection handler: decode requests, call the coordinator, reply.
//!
//! Each accepted connection gets its own Tokio task running
//! [`handle_connection`]. Requests on one connection are answered in the
//! order they arrive; separate connections run in parallel.

use std::sync::Arc;

use parley_protocol::{CODE_INVALID_INPUT, Call, Codec, Reply, Request, Response};
use parley_transport::{Connection, Incoming, WebSocketIncoming};

use crate::server::ServerState;
use crate::{ChatCoordinator, ParleyError};

/// Handles a single connection from the WebSocket handshake to close.
///
/// A peer gets `idle_timeout` to complete the handshake, and the same
/// again between requests.
pub(crate) async fn handle_connection<C: Codec>(
    incoming: WebSocketIncoming,
    state: Arc<ServerState<C>>,
) -> Result<(), ParleyError> {
    let conn_id = incoming.id();
    let peer = incoming.peer_addr();

    let conn = match tokio::time::timeout(state.idle_timeout, incoming.handshake()).await {
        Ok(upgraded) => upgraded?,
        Err(_) => {
            tracing::info!(%conn_id, %peer, "handshake timed out");
            return Ok(());
        }
    };
    tracing::info!(%conn_id, %peer, "connection opened");

    loop {
        let data = match tokio::time::timeout(state.idle_timeout, conn.recv()).await {
            Ok(Ok(Some(data))) => data,
            Ok(Ok(None)) => {
                tracing::info!(%conn_id, "connection closed cleanly");
                break;
            }
            Ok(Err(e)) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                return Err(e.into());
            }
            Err(_) => {
                tracing::info!(%conn_id, "connection timed out");
                let _ = conn.close().await;
                break;
            }
        };

        let response = match state.codec.decode::<Request>(&data) {
            Ok(request) => {
                let method = request.call.method();
                let reply = dispatch(&state.coordinator, request.call);
                if let Reply::Error { code, message } = &reply {
                    tracing::debug!(%conn_id, method, code, %message, "request rejected");
                }
                Response {
                    id: request.id,
                    reply,
                }
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "failed to decode request");
                Response {
                    id: 0,
                    reply: Reply::error(CODE_INVALID_INPUT, e.to_string()),
                }
            }
        };

        let bytes = state.codec.encode(&response)?;
        conn.send(&bytes).await?;
    }

    Ok(())
}

/// Runs one call against the coordinator and turns the outcome into a
/// reply. Errors become `Reply::Error`; nothing is retried.
pub(crate) fn dispatch(coordinator: &ChatCoordinator, call: Call) -> Reply {
    let result = match call {
        Call::Join { username, room } => coordinator
            .join(&username, &room)
            .map(|messages| Reply::History { messages }),
        Call::SendMessage {
            username,
            text,
            room,
        } => coordinator
            .send_message(&username, &text, &room)
            .map(|()| Reply::Ack),
        Call::Heartbeat { username } => coordinator.heartbeat(&username).map(|()| Reply::Ack),
        Call::LastSeen { username } => coordinator.last_seen(&username).map(Reply::Presence),
        Call::ListRooms => Ok(Reply::RoomList {
            rooms: coordinator.list_rooms(),
        }),
    };

    result.unwrap_or_else(|e| Reply::error(e.code(), e.to_string()))
}
