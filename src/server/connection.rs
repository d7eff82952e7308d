//! Per-client connection task
//!
//! Upgrades the socket to a WebSocket, registers the client on its first
//! well-formed message and then feeds every following message to the relay.
//! However the receive loop ends (close frame, transport error or panic),
//! cleanup runs exactly once before the task returns, provided the client
//! was registered. A refused registration never touches relay state.

use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::stream::SplitStream;
use futures_util::{FutureExt, SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::WebSocketConfig;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async_with_config, WebSocketStream};

use crate::error::{Error, Result};
use crate::protocol::{ClientId, InboundMessage, ProtocolError};
use crate::registry::ConnectionHandle;
use crate::relay::Relay;
use crate::server::config::ServerConfig;

/// A single client connection
pub(crate) struct ClientConnection {
    id: ClientId,
    peer_addr: SocketAddr,
    relay: Arc<Relay>,
    config: ServerConfig,
}

impl ClientConnection {
    pub(crate) fn new(
        id: ClientId,
        peer_addr: SocketAddr,
        relay: Arc<Relay>,
        config: ServerConfig,
    ) -> Self {
        Self {
            id,
            peer_addr,
            relay,
            config,
        }
    }

    /// Serve the connection until it closes
    pub(crate) async fn run(self, socket: TcpStream) -> Result<()> {
        let mut ws_config = WebSocketConfig::default();
        ws_config.max_message_size = Some(self.config.max_message_size);

        let ws = tokio::time::timeout(
            self.config.handshake_timeout,
            accept_async_with_config(socket, Some(ws_config)),
        )
        .await
        .map_err(|_| Error::HandshakeTimeout)??;

        tracing::info!(client_id = %self.id, peer = %self.peer_addr, "New connection");

        let (mut sink, stream) = ws.split();
        let (handle, mut outbound) = ConnectionHandle::channel();

        let writer_id = self.id.clone();
        let writer = tokio::spawn(async move {
            while let Some(frame) = outbound.recv().await {
                if let Err(e) = sink.send(Message::Text(frame)).await {
                    tracing::debug!(client_id = %writer_id, error = %e, "Write failed");
                    break;
                }
            }
            let _ = sink.close().await;
        });

        let mut registered = false;
        let outcome = AssertUnwindSafe(self.receive_loop(stream, handle, &mut registered))
            .catch_unwind()
            .await;

        if registered {
            self.relay.disconnect(&self.id).await;
        }
        writer.abort();

        match outcome {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(client_id = %self.id, "Receive loop panicked");
                Err(Error::ReceiveFault)
            }
        }
    }

    async fn receive_loop(
        &self,
        mut stream: SplitStream<WebSocketStream<TcpStream>>,
        handle: ConnectionHandle,
        registered: &mut bool,
    ) -> Result<()> {
        // Handed to the registry with the first well-formed message
        let mut pending = Some(handle);

        while let Some(frame) = stream.next().await {
            let text = match frame? {
                Message::Text(text) => text,
                Message::Binary(data) => match String::from_utf8(data) {
                    Ok(text) => text,
                    Err(_) => {
                        self.discard(&ProtocolError::InvalidUtf8);
                        continue;
                    }
                },
                Message::Close(frame) => {
                    tracing::info!(client_id = %self.id, frame = ?frame, "Client closed connection");
                    break;
                }
                _ => continue,
            };

            let message = match InboundMessage::parse(&text) {
                Ok(message) => message,
                Err(e) => {
                    self.discard(&e);
                    continue;
                }
            };

            match pending.take() {
                Some(handle) => {
                    let role = self
                        .relay
                        .connect(self.id.clone(), self.peer_addr, handle, &message)
                        .await
                        .map_err(|e| {
                            tracing::error!(client_id = %self.id, error = %e, "Registration refused");
                            e
                        })?;
                    *registered = true;
                    tracing::debug!(client_id = %self.id, role = %role, "Registration complete");
                }
                None => self.relay.route(&self.id, &message).await,
            }
        }

        Ok(())
    }

    fn discard(&self, error: &ProtocolError) {
        tracing::warn!(client_id = %self.id, error = %error, "Discarding malformed frame");
        self.relay.stats().record_malformed();
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use serde_json::json;
    use tokio::net::TcpListener;
    use tokio_tungstenite::connect_async;

    use super::*;
    use crate::protocol::ClientRole;
    use crate::registry::RegistryError;

    #[tokio::test]
    async fn test_refused_registration_leaves_existing_client() {
        let relay = Arc::new(Relay::new());
        let (handle, _rx) = ConnectionHandle::channel();
        let first = InboundMessage::from_value(json!({"client_type": "sender"})).unwrap();
        let origin = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 50000);
        relay
            .connect(ClientId::new("C1"), origin, handle, &first)
            .await
            .unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let client = tokio::spawn(async move {
            let (mut ws, _) = connect_async(format!("ws://{}", addr)).await.unwrap();
            ws.send(Message::Text(json!({"client_type": "viewer"}).to_string()))
                .await
                .unwrap();
            // Drain until the server hangs up
            while let Some(Ok(_)) = ws.next().await {}
        });

        let (socket, peer) = listener.accept().await.unwrap();
        let connection = ClientConnection::new(
            ClientId::new("C1"),
            peer,
            Arc::clone(&relay),
            ServerConfig::default(),
        );
        let result = connection.run(socket).await;

        assert!(matches!(
            result,
            Err(Error::Registry(RegistryError::DuplicateClient(_)))
        ));
        // The original C1 is untouched: still registered, still the sender
        assert_eq!(relay.role_of(&ClientId::new("C1")).await, Some(ClientRole::Sender));
        assert_eq!(relay.active_sender().await, Some(ClientId::new("C1")));
        assert_eq!(relay.stats().snapshot().active_connections, 1);

        client.await.unwrap();
    }
}
