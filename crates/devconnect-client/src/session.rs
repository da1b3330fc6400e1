//! Realtime session over WebSocket.
//!
//! [`Session`] is a handle to one live connection. An internal I/O task owns
//! the socket and bridges it to channels: outbound events go through an mpsc
//! queue, inbound frames are decoded at the boundary and fanned out to every
//! [`Session::subscribe`] receiver. Dropping a receiver detaches that
//! consumer; the connection itself stays up until logout.
//!
//! Malformed and unknown inbound frames are logged and dropped here, so
//! subscribers only ever observe well-formed [`ServerEvent`]s.

use std::sync::{Arc, Mutex};

use devconnect_proto::{ClientEvent, JoinChat, RegisterUser, SendMessage, ServerEvent, UserId};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{Notify, broadcast, mpsc, watch};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::{ClientError, ServiceConfig};

/// Connection liveness as observed by the I/O task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Channel is up.
    Connected,
    /// Channel ended: server close, stream error, or local shutdown.
    Disconnected,
}

/// Handle to a live realtime session.
///
/// Cheap to share behind an `Arc`; every consumer talks to the same
/// underlying connection. Constructed by
/// [`SessionManager`](crate::SessionManager), which guarantees at most one
/// live session per process.
#[derive(Debug)]
pub struct Session {
    outgoing: mpsc::Sender<ClientEvent>,
    inbound: broadcast::Sender<ServerEvent>,
    status: watch::Receiver<SessionStatus>,
    identity: Mutex<Option<UserId>>,
    close: Arc<Notify>,
    abort: tokio::task::AbortHandle,
}

impl Session {
    /// Open a connection to the configured service and spawn its I/O task.
    pub(crate) async fn connect(config: &ServiceConfig) -> Result<Self, ClientError> {
        let url = config.socket_url();
        let (socket, _response) = tokio_tungstenite::connect_async(url.as_str())
            .await
            .map_err(|e| ClientError::Connection(format!("{url}: {e}")))?;
        tracing::info!(%url, "session connected");

        let (outgoing_tx, outgoing_rx) = mpsc::channel(32);
        let (inbound_tx, _) = broadcast::channel(config.event_buffer);
        let (status_tx, status_rx) = watch::channel(SessionStatus::Connected);
        let close = Arc::new(Notify::new());

        let task = tokio::spawn(run_session(
            socket,
            outgoing_rx,
            inbound_tx.clone(),
            status_tx,
            Arc::clone(&close),
        ));

        Ok(Self {
            outgoing: outgoing_tx,
            inbound: inbound_tx,
            status: status_rx,
            identity: Mutex::new(None),
            close,
            abort: task.abort_handle(),
        })
    }

    /// Bind the local account identity to this session.
    ///
    /// Safe to call repeatedly: the service treats re-registration as a
    /// refresh and the recorded identity is overwritten.
    pub async fn register_identity(&self, user_id: UserId) -> Result<(), ClientError> {
        self.send(ClientEvent::RegisterUser(RegisterUser { user_id: user_id.clone() })).await?;
        if let Ok(mut identity) = self.identity.lock() {
            *identity = Some(user_id);
        }
        Ok(())
    }

    /// Identity most recently registered on this session, if any.
    pub fn identity(&self) -> Option<UserId> {
        self.identity.lock().ok().and_then(|guard| guard.clone())
    }

    /// Enter the one-to-one room for the participant pair.
    pub async fn join_chat(
        &self,
        user_id: UserId,
        target_user_id: UserId,
    ) -> Result<(), ClientError> {
        self.send(ClientEvent::JoinChat(JoinChat { user_id, target_user_id })).await
    }

    /// Publish a chat message to the joined room.
    pub async fn send_message(&self, message: SendMessage) -> Result<(), ClientError> {
        self.send(ClientEvent::SendMessage(message)).await
    }

    /// Queue an outbound event.
    pub async fn send(&self, event: ClientEvent) -> Result<(), ClientError> {
        self.outgoing.send(event).await.map_err(|_| ClientError::SessionClosed)
    }

    /// Subscribe to the inbound event stream.
    ///
    /// Every subscriber observes every decoded inbound event. Dropping the
    /// receiver detaches the subscription without touching the connection.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.inbound.subscribe()
    }

    /// Current connection status.
    pub fn status(&self) -> SessionStatus {
        *self.status.borrow()
    }

    /// Watch status changes; resolves when the connection ends.
    pub fn status_stream(&self) -> watch::Receiver<SessionStatus> {
        self.status.clone()
    }

    /// Close the connection.
    ///
    /// Only the logout path calls this; view navigation never does. The I/O
    /// task sends a close frame and exits, flipping the status to
    /// [`SessionStatus::Disconnected`].
    pub(crate) fn shutdown(&self) {
        self.close.notify_one();
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.abort.abort();
    }
}

/// I/O task: owns the socket and pumps both directions until close.
async fn run_session(
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    mut outgoing: mpsc::Receiver<ClientEvent>,
    inbound: broadcast::Sender<ServerEvent>,
    status: watch::Sender<SessionStatus>,
    close: Arc<Notify>,
) {
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            () = close.notified() => {
                let _ = sink.send(Message::Close(None)).await;
                break;
            }
            queued = outgoing.recv() => {
                // None means every Session handle is gone.
                let Some(event) = queued else { break };
                match event.encode() {
                    Ok(frame) => {
                        if let Err(e) = sink.send(Message::text(frame)).await {
                            tracing::warn!(error = %e, "session send failed");
                            break;
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "dropping unencodable event"),
                }
            }
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Text(frame))) => match ServerEvent::decode(frame.as_str()) {
                        // A send error means no subscriber is listening right
                        // now; inbound events are not queued for later.
                        Ok(event) => {
                            let _ = inbound.send(event);
                        }
                        Err(e) => tracing::warn!(error = %e, "dropping malformed frame"),
                    },
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::info!("session closed by server");
                        break;
                    }
                    // Ping/pong is handled by the protocol layer; binary
                    // frames are not part of the service contract.
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "session stream error");
                        break;
                    }
                }
            }
        }
    }

    let _ = status.send(SessionStatus::Disconnected);
    tracing::info!("session disconnected");
}
