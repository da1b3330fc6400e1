//! Runtime composition root.
//!
//! The Runtime owns the live halves the state machines stay ignorant of: the
//! shared session, the REST collaborator, and the channels feeding [`App`].
//! It subscribes the session's inbound event stream and routes it into the
//! state machine, so the transport never touches application state.
//!
//! Fetch actions run as spawned tasks; their resolutions come back through a
//! channel as ordinary events. Live events keep flowing while fetches are in
//! flight.

use std::sync::Arc;

use devconnect_client::{ChatApi, ClientError, Session, SessionManager};
use devconnect_proto::ServerEvent;
use tokio::sync::{broadcast, mpsc};

use crate::{App, AppAction, AppEvent, Participant};

/// Capacity for view commands and fetch resolutions.
const EVENT_QUEUE_DEPTH: usize = 64;

/// Event loop wiring [`App`] to the session and the REST collaborator.
pub struct Runtime<A> {
    manager: SessionManager,
    api: A,
    app: App,
    commands_tx: mpsc::Sender<AppEvent>,
    commands_rx: mpsc::Receiver<AppEvent>,
    resolutions_tx: mpsc::Sender<AppEvent>,
    resolutions_rx: mpsc::Receiver<AppEvent>,
}

impl<A> Runtime<A>
where
    A: ChatApi + Clone + Send + 'static,
{
    /// Create a runtime for `local` against the given session manager and
    /// REST collaborator.
    pub fn new(manager: SessionManager, api: A, local: Participant) -> Self {
        let (commands_tx, commands_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
        let (resolutions_tx, resolutions_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
        Self {
            manager,
            api,
            app: App::new(local),
            commands_tx,
            commands_rx,
            resolutions_tx,
            resolutions_rx,
        }
    }

    /// Handle for feeding view intents into the loop.
    pub fn commands(&self) -> mpsc::Sender<AppEvent> {
        self.commands_tx.clone()
    }

    /// The application state machine.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Run the event loop.
    ///
    /// Acquires the shared session, registers the local identity, and then
    /// multiplexes inbound events, fetch resolutions, and view commands into
    /// the state machine until logout or until the session's event stream
    /// ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial session acquisition fails. Failures
    /// after that point are handled locally and logged.
    pub async fn run(mut self) -> Result<(), ClientError> {
        let session = self.manager.connection().await?;
        let mut inbound = session.subscribe();
        tracing::info!("runtime started");

        let actions = self.app.handle(AppEvent::Started);
        if self.execute(actions, &session).await {
            return Ok(());
        }

        loop {
            let event = tokio::select! {
                inbound_event = inbound.recv() => match inbound_event {
                    Ok(event) => map_server_event(event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "inbound subscriber lagged");
                        continue;
                    },
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("session stream ended");
                        break;
                    },
                },
                Some(resolution) = self.resolutions_rx.recv() => resolution,
                command = self.commands_rx.recv() => match command {
                    Some(command) => command,
                    None => break,
                },
            };

            let actions = self.app.handle(event);
            if self.execute(actions, &session).await {
                break;
            }
        }

        tracing::info!("runtime stopped");
        Ok(())
    }

    /// Execute actions against the session and collaborators.
    ///
    /// Returns `true` once the session was torn down.
    async fn execute(&mut self, actions: Vec<AppAction>, session: &Arc<Session>) -> bool {
        let mut torn_down = false;
        for action in actions {
            match action {
                AppAction::RegisterIdentity { user_id } => {
                    if let Err(error) = session.register_identity(user_id).await {
                        tracing::warn!(%error, "identity registration failed");
                    }
                },
                AppAction::EmitJoin { user_id, target_user_id } => {
                    if let Err(error) = session.join_chat(user_id, target_user_id).await {
                        tracing::warn!(%error, "room join failed");
                    }
                },
                AppAction::EmitSend(message) => {
                    if let Err(error) = session.send_message(message).await {
                        tracing::warn!(%error, "message send failed");
                    }
                },
                AppAction::FetchHistory { peer, epoch } => {
                    let api = self.api.clone();
                    let resolutions = self.resolutions_tx.clone();
                    tokio::spawn(async move {
                        let event = match api.chat_history(&peer).await {
                            Ok(history) => {
                                AppEvent::HistoryLoaded { epoch, messages: history.messages }
                            },
                            Err(error) => {
                                tracing::warn!(%error, peer = peer.as_str(), "history fetch failed");
                                AppEvent::HistoryFailed { epoch }
                            },
                        };
                        let _ = resolutions.send(event).await;
                    });
                },
                AppAction::FetchUnreadCounts => {
                    let api = self.api.clone();
                    let resolutions = self.resolutions_tx.clone();
                    tokio::spawn(async move {
                        match api.unread_counts().await {
                            Ok(snapshot) => {
                                let event = AppEvent::UnreadSnapshot(snapshot.unread_counts);
                                let _ = resolutions.send(event).await;
                            },
                            // The badge keeps its current state on failure.
                            Err(error) => {
                                tracing::warn!(%error, "unread snapshot fetch failed");
                            },
                        }
                    });
                },
                AppAction::TeardownSession => {
                    self.manager.logout().await;
                    torn_down = true;
                },
            }
        }
        torn_down
    }
}

/// Translate the session's wire events into state machine inputs.
fn map_server_event(event: ServerEvent) -> AppEvent {
    match event {
        ServerEvent::MessageReceived(message) => AppEvent::LiveMessage(message),
        ServerEvent::MessageNotification(notification) => AppEvent::Notification(notification),
    }
}

#[cfg(test)]
mod tests {
    use devconnect_proto::{LiveMessage, Notification, UserId};

    use super::*;

    #[test]
    fn live_messages_map_to_the_conversation() {
        let event = ServerEvent::MessageReceived(LiveMessage {
            first_name: "Bo".into(),
            photo_url: "p".into(),
            text: "hi".into(),
        });

        assert!(matches!(
            map_server_event(event),
            AppEvent::LiveMessage(message) if message.text == "hi"
        ));
    }

    #[test]
    fn notifications_map_to_the_store_route() {
        let event = ServerEvent::MessageNotification(Notification {
            sender_id: UserId::from("u2"),
            sender_name: "Bo".into(),
            text: "ping".into(),
        });

        assert!(matches!(
            map_server_event(event),
            AppEvent::Notification(notification) if notification.sender_id.as_str() == "u2"
        ));
    }
}
