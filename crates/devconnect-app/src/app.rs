//! Application state machine.
//!
//! This module defines the [`App`] state machine, which owns the chat-facing
//! state of the client completely decoupled from I/O and transport mechanics.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Routes inbound push events to the [`NotificationStore`], discarding the
//!   local user's own echoes.
//! - Owns the currently open [`Conversation`] and its activation epoch,
//!   discarding fetch resolutions that outlived their view.
//! - Drives identity registration, hydration, and logout teardown.

use crate::{AppAction, AppEvent, Conversation, NotificationStore, Participant};

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// The local user.
    local: Participant,
    /// Process-wide unread counts.
    notifications: NotificationStore,
    /// The open conversation. `None` when no chat view is mounted.
    conversation: Option<Conversation>,
    /// Activation stamp of the newest conversation; history resolutions
    /// carrying an older stamp are stale.
    epoch: u64,
}

impl App {
    /// Create a new App for the given local user.
    pub fn new(local: Participant) -> Self {
        Self { local, notifications: NotificationStore::new(), conversation: None, epoch: 0 }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Started => vec![
                AppAction::RegisterIdentity { user_id: self.local.id.clone() },
                AppAction::FetchUnreadCounts,
            ],
            AppEvent::Notification(notification) => {
                if notification.sender_id == self.local.id {
                    tracing::debug!("discarding own notification echo");
                } else {
                    self.notifications.increment(notification.sender_id);
                }
                vec![]
            },
            AppEvent::LiveMessage(message) => {
                if let Some(conversation) = self.conversation.as_mut() {
                    conversation.append_live(message);
                }
                vec![]
            },
            AppEvent::UnreadSnapshot(counts) => {
                self.notifications.hydrate(counts);
                vec![]
            },
            AppEvent::HistoryLoaded { epoch, messages } => {
                if epoch == self.epoch
                    && let Some(conversation) = self.conversation.as_mut()
                {
                    conversation.seed_history(messages);
                } else {
                    tracing::debug!(epoch, "ignoring stale history response");
                }
                vec![]
            },
            AppEvent::HistoryFailed { epoch } => {
                tracing::debug!(epoch, "conversation stays unseeded after failed fetch");
                vec![]
            },
            AppEvent::ConversationOpened { peer } => {
                if let Some(mut previous) = self.conversation.take() {
                    previous.close();
                }
                self.notifications.clear(&peer);
                self.epoch += 1;

                let mut conversation = Conversation::new(self.local.clone(), peer);
                let mut actions =
                    vec![AppAction::RegisterIdentity { user_id: self.local.id.clone() }];
                actions.extend(conversation.join(self.epoch));
                self.conversation = Some(conversation);
                actions
            },
            AppEvent::ConversationClosed => {
                if let Some(mut conversation) = self.conversation.take() {
                    conversation.close();
                }
                vec![]
            },
            AppEvent::DraftChanged(text) => {
                if let Some(conversation) = self.conversation.as_mut() {
                    conversation.set_draft(text);
                }
                vec![]
            },
            AppEvent::DraftSubmitted => {
                self.conversation.as_mut().map(Conversation::send).unwrap_or_default()
            },
            AppEvent::LoggedOut => {
                self.notifications.clear_all();
                if let Some(mut conversation) = self.conversation.take() {
                    conversation.close();
                }
                vec![AppAction::TeardownSession]
            },
        }
    }

    /// The local user.
    pub fn local(&self) -> &Participant {
        &self.local
    }

    /// Process-wide unread counts.
    pub fn notifications(&self) -> &NotificationStore {
        &self.notifications
    }

    /// The open conversation. `None` when no chat view is mounted.
    pub fn conversation(&self) -> Option<&Conversation> {
        self.conversation.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use devconnect_proto::rest::{HistoryMessage, SenderRef};
    use devconnect_proto::{LiveMessage, Notification, UserId};

    use super::*;

    fn app() -> App {
        App::new(Participant {
            id: UserId::from("u1"),
            first_name: "Ada".into(),
            photo_url: "https://cdn.example/ada.png".into(),
        })
    }

    fn notification_from(sender: &str) -> AppEvent {
        AppEvent::Notification(Notification {
            sender_id: UserId::from(sender),
            sender_name: "Bo".into(),
            text: "ping".into(),
        })
    }

    fn history_from(id: &str, text: &str) -> HistoryMessage {
        HistoryMessage {
            sender_id: SenderRef {
                id: UserId::from(id),
                first_name: "Bo".into(),
                last_name: "Chen".into(),
                photo_url: "p".into(),
            },
            text: text.into(),
        }
    }

    /// The epoch the open action carried, for feeding resolutions back in.
    fn history_epoch(actions: &[AppAction]) -> u64 {
        actions
            .iter()
            .find_map(|action| match action {
                AppAction::FetchHistory { epoch, .. } => Some(*epoch),
                _ => None,
            })
            .expect("open emits a history fetch")
    }

    #[test]
    fn started_registers_identity_and_hydrates() {
        let mut app = app();
        let actions = app.handle(AppEvent::Started);

        assert!(matches!(
            actions.as_slice(),
            [AppAction::RegisterIdentity { user_id }, AppAction::FetchUnreadCounts]
                if user_id.as_str() == "u1"
        ));
    }

    #[test]
    fn peer_notifications_increment_their_badge() {
        let mut app = app();
        let _ = app.handle(notification_from("u2"));
        let _ = app.handle(notification_from("u2"));
        let _ = app.handle(notification_from("u3"));

        assert_eq!(app.notifications().count(&UserId::from("u2")), 2);
        assert_eq!(app.notifications().count(&UserId::from("u3")), 1);
    }

    #[test]
    fn own_notification_echo_is_discarded() {
        let mut app = app();
        let _ = app.handle(notification_from("u1"));

        assert!(app.notifications().counts().is_empty());
    }

    #[test]
    fn snapshot_hydration_composes_with_increments() {
        let mut app = app();
        let _ = app.handle(AppEvent::UnreadSnapshot(
            [(UserId::from("u2"), 3), (UserId::from("u3"), 1)].into(),
        ));
        let _ = app.handle(notification_from("u2"));

        assert_eq!(app.notifications().count(&UserId::from("u2")), 4);
        assert_eq!(app.notifications().count(&UserId::from("u3")), 1);
    }

    #[test]
    fn opening_a_conversation_acknowledges_and_joins() {
        let mut app = app();
        let _ = app.handle(notification_from("u2"));

        let actions = app.handle(AppEvent::ConversationOpened { peer: UserId::from("u2") });

        assert_eq!(app.notifications().count(&UserId::from("u2")), 0);
        assert!(matches!(
            actions.as_slice(),
            [
                AppAction::RegisterIdentity { user_id },
                AppAction::FetchHistory { peer, .. },
                AppAction::EmitJoin { target_user_id, .. },
            ] if user_id.as_str() == "u1"
                && peer.as_str() == "u2"
                && target_user_id.as_str() == "u2"
        ));
        assert_eq!(app.conversation().map(|c| c.peer_id().as_str()), Some("u2"));
    }

    #[test]
    fn history_then_live_message_extends_the_sequence() {
        let mut app = app();
        let actions = app.handle(AppEvent::ConversationOpened { peer: UserId::from("u2") });
        let epoch = history_epoch(&actions);

        let _ = app.handle(AppEvent::HistoryLoaded {
            epoch,
            messages: vec![history_from("u2", "earlier")],
        });
        assert_eq!(app.conversation().map(|c| c.messages().len()), Some(1));

        let _ = app.handle(AppEvent::LiveMessage(LiveMessage {
            first_name: "Bo".into(),
            photo_url: "p".into(),
            text: "hi".into(),
        }));

        let conversation = app.conversation().expect("open conversation");
        assert_eq!(conversation.messages().len(), 2);
        assert_eq!(conversation.messages()[1].text, "hi");
    }

    #[test]
    fn stale_history_mutates_nothing() {
        let mut app = app();
        let first = app.handle(AppEvent::ConversationOpened { peer: UserId::from("u2") });
        let stale_epoch = history_epoch(&first);

        let _ = app.handle(AppEvent::ConversationOpened { peer: UserId::from("u3") });
        let _ = app.handle(AppEvent::HistoryLoaded {
            epoch: stale_epoch,
            messages: vec![history_from("u2", "for the old view")],
        });

        let conversation = app.conversation().expect("open conversation");
        assert_eq!(conversation.peer_id().as_str(), "u3");
        assert!(conversation.messages().is_empty());
    }

    #[test]
    fn history_after_close_is_ignored() {
        let mut app = app();
        let actions = app.handle(AppEvent::ConversationOpened { peer: UserId::from("u2") });
        let epoch = history_epoch(&actions);

        let _ = app.handle(AppEvent::ConversationClosed);
        let _ = app.handle(AppEvent::HistoryLoaded {
            epoch,
            messages: vec![history_from("u2", "too late")],
        });

        assert!(app.conversation().is_none());
    }

    #[test]
    fn live_message_without_a_view_is_dropped() {
        let mut app = app();
        let actions = app.handle(AppEvent::LiveMessage(LiveMessage {
            first_name: "Bo".into(),
            photo_url: "p".into(),
            text: "hi".into(),
        }));

        assert!(actions.is_empty());
        assert!(app.conversation().is_none());
    }

    #[test]
    fn submitted_draft_emits_send() {
        let mut app = app();
        let _ = app.handle(AppEvent::ConversationOpened { peer: UserId::from("u2") });
        let _ = app.handle(AppEvent::DraftChanged("hi".into()));

        let actions = app.handle(AppEvent::DraftSubmitted);

        assert!(matches!(
            actions.as_slice(),
            [AppAction::EmitSend(message)] if message.text == "hi"
        ));
    }

    #[test]
    fn whitespace_draft_submission_is_inert() {
        let mut app = app();
        let _ = app.handle(AppEvent::ConversationOpened { peer: UserId::from("u2") });
        let _ = app.handle(AppEvent::DraftChanged("   ".into()));

        let actions = app.handle(AppEvent::DraftSubmitted);

        assert!(actions.is_empty());
        assert_eq!(app.conversation().map(|c| c.draft()), Some("   "));
    }

    #[test]
    fn submitting_without_a_conversation_is_inert() {
        let mut app = app();
        assert!(app.handle(AppEvent::DraftSubmitted).is_empty());
    }

    #[test]
    fn logout_clears_state_and_tears_down() {
        let mut app = app();
        let _ = app.handle(notification_from("u2"));
        let _ = app.handle(AppEvent::ConversationOpened { peer: UserId::from("u3") });

        let actions = app.handle(AppEvent::LoggedOut);

        assert!(matches!(actions.as_slice(), [AppAction::TeardownSession]));
        assert!(app.notifications().counts().is_empty());
        assert!(app.conversation().is_none());
    }
}
